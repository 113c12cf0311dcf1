#![no_main]

use libfuzzer_sys::fuzz_target;
use gacscope::gac::parse_display_name;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(query) = parse_display_name(text) {
            // The rendered form of a parsed query parses back to the same query
            let rendered = query.to_string();
            assert_eq!(parse_display_name(&rendered).unwrap(), query, "{rendered}");
        }
    }
});
