#![no_main]

use libfuzzer_sys::fuzz_target;
use gacscope::AssemblyManifest;

fuzz_target!(|data: &[u8]| {
    let _ = AssemblyManifest::from_mem(data.to_vec());
});
