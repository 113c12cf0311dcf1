//! Resolution queries and display-name parsing.
//!
//! A query names an assembly and optionally pins its version, public key token and
//! preferred culture, and restricts the acceptable processor architectures. Queries are
//! built programmatically or parsed from a display name:
//!
//! ```text
//! Name[, Version=N.N.N.N][, Culture=xx-XX][, PublicKeyToken=<16 hex>]
//! ```
//!
//! Keys match case-insensitively and may appear in any order. Unknown keys (including
//! `ProcessorArchitecture`) and segments without `=` are ignored. A backslash escapes a
//! `,` or `\` that belongs to the name or a value; rendering a query escapes the same
//! characters, so parsing its display form gives the query back.

use std::{fmt, str::FromStr};

use crate::{
    metadata::identity::{
        escape_display_value, parse_components, AssemblyVersion, ProcessorArchitecture,
        PublicKeyToken,
    },
    ParseError,
};

/// A version constraint: an [`AssemblyVersion`] plus how many of its components were
/// given.
///
/// Only the given components are rendered, so `Version=4.0` stays `4.0` and matches cache
/// directories `4.0*` by prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VersionSpec {
    version: AssemblyVersion,
    parts: usize,
}

impl VersionSpec {
    /// A constraint on the first `parts` components of `version`; `parts` is clamped to 1..=4.
    #[must_use]
    pub fn new(version: AssemblyVersion, parts: usize) -> Self {
        VersionSpec {
            version,
            parts: parts.clamp(1, 4),
        }
    }

    /// Parse 1 to 4 dot-separated `u16` components.
    ///
    /// # Errors
    /// Returns [`ParseError::Malformed`] for anything else.
    pub fn parse(value: &str) -> Result<Self, ParseError> {
        let (version, parts) = parse_components(value)?;
        Ok(Self::new(version, parts))
    }

    /// The version, with unspecified components set to 0.
    #[must_use]
    pub fn version(&self) -> AssemblyVersion {
        self.version
    }

    /// Number of specified components.
    #[must_use]
    pub fn parts(&self) -> usize {
        self.parts
    }
}

impl From<AssemblyVersion> for VersionSpec {
    fn from(version: AssemblyVersion) -> Self {
        Self::new(version, 4)
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, component) in self.version.components()[..self.parts].iter().enumerate() {
            if index > 0 {
                f.write_str(".")?;
            }
            write!(f, "{component}")?;
        }
        Ok(())
    }
}

impl FromStr for VersionSpec {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// What to look up in the cache.
///
/// An empty `name` scans the whole cache; only the resolver builds such queries
/// (see [`ResolutionQuery::all`]).
///
/// # Examples
///
/// ```rust
/// use gacscope::{ProcessorArchitecture, ResolutionQuery};
///
/// let query: ResolutionQuery =
///     "System.Xml, Version=4.0.0.0, PublicKeyToken=b77a5c561934e089".parse()?;
/// assert_eq!(query.name, "System.Xml");
/// assert_eq!(query.version.unwrap().to_string(), "4.0.0.0");
///
/// let query = query.with_architectures(&[ProcessorArchitecture::MSIL]);
/// assert_eq!(query.architectures.len(), 1);
/// # Ok::<(), gacscope::ParseError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionQuery {
    /// Simple name of the assembly; empty for a whole-cache scan
    pub name: String,
    /// Version constraint, matched by directory-name prefix
    pub version: Option<VersionSpec>,
    /// Token constraint, matched by directory-name suffix
    pub public_key_token: Option<PublicKeyToken>,
    /// Acceptable architectures; empty accepts all
    pub architectures: Vec<ProcessorArchitecture>,
    /// Culture named in the display name, `None` for neutral
    pub culture: Option<String>,
}

impl ResolutionQuery {
    /// A query for `name` without further constraints.
    ///
    /// Surrounding whitespace is trimmed, as a display name's name segment is.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let trimmed = name.trim();
        let name = if trimmed.len() == name.len() {
            name
        } else {
            trimmed.to_string()
        };

        ResolutionQuery {
            name,
            ..Default::default()
        }
    }

    /// A query matching every assembly in the cache.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Constrain the version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<VersionSpec>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Constrain the public key token.
    #[must_use]
    pub fn with_public_key_token(mut self, token: PublicKeyToken) -> Self {
        self.public_key_token = Some(token);
        self
    }

    /// Restrict the acceptable processor architectures.
    #[must_use]
    pub fn with_architectures(mut self, architectures: &[ProcessorArchitecture]) -> Self {
        self.architectures = architectures.to_vec();
        self
    }

    /// Set the culture; `neutral` and the empty string mean culture-neutral.
    #[must_use]
    pub fn with_culture(mut self, culture: &str) -> Self {
        self.culture = normalize_culture(culture);
        self
    }

    /// Returns `true` if the query scans the whole cache.
    #[must_use]
    pub fn is_whole_repository(&self) -> bool {
        self.name.is_empty()
    }
}

impl fmt::Display for ResolutionQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&escape_display_value(&self.name))?;

        if let Some(version) = &self.version {
            write!(f, ", Version={version}")?;
        }
        if let Some(culture) = &self.culture {
            write!(f, ", Culture={}", escape_display_value(culture))?;
        }
        if let Some(token) = &self.public_key_token {
            write!(f, ", PublicKeyToken={token}")?;
        }

        Ok(())
    }
}

impl FromStr for ResolutionQuery {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_display_name(s)
    }
}

/// `neutral` (any case) and the empty string are the neutral culture.
pub(crate) fn normalize_culture(culture: &str) -> Option<String> {
    let culture = culture.trim();
    if culture.is_empty() || culture.eq_ignore_ascii_case("neutral") {
        None
    } else {
        Some(culture.to_string())
    }
}

/// Parse a display name into a query.
///
/// # Errors
/// Returns [`ParseError::EmptyName`] if the name segment is blank, and
/// [`ParseError::Malformed`] for a bad `Version` or `PublicKeyToken` value.
///
/// # Examples
///
/// ```rust
/// use gacscope::gac::parse_display_name;
///
/// let query = parse_display_name("Widgets, culture=NEUTRAL, PublicKeyToken=null, Custom=1")?;
/// assert_eq!(query.name, "Widgets");
/// assert!(query.culture.is_none());
/// assert!(query.public_key_token.is_none());
/// # Ok::<(), gacscope::ParseError>(())
/// ```
pub fn parse_display_name(display_name: &str) -> Result<ResolutionQuery, ParseError> {
    let mut segments = split_segments(display_name).into_iter();

    let name = segments.next().unwrap_or_default().trim();
    if name.is_empty() {
        return Err(ParseError::EmptyName);
    }

    let mut query = ResolutionQuery::new(unescape(name));
    for segment in segments {
        let Some((key, value)) = segment.split_once('=') else {
            continue;
        };

        let key = key.trim();
        let value = unescape(value.trim());
        let value = value.as_str();

        if key.eq_ignore_ascii_case("Version") {
            query.version = Some(VersionSpec::parse(value)?);
        } else if key.eq_ignore_ascii_case("Culture") {
            query.culture = normalize_culture(value);
        } else if key.eq_ignore_ascii_case("PublicKeyToken") {
            query.public_key_token = if value.is_empty() || value.eq_ignore_ascii_case("null") {
                None
            } else {
                Some(PublicKeyToken::from_hex(value)?)
            };
        }
    }

    Ok(query)
}

/// Split at every `,` that is not escaped. Segments keep their escapes.
fn split_segments(text: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((index, c)) = chars.next() {
        match c {
            '\\' if matches!(chars.peek(), Some((_, ',' | '\\'))) => {
                chars.next();
            }
            ',' => {
                segments.push(&text[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }

    segments.push(&text[start..]);
    segments
}

/// Undo [`escape_display_value`]; a backslash before anything else is kept.
fn unescape(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next @ (',' | '\\')) = chars.peek() {
                result.push(next);
                chars.next();
                continue;
            }
        }
        result.push(c);
    }

    result
}
