//! Assembly identity: name, version, culture, public key token, and architecture.

use std::{borrow::Cow, fmt, fmt::Write, str::FromStr};

use strum::EnumIter;

use crate::{
    metadata::{cor20header::CorFlags, identity::PublicKeyToken},
    ParseError,
};

/// The identity of one assembly as recorded in its manifest.
///
/// `name` is never empty for identities read from a file. A `culture` of `None` is a
/// culture-neutral assembly; a `public_key_token` of `None` is an unsigned assembly (or
/// one whose token is unknown).
///
/// # Examples
///
/// ```rust
/// use gacscope::metadata::identity::{AssemblyIdentity, AssemblyVersion};
///
/// let identity = AssemblyIdentity::new(
///     "Widgets",
///     AssemblyVersion::new(1, 0, 0, 0),
///     None,
///     None,
///     None,
/// );
/// assert_eq!(
///     identity.display_name(),
///     "Widgets, Version=1.0.0.0, Culture=neutral, PublicKeyToken=null"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssemblyIdentity {
    /// Simple assembly name (e.g., "mscorlib", "System.Core").
    pub name: String,

    /// Four-part version number.
    pub version: AssemblyVersion,

    /// Culture of a satellite assembly, `None` for culture-neutral.
    pub culture: Option<String>,

    /// Strong-name fingerprint, `None` for unsigned assemblies.
    pub public_key_token: Option<PublicKeyToken>,

    /// Declared processor architecture, `None` if unknown.
    pub processor_architecture: Option<ProcessorArchitecture>,
}

/// Four-part version numbering for .NET assemblies.
///
/// Versions are compared component-wise in order: major, minor, build, revision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssemblyVersion {
    /// Major version component.
    pub major: u16,
    /// Minor version component.
    pub minor: u16,
    /// Build version component.
    pub build: u16,
    /// Revision version component.
    pub revision: u16,
}

/// Processor architecture an assembly declares through its PE and CLI headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum ProcessorArchitecture {
    /// Architecture neutral (AnyCPU).
    MSIL,
    /// 32-bit Intel x86.
    X86,
    /// Intel Itanium.
    IA64,
    /// x86-64.
    ///
    /// Both "AMD64" and "x64" are accepted when parsing; the display name is "AMD64".
    AMD64,
    /// 32-bit ARM.
    ARM,
    /// 64-bit ARM.
    ARM64,
}

impl AssemblyIdentity {
    /// Create a new assembly identity with the specified components.
    pub fn new(
        name: impl Into<String>,
        version: AssemblyVersion,
        culture: Option<String>,
        public_key_token: Option<PublicKeyToken>,
        processor_architecture: Option<ProcessorArchitecture>,
    ) -> Self {
        Self {
            name: name.into(),
            version,
            culture,
            public_key_token,
            processor_architecture,
        }
    }

    /// Full display name, in the form the runtime prints it.
    ///
    /// Always carries `Version`, `Culture` (`neutral` if none) and `PublicKeyToken`
    /// (`null` if none); `ProcessorArchitecture` is appended when known.
    #[must_use]
    pub fn display_name(&self) -> String {
        // "Name, Version=x.x.x.x, Culture=neutral, PublicKeyToken=xxxxxxxxxxxxxxxx"
        let mut result = String::with_capacity(self.name.len() + 80);

        result.push_str(&escape_display_value(&self.name));

        let _ = write!(result, ", Version={}", self.version);

        let culture_str = self
            .culture
            .as_deref()
            .map_or(Cow::Borrowed("neutral"), escape_display_value);
        let _ = write!(result, ", Culture={culture_str}");

        let token = PublicKeyToken::encode(self.public_key_token.as_ref());
        let _ = write!(
            result,
            ", PublicKeyToken={}",
            token.as_deref().unwrap_or("null")
        );

        if let Some(arch) = &self.processor_architecture {
            let _ = write!(result, ", ProcessorArchitecture={arch}");
        }

        result
    }

    /// Get the simple assembly name without version or culture information.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if the assembly carries a public key token.
    #[must_use]
    pub fn is_strong_named(&self) -> bool {
        self.public_key_token.is_some()
    }

    /// Returns `true` if the assembly is culture-neutral.
    #[must_use]
    pub fn is_culture_neutral(&self) -> bool {
        self.culture.is_none()
    }
}

impl AssemblyVersion {
    /// Create a new assembly version with the specified components.
    #[must_use]
    pub const fn new(major: u16, minor: u16, build: u16, revision: u16) -> Self {
        Self {
            major,
            minor,
            build,
            revision,
        }
    }

    /// Parse a dotted version of 1 to 4 components; missing components are 0.
    ///
    /// # Errors
    /// Returns [`ParseError::Malformed`] if the string has no components, more than four,
    /// or a component that is not a `u16`.
    pub fn parse(version_str: &str) -> Result<Self, ParseError> {
        parse_components(version_str).map(|(version, _)| version)
    }

    /// The components in order, for rendering a prefix of them.
    #[must_use]
    pub const fn components(&self) -> [u16; 4] {
        [self.major, self.minor, self.build, self.revision]
    }
}

/// Escape `\` and `,` with a backslash so the value survives display-name splitting.
pub(crate) fn escape_display_value(value: &str) -> Cow<'_, str> {
    if !value.contains(['\\', ',']) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 4);
    for c in value.chars() {
        if matches!(c, '\\' | ',') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    Cow::Owned(escaped)
}

/// Parse a dotted version and report how many components were given.
pub(crate) fn parse_components(version_str: &str) -> Result<(AssemblyVersion, usize), ParseError> {
    let parts: Vec<&str> = version_str.trim().split('.').collect();

    if parts.len() > 4 {
        return Err(ParseError::Malformed(format!(
            "Invalid version format: {version_str}"
        )));
    }

    let mut components = [0u16; 4];
    for (i, part) in parts.iter().enumerate() {
        components[i] = part.parse::<u16>().map_err(|_| {
            ParseError::Malformed(format!("Invalid version component: '{part}'"))
        })?;
    }

    Ok((
        AssemblyVersion::new(components[0], components[1], components[2], components[3]),
        parts.len(),
    ))
}

impl ProcessorArchitecture {
    /// Parse processor architecture from its display name, case-insensitively.
    ///
    /// # Errors
    /// Returns [`ParseError::Malformed`] if the name is not recognized.
    pub fn parse(arch_str: &str) -> Result<Self, ParseError> {
        match arch_str.trim().to_lowercase().as_str() {
            "msil" => Ok(Self::MSIL),
            "x86" => Ok(Self::X86),
            "ia64" => Ok(Self::IA64),
            "amd64" | "x64" => Ok(Self::AMD64),
            "arm" => Ok(Self::ARM),
            "arm64" => Ok(Self::ARM64),
            _ => Err(ParseError::Malformed(format!(
                "Unknown processor architecture: '{}'",
                arch_str.trim()
            ))),
        }
    }

    /// Derive the declared architecture from the COFF machine type and CLI flags.
    ///
    /// An IL-only i386 image is architecture neutral unless it requires a 32-bit process
    /// without merely preferring one. Unknown machines yield `None`.
    #[must_use]
    pub fn from_image(machine: u16, flags: CorFlags) -> Option<Self> {
        const IMAGE_FILE_MACHINE_I386: u16 = 0x014C;
        const IMAGE_FILE_MACHINE_IA64: u16 = 0x0200;
        const IMAGE_FILE_MACHINE_AMD64: u16 = 0x8664;
        const IMAGE_FILE_MACHINE_ARM: u16 = 0x01C0;
        const IMAGE_FILE_MACHINE_ARMNT: u16 = 0x01C4;
        const IMAGE_FILE_MACHINE_ARM64: u16 = 0xAA64;

        match machine {
            IMAGE_FILE_MACHINE_I386 => {
                let requires_32bit = flags.contains(CorFlags::REQUIRED_32BIT)
                    && !flags.contains(CorFlags::PREFERRED_32BIT);

                if flags.contains(CorFlags::IL_ONLY) && !requires_32bit {
                    Some(Self::MSIL)
                } else {
                    Some(Self::X86)
                }
            }
            IMAGE_FILE_MACHINE_AMD64 => Some(Self::AMD64),
            IMAGE_FILE_MACHINE_IA64 => Some(Self::IA64),
            IMAGE_FILE_MACHINE_ARM | IMAGE_FILE_MACHINE_ARMNT => Some(Self::ARM),
            IMAGE_FILE_MACHINE_ARM64 => Some(Self::ARM64),
            _ => None,
        }
    }

    /// Returns `true` for architectures that bind an assembly to one processor family.
    #[must_use]
    pub fn is_specific(&self) -> bool {
        *self != Self::MSIL
    }
}

impl fmt::Display for AssemblyVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.build, self.revision
        )
    }
}

impl fmt::Display for ProcessorArchitecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arch_str = match self {
            Self::MSIL => "MSIL",
            Self::X86 => "x86",
            Self::IA64 => "IA64",
            Self::AMD64 => "AMD64",
            Self::ARM => "ARM",
            Self::ARM64 => "ARM64",
        };
        write!(f, "{arch_str}")
    }
}

impl fmt::Display for AssemblyIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for AssemblyVersion {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl FromStr for ProcessorArchitecture {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
