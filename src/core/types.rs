//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`VersionId`] - Sequential version identifier (0 means "no version")
//! - [`ContentHash`] - FNV-1a 64-bit fingerprint of version content
//! - [`BranchName`] - Validated branch name
//! - [`Timestamp`] - Wall-clock instant in nanoseconds since the Unix epoch
//!
//! # Validation
//!
//! Names and ids are validated at construction time, so the version graph
//! never has to re-check raw user input.
//!
//! # Examples
//!
//! ```
//! use snapline::core::types::{BranchName, ContentHash, VersionId};
//!
//! let branch = BranchName::new("feature/login").unwrap();
//! let id: VersionId = "42".parse().unwrap();
//! assert_eq!(id.get(), 42);
//! assert_eq!(ContentHash::of("").as_u64(), 0xcbf29ce484222325);
//!
//! assert!(BranchName::new("has space").is_err());
//! assert!("abc".parse::<VersionId>().is_err());
//! # let _ = branch;
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("invalid version id: {0}")]
    InvalidVersionId(String),
}

/// Identifier of a version in the store.
///
/// Ids are assigned sequentially starting at 1. The value 0 is reserved for
/// "no version": the parent of a root version, or the head of a branch
/// without commits.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct VersionId(u64);

impl VersionId {
    /// The "no version" id.
    pub const ROOT: VersionId = VersionId(0);

    /// Wrap a raw id.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw numeric id.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Check if this is the "no version" id.
    pub const fn is_root(self) -> bool {
        self.0 == 0
    }
}

impl FromStr for VersionId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| TypeError::InvalidVersionId(format!("'{s}' is not a non-negative integer")))
    }
}

impl From<u64> for VersionId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for VersionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// FNV-1a 64-bit fingerprint of version content.
///
/// This is a stable, publicly specified, non-cryptographic hash. It is only
/// used to detect "nothing changed" commits, never for integrity.
///
/// # Example
///
/// ```
/// use snapline::core::types::ContentHash;
///
/// let h = ContentHash::of("a");
/// assert_eq!(h.as_u64(), 0xaf63dc4c8601ec8c);
/// assert_eq!(h.to_string(), "0xaf63dc4c8601ec8c");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash(u64);

impl ContentHash {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    /// Hash the given content.
    pub fn of(content: &str) -> Self {
        let hash = content.bytes().fold(Self::OFFSET_BASIS, |h, byte| {
            (h ^ u64::from(byte)).wrapping_mul(Self::PRIME)
        });
        Self(hash)
    }

    /// Rebuild a hash from its stored numeric value.
    pub const fn from_u64(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the numeric value.
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:016x}", self.0)
    }
}

/// A validated branch name.
///
/// Branch names are single tokens:
/// - Cannot be empty
/// - Cannot contain whitespace or control characters
///
/// Names typed on the command line also cannot start with `-`, since clap
/// would read them as flags. Names read back from a repository file only
/// need to be tokens; see [`BranchName::from_stored`].
///
/// # Example
///
/// ```
/// use snapline::core::types::BranchName;
///
/// let name = BranchName::new("feat").unwrap();
/// assert_eq!(name.as_str(), "feat");
///
/// assert!(BranchName::new("").is_err());
/// assert!(BranchName::new("-x").is_err());
/// assert!(BranchName::new("a\tb").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BranchName(String);

impl BranchName {
    /// Name of the branch every repository starts with.
    pub const DEFAULT: &'static str = "main";

    /// Create a new validated branch name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidBranchName` if the name is not a single token.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        if name.starts_with('-') {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot start with '-'".into(),
            ));
        }
        Self::validate(&name)?;
        Ok(Self(name))
    }

    /// Accept a name read from a repository file.
    ///
    /// Only the token rules apply, so names such as `-hotfix` that older
    /// files may hold still load.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidBranchName` if the name is empty or holds
    /// whitespace or control characters.
    pub fn from_stored(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    /// The default `main` branch.
    pub fn main() -> Self {
        Self(Self::DEFAULT.to_string())
    }

    fn validate(name: &str) -> Result<(), TypeError> {
        if name.is_empty() {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot be empty".into(),
            ));
        }
        if name.chars().any(char::is_whitespace) {
            return Err(TypeError::InvalidBranchName(format!(
                "branch name cannot contain whitespace: {name:?}"
            )));
        }
        if name.chars().any(char::is_control) {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot contain control characters".into(),
            ));
        }
        Ok(())
    }

    /// Get the branch name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for BranchName {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for BranchName {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<BranchName> for String {
    fn from(name: BranchName) -> Self {
        name.0
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for BranchName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for BranchName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Wall-clock creation instant, in nanoseconds since the Unix epoch.
///
/// Timestamps are informational. They are not guaranteed to be monotonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    const DISPLAY_FORMAT: &'static str = "%Y-%m-%d %H:%M:%S";

    /// Create a timestamp for the current moment.
    pub fn now() -> Self {
        // Out of range only past the year 2262.
        Self(chrono::Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX))
    }

    /// Create a timestamp from nanoseconds since the epoch.
    pub const fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    /// Nanoseconds since the epoch.
    pub const fn as_nanos(self) -> i64 {
        self.0
    }

    fn as_datetime(self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::from_timestamp(self.0 / 1_000_000_000, 0)
    }

    /// Render as `YYYY-MM-DD HH:MM:SS` in the local timezone.
    ///
    /// Returns `invalid-time` when the instant cannot be represented.
    pub fn format_local(self) -> String {
        self.as_datetime()
            .map(|dt| {
                dt.with_timezone(&chrono::Local)
                    .format(Self::DISPLAY_FORMAT)
                    .to_string()
            })
            .unwrap_or_else(|| "invalid-time".to_string())
    }

    /// Render as `YYYY-MM-DD HH:MM:SS` in UTC.
    pub fn format_utc(self) -> String {
        self.as_datetime()
            .map(|dt| dt.format(Self::DISPLAY_FORMAT).to_string())
            .unwrap_or_else(|| "invalid-time".to_string())
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod version_id {
        use super::*;

        #[test]
        fn parses_decimal() {
            assert_eq!("7".parse::<VersionId>().unwrap(), VersionId::new(7));
            assert_eq!(" 12 ".parse::<VersionId>().unwrap(), VersionId::new(12));
        }

        #[test]
        fn zero_is_root() {
            let id: VersionId = "0".parse().unwrap();
            assert!(id.is_root());
            assert_eq!(id, VersionId::ROOT);
        }

        #[test]
        fn rejects_garbage() {
            assert!("".parse::<VersionId>().is_err());
            assert!("-1".parse::<VersionId>().is_err());
            assert!("1x".parse::<VersionId>().is_err());
            assert!("18446744073709551616".parse::<VersionId>().is_err());
        }

        #[test]
        fn orders_numerically() {
            assert!(VersionId::new(2) < VersionId::new(10));
        }
    }

    mod content_hash {
        use super::*;

        #[test]
        fn empty_is_offset_basis() {
            assert_eq!(ContentHash::of("").as_u64(), 0xcbf29ce484222325);
        }

        #[test]
        fn known_vectors() {
            assert_eq!(ContentHash::of("a").as_u64(), 0xaf63dc4c8601ec8c);
            assert_eq!(ContentHash::of("foobar").as_u64(), 0x85944171f73967e8);
        }

        #[test]
        fn display_is_padded_hex() {
            assert_eq!(
                ContentHash::from_u64(0xff).to_string(),
                "0x00000000000000ff"
            );
        }

        #[test]
        fn hashes_utf8_bytes() {
            assert_ne!(ContentHash::of("é"), ContentHash::of("e"));
        }
    }

    mod branch_name {
        use super::*;

        #[test]
        fn valid_branch_names() {
            assert!(BranchName::new("main").is_ok());
            assert!(BranchName::new("feature/foo").is_ok());
            assert!(BranchName::new("fix-123").is_ok());
            assert!(BranchName::new("with\"quote").is_ok());
            assert!(BranchName::new("ünïcode").is_ok());
        }

        #[test]
        fn empty_name_rejected() {
            assert!(BranchName::new("").is_err());
        }

        #[test]
        fn starts_with_dash_rejected() {
            assert!(BranchName::new("-flag").is_err());
        }

        #[test]
        fn stored_names_may_start_with_dash() {
            assert_eq!(BranchName::from_stored("-hotfix").unwrap(), "-hotfix");
            assert!(BranchName::from_stored("").is_err());
            assert!(BranchName::from_stored("a b").is_err());
            assert!(BranchName::from_stored("a\x07").is_err());
        }

        #[test]
        fn whitespace_rejected() {
            assert!(BranchName::new("has space").is_err());
            assert!(BranchName::new("has\ttab").is_err());
            assert!(BranchName::new("has\nnewline").is_err());
        }

        #[test]
        fn control_chars_rejected() {
            assert!(BranchName::new("has\x7fDEL").is_err());
        }

        #[test]
        fn default_is_main() {
            assert_eq!(BranchName::main(), "main");
        }

        #[test]
        fn serde_roundtrip() {
            let name = BranchName::new("feature/test").unwrap();
            let json = serde_json::to_string(&name).unwrap();
            let parsed: BranchName = serde_json::from_str(&json).unwrap();
            assert_eq!(name, parsed);
        }

        #[test]
        fn serde_rejects_invalid() {
            assert!(serde_json::from_str::<BranchName>("\"a b\"").is_err());
        }
    }

    mod timestamp {
        use super::*;

        #[test]
        fn now_is_after_2020() {
            assert!(Timestamp::now().as_nanos() > 1_577_836_800_000_000_000);
        }

        #[test]
        fn formats_utc() {
            let ts = Timestamp::from_nanos(1_700_000_000_123_456_789);
            assert_eq!(ts.format_utc(), "2023-11-14 22:13:20");
        }

        #[test]
        fn epoch_formats() {
            assert_eq!(Timestamp::from_nanos(0).format_utc(), "1970-01-01 00:00:00");
        }
    }
}
