//! Project-level options consumed read-only by rules.

use std::fmt;
use std::str::FromStr;

/// Source language level of the project being rewritten.
///
/// Rules branch on it when a shortcut (boxing factories, diamond types)
/// only exists from some level on.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub enum LanguageLevel {
    Java4,
    Java5,
    Java6,
    Java7,
    #[default]
    Java8,
}

impl LanguageLevel {
    pub const LATEST: LanguageLevel = LanguageLevel::Java8;

    pub const fn as_str(self) -> &'static str {
        match self {
            LanguageLevel::Java4 => "1.4",
            LanguageLevel::Java5 => "1.5",
            LanguageLevel::Java6 => "1.6",
            LanguageLevel::Java7 => "1.7",
            LanguageLevel::Java8 => "1.8",
        }
    }

    /// `Integer.valueOf(int)` and friends exist.
    pub fn has_boxing_factories(self) -> bool {
        self >= LanguageLevel::Java5
    }
}

impl fmt::Display for LanguageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognized `--level` value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownLevel(pub String);

impl fmt::Display for UnknownLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown language level '{}'", self.0)
    }
}

impl std::error::Error for UnknownLevel {}

impl FromStr for LanguageLevel {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1.4" | "4" => Ok(LanguageLevel::Java4),
            "1.5" | "5" => Ok(LanguageLevel::Java5),
            "1.6" | "6" => Ok(LanguageLevel::Java6),
            "1.7" | "7" => Ok(LanguageLevel::Java7),
            "1.8" | "8" => Ok(LanguageLevel::Java8),
            other => Err(UnknownLevel(other.to_owned())),
        }
    }
}

/// Options for one rewrite run. Shared by every pass and every unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProjectOptions {
    pub level: LanguageLevel,
    /// Whether Android platform rules apply.
    pub android: bool,
}

impl ProjectOptions {
    pub fn new(level: LanguageLevel) -> Self {
        ProjectOptions {
            level,
            android: false,
        }
    }

    #[must_use]
    pub fn with_android(mut self, android: bool) -> Self {
        self.android = android;
        self
    }
}
