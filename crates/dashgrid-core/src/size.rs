//! Size-string parsing for host configuration.
//!
//! Cell heights arrive from host configuration as CSS-style strings
//! (`"64px"`, `"6rem"`, `"10%"`) or bare numbers. Parsing fails fast with a
//! descriptive error; a malformed unit must surface at configuration time,
//! not as a silently wrong layout.

use std::fmt;
use std::str::FromStr;

/// Unit suffix of a parsed [`Length`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeUnit {
    /// Device pixels (the default for bare numbers).
    Px,
    Em,
    Rem,
    /// Percent of the container dimension.
    Percent,
    Vh,
    Vw,
    Cm,
    Mm,
}

impl SizeUnit {
    /// Canonical suffix string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Px => "px",
            Self::Em => "em",
            Self::Rem => "rem",
            Self::Percent => "%",
            Self::Vh => "vh",
            Self::Vw => "vw",
            Self::Cm => "cm",
            Self::Mm => "mm",
        }
    }
}

impl fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed size value with its unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length {
    pub value: f64,
    pub unit: SizeUnit,
}

impl Length {
    /// A pixel length.
    #[must_use]
    pub const fn px(value: f64) -> Self {
        Self {
            value,
            unit: SizeUnit::Px,
        }
    }
}

impl FromStr for Length {
    type Err = SizeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(SizeParseError::Empty);
        }

        let split = trimmed
            .find(|c: char| !c.is_ascii_digit() && c != '.' && c != '-' && c != '+')
            .unwrap_or(trimmed.len());
        let (number, suffix) = trimmed.split_at(split);

        let value: f64 = number.parse().map_err(|_| SizeParseError::InvalidNumber {
            input: trimmed.to_string(),
        })?;

        let unit = match suffix.trim().to_ascii_lowercase().as_str() {
            "" | "px" => SizeUnit::Px,
            "em" => SizeUnit::Em,
            "rem" => SizeUnit::Rem,
            "%" => SizeUnit::Percent,
            "vh" => SizeUnit::Vh,
            "vw" => SizeUnit::Vw,
            "cm" => SizeUnit::Cm,
            "mm" => SizeUnit::Mm,
            unknown => {
                return Err(SizeParseError::UnknownUnit {
                    input: trimmed.to_string(),
                    unit: unknown.to_string(),
                });
            }
        };

        Ok(Self { value, unit })
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit)
    }
}

/// Errors from size-string parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SizeParseError {
    /// Empty or whitespace-only input.
    Empty,
    /// The numeric prefix did not parse.
    InvalidNumber { input: String },
    /// The unit suffix is not recognized.
    UnknownUnit { input: String, unit: String },
}

impl fmt::Display for SizeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty size string"),
            Self::InvalidNumber { input } => {
                write!(f, "size string {input:?} has no valid numeric value")
            }
            Self::UnknownUnit { input, unit } => {
                write!(f, "size string {input:?} has unknown unit {unit:?}")
            }
        }
    }
}

impl std::error::Error for SizeParseError {}
