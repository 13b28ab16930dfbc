use std::str::FromStr;

use clapp::ParsedValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    Medium,
    High,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown level {0:?} (expected low, medium, or high)")]
pub struct UnknownLevel(String);

impl FromStr for Level {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Level::Low),
            "medium" => Ok(Level::Medium),
            "high" => Ok(Level::High),
            other => Err(UnknownLevel(other.to_owned())),
        }
    }
}

impl ParsedValue for Level {}
