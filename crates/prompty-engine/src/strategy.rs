//! Per-tag error strategies.

use std::fmt;

/// How a resolver failure is turned into output (or propagated).
///
/// Selected by a tag's `onerror` attribute, falling back to the execution
/// context's default, falling back to [`ErrorStrategy::Throw`]. An
/// unrecognized strategy name also falls through to throw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorStrategy {
    /// Propagate the error and abort output
    #[default]
    Throw,
    /// Emit the tag's `default=` value (empty string if absent) and continue
    Default,
    /// Emit the empty string and continue
    Remove,
    /// Emit the tag's preserved source text and continue
    KeepRaw,
    /// Record a warning, emit the empty string, and continue
    Log,
}

impl ErrorStrategy {
    /// Parse a strategy name; `None` for unrecognized names
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "throw" => Some(ErrorStrategy::Throw),
            "default" => Some(ErrorStrategy::Default),
            "remove" => Some(ErrorStrategy::Remove),
            "keepraw" => Some(ErrorStrategy::KeepRaw),
            "log" => Some(ErrorStrategy::Log),
            _ => None,
        }
    }

    /// The canonical attribute spelling
    pub fn name(&self) -> &'static str {
        match self {
            ErrorStrategy::Throw => "throw",
            ErrorStrategy::Default => "default",
            ErrorStrategy::Remove => "remove",
            ErrorStrategy::KeepRaw => "keepraw",
            ErrorStrategy::Log => "log",
        }
    }
}

impl fmt::Display for ErrorStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_names_round_trip() {
        for strategy in [
            ErrorStrategy::Throw,
            ErrorStrategy::Default,
            ErrorStrategy::Remove,
            ErrorStrategy::KeepRaw,
            ErrorStrategy::Log,
        ] {
            assert_eq!(ErrorStrategy::from_name(strategy.name()), Some(strategy));
        }
    }

    #[test]
    fn unknown_name_is_none() {
        assert_eq!(ErrorStrategy::from_name("retry"), None);
        assert_eq!(ErrorStrategy::from_name("THROW"), None);
    }
}
