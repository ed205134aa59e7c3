//! The classification a validation policy produces.

use std::fmt;

/// How suitable a candidate destination is for teleporting.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ValidationResult {
    /// Nothing was evaluated.
    #[default]
    None,
    /// Evaluated and accepted as a free-form destination.
    Valid,
    /// Evaluated and rejected.
    Invalid,
    /// Evaluated and accepted as an anchor destination.
    Anchor,
}

impl ValidationResult {
    /// `true` for the two accepting outcomes.
    #[inline]
    pub fn is_acceptable(self) -> bool {
        matches!(self, ValidationResult::Valid | ValidationResult::Anchor)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ValidationResult::None    => "none",
            ValidationResult::Valid   => "valid",
            ValidationResult::Invalid => "invalid",
            ValidationResult::Anchor  => "anchor",
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
