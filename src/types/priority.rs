//! Validated placement priority.

use crate::error::{AssemblerError, Result};

/// A placement priority in `1..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority(u8);

impl Priority {
    pub const MIN: i64 = 1;
    pub const MAX: i64 = 10;

    /// Multiplier spreading 1..=10 across the grey range.
    pub const SCALE: u8 = 23;

    /// Validate a raw priority for the named entry.
    pub fn new(entry: &str, value: i64) -> Result<Self> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(AssemblerError::Priority {
                entry: entry.to_string(),
                value,
            });
        }
        Ok(Self(value as u8))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// The innermost band value written to a priority mask.
    pub fn base_band(self) -> u8 {
        self.0 * Self::SCALE
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range() {
        assert_eq!(Priority::new("a", 1).unwrap().get(), 1);
        assert_eq!(Priority::new("a", 10).unwrap().base_band(), 230);
        assert!(Priority::new("a", 0).is_err());
        assert!(Priority::new("a", 11).is_err());
        assert!(Priority::new("a", -3).is_err());
    }

    #[test]
    fn test_error_names_entry() {
        let err = Priority::new("castle", 42).unwrap_err();
        assert_eq!(err.to_string(), "'castle' priority 42 out of acceptable range");
    }

    #[test]
    fn test_default_is_lowest() {
        assert_eq!(Priority::default().base_band(), 23);
    }
}
