//! Security limits and configuration

use crate::error::{Error, Result};

/// Security limits applied while reading and binding identities
#[derive(Debug, Clone)]
pub struct Limits {
    /// Maximum nesting of objects and arrays (default: 128, hard: 256)
    pub max_depth: usize,
    /// Maximum length of a single string or member name (default: 16 MiB, hard: 64 MiB)
    pub max_string_len: usize,
    /// Maximum identities bound or pending in one decode call (default: 1,000,000, hard: 16,777,216)
    pub max_bindings: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: 128,
            max_string_len: 16 * 1024 * 1024,
            max_bindings: 1_000_000,
        }
    }
}

impl Limits {
    /// Hard maximum limits that cannot be exceeded
    pub fn hard_maximums() -> Self {
        Self {
            max_depth: 256,
            max_string_len: 64 * 1024 * 1024,
            max_bindings: 16 * 1024 * 1024,
        }
    }

    /// Validate limits against hard maximums
    pub fn validate(&self) -> Result<()> {
        let hard = Self::hard_maximums();

        if self.max_depth == 0 {
            return Err(Error::Configuration("max_depth must be at least 1".to_string()));
        }
        if self.max_depth > hard.max_depth {
            return Err(Error::Configuration(format!(
                "max_depth {} exceeds hard limit {}",
                self.max_depth, hard.max_depth
            )));
        }
        if self.max_string_len > hard.max_string_len {
            return Err(Error::Configuration(format!(
                "max_string_len {} exceeds hard limit {}",
                self.max_string_len, hard.max_string_len
            )));
        }
        if self.max_bindings > hard.max_bindings {
            return Err(Error::Configuration(format!(
                "max_bindings {} exceeds hard limit {}",
                self.max_bindings, hard.max_bindings
            )));
        }

        Ok(())
    }
}
