// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Validated archive names.

use std::fmt;

use crate::error::{Error, Result};

/// The name of an archive in the backup repository.
///
/// Archive names end up in quoted SQL identifiers and in subprocess
/// argument vectors, so construction enforces the `[A-Za-z0-9:+.-]+`
/// whitelist. A value of this type is safe in both contexts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArchiveName(String);

impl ArchiveName {
    /// Validate and wrap an archive name.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() || !name.bytes().all(is_allowed) {
            return Err(Error::InvalidArchiveName(name));
        }
        Ok(Self(name))
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_allowed(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b':' | b'+' | b'.' | b'-')
}

impl fmt::Display for ArchiveName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ArchiveName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_typical_names() {
        assert_eq!(
            ArchiveName::new("abc-1234:5+1").unwrap().as_str(),
            "abc-1234:5+1"
        );
        assert!(ArchiveName::new("abc").is_ok());
        assert!(ArchiveName::new("host.example.org-2024-01-01T00:00:00").is_ok());
    }

    #[test]
    fn test_rejects_shell_metacharacters() {
        for name in ["a`b", "a\"b", "a'b", "a b", "a;b", "a/b", ""] {
            assert!(
                ArchiveName::new(name).is_err(),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_non_ascii() {
        assert!(ArchiveName::new("häst").is_err());
    }
}
