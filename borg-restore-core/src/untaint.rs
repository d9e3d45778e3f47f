// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

use crate::error::{Error, Result};

/// Untaint a user-supplied path before it reaches the filesystem or a
/// subprocess.
///
/// The pattern is deliberately permissive: any non-empty string without a
/// NUL byte is a legal path inside an archive.
pub fn untaint_path(path: &str) -> Result<&str> {
    if path.is_empty() || path.contains('\0') {
        return Err(Error::InvalidPath(path.to_string()));
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_ordinary_paths() {
        assert!(untaint_path("/etc/fstab").is_ok());
        assert!(untaint_path("home/user/file with spaces").is_ok());
        assert!(untaint_path("weird\"quotes'and`ticks").is_ok());
    }

    #[test]
    fn test_rejects_empty_and_nul() {
        assert!(untaint_path("").is_err());
        assert!(untaint_path("foo\0bar").is_err());
    }
}
