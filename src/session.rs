// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Local storage of the active session token between invocations.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub fn token_path() -> Result<PathBuf> {
    Ok(crate::db::data_dir()?.join("session"))
}

pub fn load_token(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Read session file {}", path.display()))?;
    let token = raw.trim();
    Ok((!token.is_empty()).then(|| token.to_string()))
}

/// Writes the token to a file readable only by its owner.
pub fn store_token(path: &Path, token: &str) -> Result<()> {
    let mut opts = fs::OpenOptions::new();
    opts.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(0o600);
    }
    let mut file = opts
        .open(path)
        .with_context(|| format!("Open session file {}", path.display()))?;
    // a pre-existing file keeps its old mode
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(token.as_bytes())
        .with_context(|| format!("Write session file {}", path.display()))?;
    Ok(())
}

pub fn clear_token(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path)
            .with_context(|| format!("Remove session file {}", path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn token_file_lifecycle() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session");
        assert_eq!(load_token(&path).unwrap(), None);
        store_token(&path, "abc123").unwrap();
        assert_eq!(load_token(&path).unwrap().as_deref(), Some("abc123"));
        clear_token(&path).unwrap();
        assert_eq!(load_token(&path).unwrap(), None);
        clear_token(&path).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn token_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempdir().unwrap();
        let path = dir.path().join("session");
        store_token(&path, "fresh").unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
        store_token(&path, "rotated").unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(load_token(&path).unwrap().as_deref(), Some("rotated"));
    }
}
