use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AuthError;

const CREDENTIALS_FILE_NAME: &str = "credentials";
const TOKEN_ENV: &str = "KOTOBA_AUTH__TOKEN";

/// Store an access token in `~/.kotoba/credentials`.
///
/// # Errors
///
/// Returns `AuthError::TokenStore` if the file cannot be written.
pub fn store(token: &str) -> Result<(), AuthError> {
    store_at(&credentials_path()?, token)
}

/// Load a token. Priority: `KOTOBA_AUTH__TOKEN` env -> file (`~/.kotoba/credentials`).
#[must_use]
pub fn load() -> Option<String> {
    if let Ok(token) = std::env::var(TOKEN_ENV)
        && !token.is_empty()
    {
        return Some(token);
    }
    credentials_path().ok().and_then(|path| load_at(&path))
}

/// Delete the credentials file.
///
/// # Errors
///
/// Returns `AuthError::TokenStore` if the credentials file cannot be removed.
pub fn delete() -> Result<(), AuthError> {
    delete_at(&credentials_path()?)
}

/// Detect which tier the current token came from (for status display).
#[must_use]
pub fn detect_token_source() -> Option<&'static str> {
    if std::env::var(TOKEN_ENV).is_ok_and(|t| !t.is_empty()) {
        return Some("env");
    }
    if credentials_path().ok().and_then(|path| load_at(&path)).is_some() {
        return Some("file");
    }
    None
}

fn credentials_path() -> Result<PathBuf, AuthError> {
    dirs::home_dir()
        .map(|h| h.join(".kotoba").join(CREDENTIALS_FILE_NAME))
        .ok_or_else(|| {
            AuthError::TokenStore("home directory not found, cannot store credentials".into())
        })
}

pub(crate) fn store_at(path: &Path, token: &str) -> Result<(), AuthError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| AuthError::TokenStore(format!("mkdir {}: {e}", parent.display())))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) = fs::set_permissions(parent, fs::Permissions::from_mode(0o700)) {
                tracing::warn!("failed to chmod 0700 {}: {e}", parent.display());
            }
        }
    }
    fs::write(path, token)
        .map_err(|e| AuthError::TokenStore(format!("write {}: {e}", path.display())))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))
            .map_err(|e| AuthError::TokenStore(format!("chmod {}: {e}", path.display())))?;
    }

    Ok(())
}

pub(crate) fn load_at(path: &Path) -> Option<String> {
    fs::read_to_string(path)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub(crate) fn delete_at(path: &Path) -> Result<(), AuthError> {
    if path.exists() {
        fs::remove_file(path).map_err(|e| {
            AuthError::TokenStore(format!("failed to delete {}: {e}", path.display()))
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_path_is_under_home() {
        let path = credentials_path().expect("should resolve");
        assert!(path.ends_with(".kotoba/credentials"));
    }

    #[test]
    fn file_store_load_delete_cycle() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let creds_path = tmp.path().join("nested").join("credentials");

        store_at(&creds_path, "test_jwt_abc123").expect("store");
        assert_eq!(load_at(&creds_path).as_deref(), Some("test_jwt_abc123"));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&creds_path)
                .expect("metadata")
                .permissions()
                .mode()
                & 0o777;
            assert_eq!(mode, 0o600, "credentials file should be 0600");
        }

        delete_at(&creds_path).expect("delete");
        assert!(!creds_path.exists());
        // Deleting twice is fine.
        delete_at(&creds_path).expect("delete again");
    }

    #[test]
    fn load_ignores_whitespace_only_content() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let creds_path = tmp.path().join("credentials");

        fs::write(&creds_path, "   \n  ").expect("write");
        assert!(load_at(&creds_path).is_none());
    }

    #[test]
    fn load_trims_trailing_newline() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let creds_path = tmp.path().join("credentials");

        fs::write(&creds_path, "abc.def.ghi\n").expect("write");
        assert_eq!(load_at(&creds_path).as_deref(), Some("abc.def.ghi"));
    }
}
