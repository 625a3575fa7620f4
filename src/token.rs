use std::fs;
use std::io;
use std::path::PathBuf;

pub const TOKEN_ENV_VAR: &str = "GHPC_GITHUB_TOKEN";

/// Where a token was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Env,
    Store,
}

fn store_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("ghpc").join("token"))
}

/// Retrieves the token from the environment variable or the on-disk store.
/// The environment variable wins.
pub fn get_token() -> Option<(String, TokenSource)> {
    let env = std::env::var(TOKEN_ENV_VAR).ok();
    let stored = store_path().and_then(|p| fs::read_to_string(p).ok());
    resolve(env.as_deref(), stored.as_deref())
}

fn resolve(env: Option<&str>, stored: Option<&str>) -> Option<(String, TokenSource)> {
    if let Some(token) = env.map(str::trim).filter(|t| !t.is_empty()) {
        return Some((token.to_string(), TokenSource::Env));
    }
    stored
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| (t.to_string(), TokenSource::Store))
}

/// Saves the token to the on-disk store, readable only by the owner.
pub fn save_token(token: &str) -> io::Result<()> {
    let Some(path) = store_path() else {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            "no user config directory",
        ));
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, token)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}

/// Removes the stored token. Missing file is not an error.
pub fn delete_token() -> io::Result<()> {
    let Some(path) = store_path() else {
        return Ok(());
    };
    match fs::remove_file(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn env_token_wins_over_store() {
        let got = resolve(Some("ghp_env"), Some("ghp_stored"));
        assert_eq!(got, Some(("ghp_env".to_string(), TokenSource::Env)));
    }

    #[test]
    fn stored_token_used_when_env_missing() {
        let got = resolve(None, Some("ghp_stored\n"));
        assert_eq!(got, Some(("ghp_stored".to_string(), TokenSource::Store)));
    }

    #[test]
    fn blank_env_falls_through_to_store() {
        let got = resolve(Some("   "), Some("ghp_stored"));
        assert_eq!(got, Some(("ghp_stored".to_string(), TokenSource::Store)));
    }

    #[test]
    fn nothing_found() {
        assert_eq!(resolve(None, None), None);
        assert_eq!(resolve(Some(""), Some("  \n")), None);
    }
}
