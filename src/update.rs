use std::fmt;
use std::fs;
use std::io;
use std::time::Duration;

use thiserror::Error;

const REPO: &str = "ghpc-dev/ghpc";
const BIN_NAME: &str = "ghpc";
const USER_AGENT: &str = concat!("ghpc/", env!("CARGO_PKG_VERSION"));

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    /// Parses `1.2.3` or `v1.2.3`. Anything else is rejected.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim().trim_start_matches('v');
        let mut parts = trimmed.split('.');
        let major = parts.next()?.parse::<u64>().ok()?;
        let minor = parts.next()?.parse::<u64>().ok()?;
        let patch = parts.next()?.parse::<u64>().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self { major, minor, patch })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UpdateAvailable {
    pub current: Version,
    pub latest: Version,
    pub latest_tag: String,
}

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("failed to fetch latest release: {0}")]
    FetchLatest(String),

    #[error("invalid release tag: {0}")]
    InvalidTag(String),

    #[error("unsupported platform for self-update: {0}")]
    UnsupportedPlatform(String),

    #[error("failed to download release asset: {0}")]
    Download(String),

    #[error("failed to locate current executable: {0}")]
    CurrentExe(String),

    #[error("failed to install update to {path}: {source}")]
    Install { path: String, source: io::Error },
}

#[derive(Debug, serde::Deserialize)]
struct LatestRelease {
    tag_name: String,
}

/// Prints the outcome of an update attempt; used by the `update` subcommand.
pub async fn run() -> color_eyre::eyre::Result<()> {
    println!("Checking for updates...");
    match self_update().await {
        Ok(None) => {
            println!("ghpc {} is already the latest version", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Ok(Some(update)) => {
            println!("Updated ghpc {} -> {}", update.current, update.latest);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn check_for_update(current_version: &str) -> Result<Option<UpdateAvailable>, UpdateError> {
    let current = Version::parse(current_version)
        .ok_or_else(|| UpdateError::InvalidTag(format!("current version: {current_version}")))?;

    let release = fetch_latest_release().await?;
    let latest = Version::parse(&release.tag_name)
        .ok_or_else(|| UpdateError::InvalidTag(release.tag_name.clone()))?;
    if latest <= current {
        return Ok(None);
    }

    Ok(Some(UpdateAvailable {
        current,
        latest,
        latest_tag: release.tag_name,
    }))
}

pub async fn self_update() -> Result<Option<UpdateAvailable>, UpdateError> {
    let Some(update) = check_for_update(env!("CARGO_PKG_VERSION")).await? else {
        return Ok(None);
    };

    let binary = download_release_binary(&update.latest_tag).await?;
    install_binary(&binary)?;
    Ok(Some(update))
}

async fn fetch_latest_release() -> Result<LatestRelease, UpdateError> {
    let url = format!("https://api.github.com/repos/{REPO}/releases/latest");
    let response = reqwest::Client::new()
        .get(&url)
        .header("User-Agent", USER_AGENT)
        .header("Accept", "application/vnd.github+json")
        .timeout(Duration::from_secs(10))
        .send()
        .await
        .map_err(|e| UpdateError::FetchLatest(e.to_string()))?;

    if !response.status().is_success() {
        return Err(UpdateError::FetchLatest(format!(
            "status {}",
            response.status().as_u16()
        )));
    }

    response
        .json::<LatestRelease>()
        .await
        .map_err(|e| UpdateError::FetchLatest(e.to_string()))
}

async fn download_release_binary(tag: &str) -> Result<Vec<u8>, UpdateError> {
    let target = resolve_target_triple()?;
    let asset = format!("{BIN_NAME}-{target}");
    let url = format!("https://github.com/{REPO}/releases/download/{tag}/{asset}");

    let response = reqwest::Client::new()
        .get(&url)
        .header("User-Agent", USER_AGENT)
        .timeout(Duration::from_secs(60))
        .send()
        .await
        .map_err(|e| UpdateError::Download(e.to_string()))?;

    if !response.status().is_success() {
        return Err(UpdateError::Download(format!(
            "{asset}: status {}",
            response.status().as_u16()
        )));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| UpdateError::Download(e.to_string()))?;
    Ok(bytes.to_vec())
}

fn resolve_target_triple() -> Result<&'static str, UpdateError> {
    if cfg!(target_os = "macos") {
        if cfg!(target_arch = "aarch64") {
            return Ok("aarch64-apple-darwin");
        }
        if cfg!(target_arch = "x86_64") {
            return Ok("x86_64-apple-darwin");
        }
        return Err(UpdateError::UnsupportedPlatform(
            "unsupported CPU architecture on macOS".to_string(),
        ));
    }

    if cfg!(target_os = "linux") {
        if cfg!(target_arch = "x86_64") {
            return Ok("x86_64-unknown-linux-gnu");
        }
        if cfg!(target_arch = "aarch64") {
            return Ok("aarch64-unknown-linux-gnu");
        }
        return Err(UpdateError::UnsupportedPlatform(
            "unsupported CPU architecture on Linux".to_string(),
        ));
    }

    Err(UpdateError::UnsupportedPlatform(
        "self-update is only supported on macOS/Linux (grab a release manually)".to_string(),
    ))
}

/// Writes the new binary next to the current executable, then renames over
/// it so the swap is atomic on the same filesystem.
fn install_binary(bytes: &[u8]) -> Result<(), UpdateError> {
    let exe = std::env::current_exe().map_err(|e| UpdateError::CurrentExe(e.to_string()))?;
    let staging = exe.with_extension("update-tmp");

    let to_install_err = |source: io::Error| UpdateError::Install {
        path: exe.display().to_string(),
        source,
    };

    fs::write(&staging, bytes).map_err(to_install_err)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&staging, fs::Permissions::from_mode(0o755)).map_err(to_install_err)?;
    }
    fs::rename(&staging, &exe).map_err(to_install_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_plain_version() {
        assert_eq!(
            Version::parse("1.2.3"),
            Some(Version { major: 1, minor: 2, patch: 3 })
        );
    }

    #[test]
    fn parse_strips_v_prefix() {
        assert_eq!(
            Version::parse("v0.4.2"),
            Some(Version { major: 0, minor: 4, patch: 2 })
        );
    }

    #[test]
    fn parse_rejects_extra_components() {
        assert_eq!(Version::parse("1.2.3.4"), None);
        assert_eq!(Version::parse("1.2"), None);
        assert_eq!(Version::parse("nightly"), None);
    }

    #[test]
    fn version_ordering() {
        let old = Version::parse("0.4.2").unwrap();
        let patch = Version::parse("0.4.3").unwrap();
        let minor = Version::parse("0.5.0").unwrap();
        let major = Version::parse("1.0.0").unwrap();
        assert!(old < patch);
        assert!(patch < minor);
        assert!(minor < major);
        assert!(old == Version::parse("v0.4.2").unwrap());
    }

    #[test]
    fn version_displays_as_semver() {
        assert_eq!(Version::parse("v1.2.3").unwrap().to_string(), "1.2.3");
    }

    #[test]
    fn latest_release_deserializes() {
        let release: LatestRelease =
            serde_json::from_str(r#"{"tag_name": "v0.5.0", "name": "ghpc 0.5.0"}"#).unwrap();
        assert_eq!(release.tag_name, "v0.5.0");
    }
}
