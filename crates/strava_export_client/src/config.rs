use crate::StravaError;
use crate::projector::ExportProfile;
use secrecy::SecretString;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_API_URL: &str = "https://www.strava.com/api/v3";
pub const DEFAULT_ENV_FILE: &str = ".env";

#[derive(Clone, Debug)]
pub struct Config {
    pub client_id: String,
    pub access_token: SecretString,
    pub base_url: String,
    pub output_dir: Option<PathBuf>,
    pub profile: ExportProfile,
}

impl Config {
    /// Load credentials from the `.env` file named by `STRAVA_ENV_FILE`
    /// (default `./.env`), with process environment variables taking
    /// precedence over the file.
    pub fn load() -> Result<Self, StravaError> {
        let path = std::env::var("STRAVA_ENV_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_ENV_FILE));
        Self::from_sources(&path, |k| std::env::var(k).ok())
    }

    /// Merge the key-value pairs of `path` with an override lookup.
    ///
    /// A missing file is not an error by itself; the required keys may
    /// still come from `overrides`.
    pub fn from_sources<F>(path: &Path, mut overrides: F) -> Result<Self, StravaError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let file_values = read_env_file(path)?;
        Self::from_env_with(|k| overrides(k).or_else(|| file_values.get(k).cloned())).map_err(
            |e| match e {
                StravaError::Config(msg) if file_values.is_empty() => {
                    StravaError::Config(format!("{msg} (no usable {})", path.display()))
                }
                other => other,
            },
        )
    }

    /// Testable helper that reads configuration values using the provided
    /// function. Blank values count as missing.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, StravaError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut lookup =
            |k: &str| get(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let client_id = lookup("STRAVA_CLIENT_ID")
            .ok_or_else(|| StravaError::Config("STRAVA_CLIENT_ID missing".into()))?;
        let token = lookup("STRAVA_ACCESS_TOKEN")
            .ok_or_else(|| StravaError::Config("STRAVA_ACCESS_TOKEN missing".into()))?;
        let base_url = lookup("STRAVA_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into());
        let output_dir = lookup("STRAVA_EXPORT_DIR").map(PathBuf::from);
        let profile = match lookup("STRAVA_EXPORT_PROFILE") {
            Some(name) => name.parse::<ExportProfile>()?,
            None => ExportProfile::default(),
        };

        Ok(Self {
            client_id,
            access_token: SecretString::new(token.into()),
            base_url,
            output_dir,
            profile,
        })
    }
}

fn read_env_file(path: &Path) -> Result<HashMap<String, String>, StravaError> {
    if !path.exists() {
        tracing::debug!("no env file at {}", path.display());
        return Ok(HashMap::new());
    }
    let iter = dotenvy::from_path_iter(path)
        .map_err(|e| StravaError::Config(format!("reading {}: {e}", path.display())))?;
    iter.map(|item| {
        item.map_err(|e| StravaError::Config(format!("parsing {}: {e}", path.display())))
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::io::Write;

    #[test]
    fn from_env_missing_token() {
        let get = |k: &str| match k {
            "STRAVA_CLIENT_ID" => Some("12345".into()),
            _ => None,
        };
        let err = Config::from_env_with(get).unwrap_err();
        assert!(err.to_string().contains("STRAVA_ACCESS_TOKEN"));
    }

    #[test]
    fn from_env_blank_client_id_is_missing() {
        let get = |k: &str| match k {
            "STRAVA_CLIENT_ID" => Some("   ".into()),
            "STRAVA_ACCESS_TOKEN" => Some("tok".into()),
            _ => None,
        };
        let err = Config::from_env_with(get).unwrap_err();
        assert!(matches!(err, StravaError::Config(ref m) if m.contains("STRAVA_CLIENT_ID")));
    }

    #[test]
    fn from_env_reads_values() {
        let get = |k: &str| match k {
            "STRAVA_CLIENT_ID" => Some("12345".into()),
            "STRAVA_ACCESS_TOKEN" => Some("sekrit".into()),
            "STRAVA_API_URL" => Some("http://localhost".into()),
            "STRAVA_EXPORT_PROFILE" => Some("compact".into()),
            _ => None,
        };
        let cfg = Config::from_env_with(get).expect("cfg");
        assert_eq!(cfg.client_id, "12345");
        assert_eq!(cfg.access_token.expose_secret(), "sekrit");
        assert_eq!(cfg.base_url, "http://localhost");
        assert_eq!(cfg.profile, ExportProfile::Compact);
        assert!(cfg.output_dir.is_none());
    }

    #[test]
    fn from_env_defaults() {
        let get = |k: &str| match k {
            "STRAVA_CLIENT_ID" => Some("1".into()),
            "STRAVA_ACCESS_TOKEN" => Some("t".into()),
            _ => None,
        };
        let cfg = Config::from_env_with(get).expect("cfg");
        assert_eq!(cfg.base_url, DEFAULT_API_URL);
        assert_eq!(cfg.profile, ExportProfile::Detailed);
    }

    #[test]
    fn unknown_profile_is_rejected() {
        let get = |k: &str| match k {
            "STRAVA_CLIENT_ID" => Some("1".into()),
            "STRAVA_ACCESS_TOKEN" => Some("t".into()),
            "STRAVA_EXPORT_PROFILE" => Some("everything".into()),
            _ => None,
        };
        assert!(matches!(
            Config::from_env_with(get),
            Err(StravaError::Config(_))
        ));
    }

    #[test]
    fn token_is_redacted_in_debug_output() {
        let get = |k: &str| match k {
            "STRAVA_CLIENT_ID" => Some("1".into()),
            "STRAVA_ACCESS_TOKEN" => Some("very-secret-token".into()),
            _ => None,
        };
        let cfg = Config::from_env_with(get).expect("cfg");
        assert!(!format!("{cfg:?}").contains("very-secret-token"));
    }

    #[test]
    fn reads_env_file_and_lets_overrides_win() {
        let mut file = tempfile::NamedTempFile::new().expect("tmp");
        writeln!(file, "STRAVA_CLIENT_ID=999").unwrap();
        writeln!(file, "STRAVA_ACCESS_TOKEN=from-file").unwrap();
        writeln!(file, "STRAVA_EXPORT_DIR=/tmp/exports").unwrap();

        let cfg = Config::from_sources(file.path(), |_| None).expect("cfg");
        assert_eq!(cfg.client_id, "999");
        assert_eq!(cfg.access_token.expose_secret(), "from-file");
        assert_eq!(cfg.output_dir, Some(PathBuf::from("/tmp/exports")));

        let cfg = Config::from_sources(file.path(), |k| {
            (k == "STRAVA_ACCESS_TOKEN").then(|| "from-env".to_string())
        })
        .expect("cfg");
        assert_eq!(cfg.access_token.expose_secret(), "from-env");
    }

    #[test]
    fn missing_file_without_overrides_is_config_error() {
        let dir = tempfile::tempdir().expect("tmpdir");
        let path = dir.path().join(".env");
        let err = Config::from_sources(&path, |_| None).unwrap_err();
        match err {
            StravaError::Config(msg) => {
                assert!(msg.contains("STRAVA_CLIENT_ID"));
                assert!(msg.contains(".env"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
