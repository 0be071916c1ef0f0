//! Error type shared by the interactive binaries.

use strava_export_client::StravaError;
use thiserror::Error;

/// Exit status for a missing or unusable configuration.
pub const EXIT_CONFIG: u8 = 2;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Strava(#[from] StravaError),

    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

impl CliError {
    /// What the user can do about it, when there is something.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            CliError::Strava(StravaError::Config(_)) => Some(
                "Add STRAVA_CLIENT_ID and STRAVA_ACCESS_TOKEN to your .env file (see .env.example).",
            ),
            CliError::Strava(StravaError::Auth(_)) => Some(
                "Your access token was rejected. Generate a new one with activity:read_all scope and update .env.",
            ),
            CliError::Strava(StravaError::RateLimited(_)) => {
                Some("Strava rate limit reached. Wait for the 15-minute window to reset and try again.")
            }
            CliError::Strava(StravaError::InvalidDate(_)) => {
                Some("Dates use the YYYY-MM-DD form and the start must not be after the end.")
            }
            CliError::Strava(StravaError::Transport(_)) => {
                Some("Check your network connection and try again.")
            }
            CliError::Strava(StravaError::Io { .. }) => {
                Some("Check that the destination directory exists and is writable.")
            }
            _ => None,
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Strava(StravaError::Config(_)) => EXIT_CONFIG,
            _ => 1,
        }
    }

    /// One line for the error, one for the hint, both on stderr.
    pub fn report(&self) {
        eprintln!("✗ {self}");
        if let Some(hint) = self.hint() {
            eprintln!("  {hint}");
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use strava_export_client::RateLimit;

    #[test]
    fn config_errors_exit_with_two() {
        let err = CliError::from(StravaError::Config("missing STRAVA_ACCESS_TOKEN".into()));
        assert_eq!(err.exit_code(), EXIT_CONFIG);
        assert!(err.hint().unwrap().contains(".env"));
        assert_eq!(
            err.to_string(),
            "configuration error: missing STRAVA_ACCESS_TOKEN"
        );
    }

    #[test]
    fn runtime_failures_exit_with_one() {
        let err = CliError::from(StravaError::RateLimited(RateLimit::default()));
        assert_eq!(err.exit_code(), 1);
        assert!(err.hint().unwrap().contains("Wait"));

        let err = CliError::from(std::io::Error::other("closed"));
        assert_eq!(err.exit_code(), 1);
        assert!(err.hint().is_none());
    }
}
