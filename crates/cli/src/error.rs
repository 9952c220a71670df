//! Errors surfaced by shell commands.

use babyshop_client::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] babyshop_client::ConfigError),

    #[error("{}", .0.user_message())]
    Api(#[from] ApiError),

    #[error("Access denied: {email} is not an admin")]
    NotAdmin { email: String },

    #[error("Not signed in. Run `babyshop login` first")]
    NotSignedIn,

    #[error("Cart subtotal is too large to compute")]
    CartTotal,

    #[error("Failed to write output: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    /// Process exit code for the error.
    ///
    /// `2` means the session is missing or was rejected, so scripts can
    /// prompt for a new login.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::NotSignedIn | Self::NotAdmin { .. } => 2,
            Self::Api(e) if e.is_unauthorized() => 2,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_exit_code() {
        let err = CliError::Api(ApiError::Unauthorized {
            endpoint: "/auth/profile".to_string(),
            message: Some("Token expired".to_string()),
        });
        assert_eq!(err.exit_code(), 2);
        assert_eq!(CliError::NotSignedIn.exit_code(), 2);
    }

    #[test]
    fn test_other_errors_exit_one() {
        let err = CliError::Api(ApiError::InvalidQuery("bad".to_string()));
        assert_eq!(err.exit_code(), 1);
    }
}
