//! User administration and dashboard stats.

use babyshop_client::ShopApi;
use babyshop_core::{Registration, Role, UserId, UserUpdate};
use clap::Subcommand;
use serde_json::Value;

use crate::error::CliError;

#[derive(Debug, Subcommand)]
pub enum UserAction {
    /// List every account
    List,
    /// Show one account
    Get { id: String },
    /// Create an account with a chosen role
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "BABYSHOP_NEW_PASSWORD", hide_env_values = true)]
        password: String,
        /// admin, user or deliveryman
        #[arg(long, default_value = "user")]
        role: Role,
    },
    /// Edit an account; the password only changes when given
    Update {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        role: Role,
        #[arg(long)]
        avatar: Option<String>,
    },
    /// Delete an account
    Delete { id: String },
}

/// # Errors
///
/// Returns `CliError::Api` for invalid input or a failed call.
pub async fn users(api: &ShopApi, action: UserAction) -> Result<Value, CliError> {
    let value = match action {
        UserAction::List => serde_json::to_value(api.users().await?)?,
        UserAction::Get { id } => serde_json::to_value(api.user(&UserId::from(id)).await?)?,
        UserAction::Create {
            name,
            email,
            password,
            role,
        } => {
            let registration = Registration {
                name,
                email,
                password,
                role,
            };
            serde_json::to_value(api.create_user(&registration).await?)?
        }
        UserAction::Update {
            id,
            name,
            email,
            password,
            role,
            avatar,
        } => {
            let update = UserUpdate {
                name,
                email,
                password,
                role,
                avatar,
            };
            serde_json::to_value(api.update_user(&UserId::from(id), &update).await?)?
        }
        UserAction::Delete { id } => serde_json::to_value(api.delete_user(&UserId::from(id)).await?)?,
    };
    Ok(value)
}

/// # Errors
///
/// Returns `CliError::Api` if the call fails.
pub async fn stats(api: &ShopApi) -> Result<Value, CliError> {
    Ok(serde_json::to_value(api.stats().await?)?)
}
