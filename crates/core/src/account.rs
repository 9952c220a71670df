//! Account records: user snapshots, credentials and addresses.

use serde::{Deserialize, Serialize};

use crate::types::{AddressId, Email, Role, UserId};

/// Denormalised user data kept alongside the session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSnapshot {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub name: String,
    pub email: Email,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub addresses: Vec<Address>,
}

impl UserSnapshot {
    /// Whether the user may use the admin dashboard.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// The address marked as default, if any.
    #[must_use]
    pub fn default_address(&self) -> Option<&Address> {
        self.addresses.iter().find(|address| address.is_default)
    }
}

/// Response of `POST /auth/login`: the user document plus its bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: UserSnapshot,
    pub token: String,
}

/// Sign-in form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Registration form, also used by the admin "create user" dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Admin "edit user" form; the password is only sent when changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Response of `GET /users`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserList {
    #[serde(default)]
    pub success: bool,
    pub users: Vec<UserSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(rename = "_id")]
    pub id: AddressId,
    pub street: String,
    pub city: String,
    pub country: String,
    pub postal_code: String,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressInput {
    pub street: String,
    pub city: String,
    pub country: String,
    pub postal_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
}

/// Partial address update; unset fields are left unchanged by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
}

/// Response of the address endpoints: the user's full address book.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddressBook {
    #[serde(default)]
    pub success: bool,
    pub addresses: Vec<Address>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_login_response_flattens_user() {
        let login: LoginResponse = serde_json::from_value(json!({
            "_id": "u1",
            "name": "Ada",
            "email": "ada@babyshop.com",
            "role": "admin",
            "addresses": [],
            "token": "jwt.token.value"
        }))
        .unwrap();

        assert_eq!(login.token, "jwt.token.value");
        assert_eq!(login.user.id.as_str(), "u1");
        assert!(login.user.is_admin());
    }

    #[test]
    fn test_default_address() {
        let user: UserSnapshot = serde_json::from_value(json!({
            "_id": "u1",
            "name": "Ada",
            "email": "ada@babyshop.com",
            "role": "user",
            "addresses": [
                { "_id": "a1", "street": "1 Main", "city": "Oslo", "country": "NO", "postalCode": "0150", "isDefault": false },
                { "_id": "a2", "street": "2 Side", "city": "Oslo", "country": "NO", "postalCode": "0151", "isDefault": true }
            ]
        }))
        .unwrap();

        assert_eq!(user.default_address().map(|a| a.id.as_str()), Some("a2"));
        assert!(!user.is_admin());
    }

    #[test]
    fn test_address_patch_omits_unset_fields() {
        let patch = AddressPatch {
            city: Some("Bergen".to_string()),
            ..AddressPatch::default()
        };
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({ "city": "Bergen" }));
    }
}
