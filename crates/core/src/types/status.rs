//! Status and role enums shared with the backend.

use serde::{Deserialize, Serialize};

/// Account role.
///
/// Only `Admin` may use the admin dashboard; `Deliveryman` accounts exist for
/// the courier app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
    Deliveryman,
}

impl Role {
    /// Wire name of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
            Self::Deliveryman => "deliveryman",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            "deliveryman" => Ok(Self::Deliveryman),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Completed,
    Cancelled,
}

/// Home page section a category is shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryType {
    Featured,
    #[serde(rename = "Hot Categories")]
    HotCategories,
    #[serde(rename = "Top Categories")]
    TopCategories,
}

impl CategoryType {
    /// Display and wire name of the category type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Featured => "Featured",
            Self::HotCategories => "Hot Categories",
            Self::TopCategories => "Top Categories",
        }
    }
}

impl std::str::FromStr for CategoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Featured" => Ok(Self::Featured),
            "Hot Categories" => Ok(Self::HotCategories),
            "Top Categories" => Ok(Self::TopCategories),
            _ => Err(format!("invalid category type: {s}")),
        }
    }
}

/// Sort direction accepted by the paginated list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_str() {
        for role in [Role::Admin, Role::User, Role::Deliveryman] {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn test_category_type_wire_names() {
        let json = serde_json::to_string(&CategoryType::HotCategories).ok();
        assert_eq!(json.as_deref(), Some("\"Hot Categories\""));
    }

    #[test]
    fn test_order_status_lowercase() {
        let status: Result<OrderStatus, _> = serde_json::from_str("\"cancelled\"");
        assert_eq!(status.ok(), Some(OrderStatus::Cancelled));
    }
}
