//! Pre-dispatch form validation.
//!
//! Every form is checked before anything is sent to the backend, so invalid
//! input never reaches the network layer. Validation collects every failing
//! field rather than stopping at the first one, and the messages are the ones
//! shown next to the form fields.

use std::fmt;

use rust_decimal::Decimal;

use crate::account::{Credentials, Registration, UserUpdate};
use crate::catalog::{BannerInput, BrandInput, CategoryInput, ProductInput};
use crate::types::Email;

/// A single failing field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// All failing fields of one form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", format_field_errors(.0))]
pub struct ValidationError(pub Vec<FieldError>);

impl ValidationError {
    /// Failing fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    /// Message for one field, if it failed.
    #[must_use]
    pub fn message_for(&self, field: &str) -> Option<&'static str> {
        self.0.iter().find(|e| e.field == field).map(|e| e.message)
    }
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// A form that can be checked before dispatch.
pub trait Validate {
    /// # Errors
    ///
    /// Returns every failing field.
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Accumulates field errors for one form.
#[derive(Default)]
struct Checks(Vec<FieldError>);

impl Checks {
    fn require(&mut self, ok: bool, field: &'static str, message: &'static str) -> &mut Self {
        if !ok {
            self.0.push(FieldError { field, message });
        }
        self
    }

    fn email(&mut self, field: &'static str, value: &str) -> &mut Self {
        self.require(
            Email::parse(value).is_ok(),
            field,
            "Please enter a valid email address",
        )
    }

    fn finish(&mut self) -> Result<(), ValidationError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationError(std::mem::take(&mut self.0)))
        }
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

impl Validate for Credentials {
    fn validate(&self) -> Result<(), ValidationError> {
        Checks::default()
            .email("email", &self.email)
            .require(!self.password.is_empty(), "password", "You have to enter a password")
            .finish()
    }
}

impl Validate for Registration {
    fn validate(&self) -> Result<(), ValidationError> {
        Checks::default()
            .require(char_len(&self.name) >= 2, "name", "Name must be at least 2 characters")
            .email("email", &self.email)
            .require(
                char_len(&self.password) >= 6,
                "password",
                "Password must be at least 6 characters",
            )
            .finish()
    }
}

impl Validate for UserUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        Checks::default()
            .require(char_len(&self.name) >= 2, "name", "Name must be at least 2 characters")
            .email("email", &self.email)
            .require(
                self.password.as_deref().is_none_or(|p| char_len(p) >= 6),
                "password",
                "Password must be at least 6 characters",
            )
            .finish()
    }
}

impl Validate for BrandInput {
    fn validate(&self) -> Result<(), ValidationError> {
        Checks::default()
            .require(char_len(&self.name) >= 2, "name", "Name must be at least 2 characters")
            .finish()
    }
}

impl Validate for CategoryInput {
    fn validate(&self) -> Result<(), ValidationError> {
        Checks::default()
            .require(!self.name.is_empty(), "name", "Name is required")
            .finish()
    }
}

impl Validate for ProductInput {
    fn validate(&self) -> Result<(), ValidationError> {
        Checks::default()
            .require(char_len(&self.name) >= 2, "name", "Name must be at least 2 characters")
            .require(
                char_len(&self.description) >= 10,
                "description",
                "Description must be at least 10 characters",
            )
            .require(
                self.price >= Decimal::ZERO,
                "price",
                "Price must be a positive number",
            )
            .require(
                (Decimal::ZERO..=Decimal::ONE_HUNDRED).contains(&self.discount_percentage),
                "discountPercentage",
                "Discount must be between 0 and 100",
            )
            .require(self.stock >= 0, "stock", "Stock cannot be negative")
            .require(
                !self.category.as_str().is_empty(),
                "category",
                "Please select a category",
            )
            .require(!self.brand.as_str().is_empty(), "brand", "Please select a brand")
            .require(!self.image.is_empty(), "image", "Please upload an image")
            .finish()
    }
}

impl Validate for BannerInput {
    fn validate(&self) -> Result<(), ValidationError> {
        Checks::default()
            .require(!self.name.is_empty(), "name", "Name is required")
            .require(!self.title.is_empty(), "title", "Title is required")
            .require(
                self.start_from >= Decimal::ZERO,
                "startFrom",
                "StartFrom must be a positive number",
            )
            .require(!self.image.is_empty(), "image", "Image is required")
            .require(!self.banner_type.is_empty(), "bannerType", "Type is required")
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{BrandId, CategoryId, CategoryType, Role};

    #[test]
    fn test_credentials_valid() {
        let form = Credentials {
            email: "parent@babyshop.com".to_string(),
            password: "x".to_string(),
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_credentials_collects_all_errors() {
        let form = Credentials {
            email: "nope".to_string(),
            password: String::new(),
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err.fields().len(), 2);
        assert_eq!(
            err.message_for("email"),
            Some("Please enter a valid email address")
        );
        assert_eq!(err.message_for("password"), Some("You have to enter a password"));
    }

    #[test]
    fn test_registration_password_length() {
        let form = Registration {
            name: "Ada".to_string(),
            email: "ada@babyshop.com".to_string(),
            password: "12345".to_string(),
            role: Role::User,
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err.to_string(), "password: Password must be at least 6 characters");
    }

    #[test]
    fn test_user_update_without_password_is_valid() {
        let form = UserUpdate {
            name: "Ada".to_string(),
            email: "ada@babyshop.com".to_string(),
            password: None,
            role: Role::Deliveryman,
            avatar: None,
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_product_discount_bounds() {
        let form = ProductInput {
            name: "Crib".to_string(),
            description: "Solid wood crib".to_string(),
            price: Decimal::from(200),
            discount_percentage: Decimal::from(101),
            stock: 0,
            category: CategoryId::new("c1"),
            brand: BrandId::new(""),
            image: "crib.png".to_string(),
        };
        let err = form.validate().unwrap_err();
        assert!(err.message_for("discountPercentage").is_some());
        assert_eq!(err.message_for("brand"), Some("Please select a brand"));
        assert_eq!(err.message_for("price"), None);
    }

    #[test]
    fn test_category_and_brand() {
        let category = CategoryInput {
            name: String::new(),
            image: None,
            category_type: CategoryType::Featured,
        };
        assert_eq!(
            category.validate().unwrap_err().message_for("name"),
            Some("Name is required")
        );

        let brand = BrandInput {
            name: "N".to_string(),
            image: None,
        };
        assert!(brand.validate().is_err());
    }

    #[test]
    fn test_banner_negative_start() {
        let banner = BannerInput {
            name: "Summer".to_string(),
            title: "Summer sale".to_string(),
            start_from: Decimal::from(-1),
            image: "b.png".to_string(),
            banner_type: "hero".to_string(),
        };
        assert_eq!(
            banner.validate().unwrap_err().message_for("startFrom"),
            Some("StartFrom must be a positive number")
        );
    }
}
