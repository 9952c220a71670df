//! Babyshop Core - Shared records library.
//!
//! This crate provides the records exchanged with the Babyshop REST backend
//! and used by every frontend:
//! - `client` - API access, session and checkout layer
//! - `storefront` - Server-rendered storefront (route guard, checkout endpoint)
//! - `cli` - Admin shell over the same API
//!
//! # Architecture
//!
//! The core crate contains only types, conversions and form validation - no I/O,
//! no HTTP clients. The backend owns every record; these types only mirror the
//! JSON it returns (Mongo-style `_id` keys, camelCase fields).
//!
//! # Modules
//!
//! - [`types`] - Newtype ids, email, money and status enums
//! - [`catalog`] - Products, categories, brands, banners
//! - [`account`] - User snapshots and addresses
//! - [`commerce`] - Wishlist, cart and order snapshots
//! - [`validation`] - Pre-dispatch form validation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod account;
pub mod catalog;
pub mod commerce;
pub mod types;
pub mod validation;

pub use account::*;
pub use catalog::*;
pub use commerce::*;
pub use types::*;
pub use validation::{FieldError, Validate, ValidationError};
