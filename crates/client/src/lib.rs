//! API access, session and checkout layer shared by the Babyshop frontends.
//!
//! # Architecture
//!
//! - [`config`] resolves the backend base URL for a frontend and execution context
//! - [`http`] is the transport: headers, timeout, typed errors, no side effects
//! - [`navigation`] decides what a `401` means for the stored session
//! - [`api`] exposes every backend endpoint through [`ShopApi`]
//! - [`guard`] protects server-rendered routes with a profile verification call
//! - [`checkout`] creates hosted payment sessions
//!
//! The session lives in an explicit [`SessionStore`] handed to the client; nothing
//! here reads ambient global state.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cache;
pub mod checkout;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod guard;
pub mod http;
pub mod navigation;
pub mod query;
pub mod session;

pub use api::ShopApi;
pub use cache::CatalogCache;
pub use config::{ApiConfig, ConfigError, ExecutionContext, Frontend};
pub use error::ApiError;
pub use guard::{GuardDecision, GuardOutcome, GuardState, SessionGuard};
pub use http::ApiClient;
pub use navigation::{Navigator, UnauthorizedPolicy};
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionStore};
