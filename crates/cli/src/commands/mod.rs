//! Shell commands, one module per area of the dashboard.

pub mod catalog;
pub mod session;
pub mod shopper;
pub mod users;
