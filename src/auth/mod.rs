//! # Auth Module
//!
//! Access guard for every protected route:
//! - Bearer token validation against the identity provider's signing secret
//! - Principal to user resolution (created on first contact)
//! - Per-request plan resolution from subscription state

pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

#[cfg(test)]
mod tests;

pub use extractors::AuthedUser;
pub use models::Plan;
pub use routes::auth_routes;
