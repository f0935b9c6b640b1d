//! Request extractors that gate access to dashboard endpoints.
//!
//! - [`auth::DashboardAccess`] -- Requires the configured dashboard bearer token.

pub mod auth;
