//! Request extractors and route layers.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated, active user from the
//!   `jwt_token` cookie or a Bearer token.
//! - [`rate_limit::RateLimitLayer`] -- Per-IP throttle for `/auth/login`.

pub mod auth;
pub mod rate_limit;
