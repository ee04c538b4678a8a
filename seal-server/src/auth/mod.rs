//! Request identity and capability checks
//!
//! Authentication happens upstream. The gateway forwards the caller as
//! `X-User-Id` / `X-User-Role` headers; [`require_auth`] turns them into a
//! [`CurrentUser`] request extension and [`require_capability`] checks the
//! role policy per route group.

pub mod middleware;

pub use middleware::{CurrentUser, ROLE_HEADER, USER_ID_HEADER, require_auth, require_capability};
