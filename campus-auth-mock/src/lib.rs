//! Mock marketplace backend
//!
//! In-memory stand-in for the hosted backend-as-a-service: auth endpoints,
//! the role→permission join query, course resources and custom pages.
//! Used by integration tests and runnable as a standalone binary for
//! frontend development.
//!
//! The mock re-checks authorization server-side on every mutation; the
//! client-side guard is UX only and is never trusted here.

pub mod api;
pub mod state;

pub use api::router;
pub use state::{AppState, MockUser};
