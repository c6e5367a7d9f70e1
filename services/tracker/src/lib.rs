//! Issue tracker API service
//!
//! REST API for creating, listing, filtering and editing issues, with
//! cookie-based session authentication and a pass-through proxy to an
//! external AI chat service.

pub mod ai;
pub mod config;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod ownership;
pub mod repositories;
pub mod response;
pub mod routes;
pub mod session;
pub mod state;
pub mod validation;

pub use routes::create_router;
pub use state::AppState;
