//! Storia API Library
//!
//! HTTP handlers, application state and setup for the story-generator service.

mod api_doc;
pub mod auth;
pub mod constants;
pub mod error;
mod handlers;
pub mod setup;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use state::{AppState, Providers};
