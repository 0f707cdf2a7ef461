//! Storia Services Layer
//!
//! Orchestration for the two workflows the extension offers: turning selected
//! products into a creative bundle, and publishing a confirmed bundle as an
//! Instagram story. Also hosts the in-memory stores those workflows share.
//! HTTP handling stays in storia-api.

pub mod generation;
pub mod pending;
mod prompt;
pub mod publish;
pub mod session;

pub use generation::ContentGenerationOrchestrator;
pub use pending::PendingPublishStore;
pub use prompt::{build_image_prompt, build_text_prompt};
pub use publish::{compose_stickers, PublishAttempt, PublishOrchestrator};
pub use session::{require_session, InMemorySessionStore, SessionStore};
