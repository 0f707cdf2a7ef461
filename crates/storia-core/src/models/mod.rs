//! Data models for the application
//!
//! Each sub-module represents one feature area: catalog products and the
//! generation inputs built from them, the creative bundle produced by generation,
//! the publish flow, and extension sessions.

mod creative;
mod product;
mod publish;
mod session;

pub use creative::*;
pub use product::*;
pub use publish::*;
pub use session::*;
