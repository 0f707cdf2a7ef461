//! Storia Infrastructure Layer
//!
//! Cross-cutting HTTP middleware, payload signatures and tracing setup shared
//! by the API binary.

pub mod middleware;
pub mod signature;
pub mod telemetry;

pub use middleware::{
    get_request_id, request_id_middleware, security_headers_middleware, RequestId,
    SecurityHeadersConfig,
};
pub use signature::{sign_payload, verify_signature};
pub use telemetry::{init_telemetry, shutdown_telemetry};
