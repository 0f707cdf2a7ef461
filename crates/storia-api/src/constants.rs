//! HTTP surface constants.

/// Prefix for the extension's auxiliary endpoints
pub const API_PREFIX: &str = "/api";

/// Cookie carrying the extension session id
pub const SESSION_COOKIE: &str = "ext_session";

/// Header alternative to [`SESSION_COOKIE`]
pub const SESSION_HEADER: &str = "x-ext-session";

/// Webhook signature header set by the commerce platform
pub const WEBHOOK_SIGNATURE_HEADER: &str = "x-fp-signature";

/// How often expired pending publishes are purged
pub const PENDING_PURGE_INTERVAL_SECS: u64 = 60;
