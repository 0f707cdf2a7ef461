//! Fixed values shared across the generation and publish flows.

/// Literal substituted when a product has no brand name.
pub const UNKNOWN_BRAND: &str = "Unknown Brand";

/// Literal substituted when a product has no category.
pub const UNKNOWN_CATEGORY: &str = "Unknown Category";

/// Upper bound on products in a single generation request.
pub const MAX_PRODUCTS_PER_REQUEST: usize = 5;

/// Number of captions a complete creative bundle carries.
pub const BUNDLE_CAPTION_COUNT: usize = 5;

/// Number of hashtags a complete creative bundle carries.
pub const BUNDLE_HASHTAG_COUNT: usize = 5;

/// Link sticker text used when the caller supplies none.
pub const DEFAULT_LINK_TEXT: &str = "Shop Now";

/// Scopes requested from Instagram during authorization.
pub const INSTAGRAM_PUBLISH_SCOPES: &str =
    "instagram_business_basic,instagram_business_content_publish";
