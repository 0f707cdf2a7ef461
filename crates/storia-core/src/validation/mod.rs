//! Validation modules

pub mod hashtag;
pub mod url;

pub use hashtag::{normalize_hashtag, normalize_hashtags, split_hashtag_list};
pub use url::is_http_url;
