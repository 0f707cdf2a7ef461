//! Hashtag normalization.
//!
//! A normalized hashtag has exactly one leading `#` followed by a non-empty,
//! trimmed body. The body is otherwise kept as written. Normalization is idempotent.

/// Normalize one hashtag, or `None` if nothing remains after stripping.
pub fn normalize_hashtag(raw: &str) -> Option<String> {
    let body = raw
        .trim()
        .trim_start_matches(|c: char| c == '#' || c.is_whitespace());

    if body.is_empty() {
        None
    } else {
        Some(format!("#{}", body))
    }
}

/// Normalize a list of hashtags, dropping entries that are empty.
pub fn normalize_hashtags<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .filter_map(|h| normalize_hashtag(h.as_ref()))
        .collect()
}

/// Split a comma-separated hashtag list (as carried in query strings) and normalize it.
pub fn split_hashtag_list(list: &str) -> Vec<String> {
    normalize_hashtags(list.split(','))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adds_missing_prefix() {
        assert_eq!(normalize_hashtag("sneakers").as_deref(), Some("#sneakers"));
    }

    #[test]
    fn test_keeps_existing_prefix() {
        assert_eq!(normalize_hashtag("#sneakers").as_deref(), Some("#sneakers"));
    }

    #[test]
    fn test_collapses_repeated_prefix() {
        assert_eq!(normalize_hashtag("##sneakers").as_deref(), Some("#sneakers"));
    }

    #[test]
    fn test_is_idempotent() {
        for raw in ["sneakers", "#Sneakers", "  ##run fast ", "# #spaced", "#JustDoIt2024"] {
            let once = normalize_hashtag(raw).unwrap();
            let twice = normalize_hashtag(&once).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_keeps_prefixed_tag_unchanged() {
        for tag in ["#summer vibes", "#Run_Fast", "#2024"] {
            assert_eq!(normalize_hashtag(tag).as_deref(), Some(tag));
        }
    }

    #[test]
    fn test_trims_only_the_ends() {
        assert_eq!(
            normalize_hashtag("  ##summer vibes ").as_deref(),
            Some("#summer vibes")
        );
    }

    #[test]
    fn test_rejects_empty_bodies() {
        assert_eq!(normalize_hashtag(""), None);
        assert_eq!(normalize_hashtag(" # "), None);
        assert_eq!(normalize_hashtag("###"), None);
    }

    #[test]
    fn test_split_hashtag_list() {
        assert_eq!(
            split_hashtag_list("run, #fast,,  ## "),
            vec!["#run".to_string(), "#fast".to_string()]
        );
    }
}
