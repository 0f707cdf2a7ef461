//! Creative bundle: the all-or-nothing output of content generation.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::constants::{BUNDLE_CAPTION_COUNT, BUNDLE_HASHTAG_COUNT};
use crate::error::GenerationError;
use crate::validation::{is_http_url, normalize_hashtag};

/// Captions and hashtags as requested from the text provider.
///
/// Deserialization is strict: both keys must be present and hold string arrays.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompletionContent {
    pub captions: Vec<String>,
    pub hashtags: Vec<String>,
}

impl CompletionContent {
    /// Enforce the output contract: exactly 5 distinct, non-empty captions and
    /// hashtags.
    ///
    /// Hashtags are normalized to a single leading `#` before the duplicate
    /// check, which ignores case.
    pub fn into_validated(self) -> Result<Self, GenerationError> {
        let captions: Vec<String> = self
            .captions
            .into_iter()
            .map(|c| c.trim().to_string())
            .collect();
        if !is_complete_set(&captions, BUNDLE_CAPTION_COUNT, |c| c.clone()) {
            return Err(GenerationError::MalformedCompletion(format!(
                "expected {} distinct non-empty captions, got {:?}",
                BUNDLE_CAPTION_COUNT, captions
            )));
        }

        let hashtags: Vec<String> = self
            .hashtags
            .iter()
            .filter_map(|h| normalize_hashtag(h))
            .collect();
        if self.hashtags.len() != BUNDLE_HASHTAG_COUNT
            || !is_complete_set(&hashtags, BUNDLE_HASHTAG_COUNT, |h| h.to_lowercase())
        {
            return Err(GenerationError::MalformedCompletion(format!(
                "expected {} distinct non-empty hashtags, got {:?}",
                BUNDLE_HASHTAG_COUNT, self.hashtags
            )));
        }

        Ok(Self { captions, hashtags })
    }
}

/// True when `items` holds exactly `count` non-empty entries with distinct keys.
fn is_complete_set<F>(items: &[String], count: usize, key: F) -> bool
where
    F: Fn(&String) -> String,
{
    let distinct: HashSet<String> = items.iter().map(key).collect();
    items.len() == count && distinct.len() == count && items.iter().all(|i| !i.is_empty())
}

/// A complete creative bundle. Only constructible through [`CreativeBundle::assemble`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreativeBundle {
    image_url: String,
    captions: Vec<String>,
    hashtags: Vec<String>,
}

impl CreativeBundle {
    /// Gate partial results: every field must be present and usable, otherwise
    /// the missing field names are reported in `IncompleteBundle`.
    pub fn assemble(
        image_url: Option<String>,
        content: Option<CompletionContent>,
    ) -> Result<Self, GenerationError> {
        let mut missing = Vec::new();

        let image_url = image_url
            .map(|u| u.trim().to_string())
            .filter(|u| is_http_url(u));
        if image_url.is_none() {
            missing.push("imageUrl");
        }

        let (captions, hashtags) = match content {
            Some(CompletionContent { captions, hashtags }) => (captions, hashtags),
            None => (Vec::new(), Vec::new()),
        };
        if !is_complete_set(&captions, BUNDLE_CAPTION_COUNT, |c| c.clone()) {
            missing.push("captions");
        }
        if hashtags.iter().any(|h| h.len() < 2)
            || !is_complete_set(&hashtags, BUNDLE_HASHTAG_COUNT, |h| h.to_lowercase())
        {
            missing.push("hashtags");
        }

        match image_url {
            Some(image_url) if missing.is_empty() => Ok(Self {
                image_url,
                captions,
                hashtags,
            }),
            _ => Err(GenerationError::IncompleteBundle { missing }),
        }
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn captions(&self) -> &[String] {
        &self.captions
    }

    pub fn hashtags(&self) -> &[String] {
        &self.hashtags
    }
}

/// Response DTO for a successful generation
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    pub success: bool,
    pub captions: Vec<String>,
    pub hashtags: Vec<String>,
    pub image_url: String,
}

impl From<CreativeBundle> for GenerateContentResponse {
    fn from(bundle: CreativeBundle) -> Self {
        Self {
            success: true,
            captions: bundle.captions,
            hashtags: bundle.hashtags,
            image_url: bundle.image_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn five(prefix: &str) -> Vec<String> {
        (1..=5).map(|i| format!("{}{}", prefix, i)).collect()
    }

    fn content() -> CompletionContent {
        CompletionContent {
            captions: five("Step up your game "),
            hashtags: five("tag"),
        }
        .into_validated()
        .unwrap()
    }

    #[test]
    fn test_validation_normalizes_hashtags() {
        let content = content();
        assert_eq!(content.hashtags[0], "#tag1");
        assert!(content.hashtags.iter().all(|h| h.starts_with('#')));
    }

    #[test]
    fn test_validation_rejects_wrong_counts() {
        let short = CompletionContent {
            captions: five("c").into_iter().take(4).collect(),
            hashtags: five("h"),
        };
        assert!(matches!(
            short.into_validated(),
            Err(GenerationError::MalformedCompletion(_))
        ));
    }

    #[test]
    fn test_validation_rejects_blank_hashtag() {
        let mut hashtags = five("h");
        hashtags[2] = " # ".to_string();
        let content = CompletionContent {
            captions: five("c"),
            hashtags,
        };
        assert!(content.into_validated().is_err());
    }

    #[test]
    fn test_validation_rejects_duplicate_hashtags_after_normalization() {
        let content = CompletionContent {
            captions: five("c"),
            hashtags: ["#Nike", "Nike", "##Nike", "#run", "run"]
                .iter()
                .map(|h| h.to_string())
                .collect(),
        };
        assert!(matches!(
            content.into_validated(),
            Err(GenerationError::MalformedCompletion(_))
        ));
    }

    #[test]
    fn test_validation_rejects_hashtags_differing_only_in_case() {
        let mut hashtags = five("tag");
        hashtags[4] = "#TAG1".to_string();
        let content = CompletionContent {
            captions: five("c"),
            hashtags,
        };
        assert!(content.into_validated().is_err());
    }

    #[test]
    fn test_validation_rejects_repeated_captions() {
        let mut captions = five("Step up ");
        captions[3] = " Step up 1 ".to_string();
        let content = CompletionContent {
            captions,
            hashtags: five("h"),
        };
        assert!(matches!(
            content.into_validated(),
            Err(GenerationError::MalformedCompletion(_))
        ));
    }

    #[test]
    fn test_assemble_rejects_duplicate_entries() {
        let content = CompletionContent {
            captions: vec!["Same".to_string(); 5],
            hashtags: vec!["#same".to_string(); 5],
        };
        let err = CreativeBundle::assemble(
            Some("https://images.example.com/a.png".to_string()),
            Some(content),
        )
        .unwrap_err();
        match err {
            GenerationError::IncompleteBundle { missing } => {
                assert_eq!(missing, vec!["captions", "hashtags"])
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_assemble_complete_bundle() {
        let bundle = CreativeBundle::assemble(
            Some("https://images.example.com/story.png".to_string()),
            Some(content()),
        )
        .unwrap();
        assert_eq!(bundle.image_url(), "https://images.example.com/story.png");
        assert_eq!(bundle.captions().len(), 5);
        assert_eq!(bundle.hashtags().len(), 5);
    }

    #[test]
    fn test_assemble_without_image_is_incomplete() {
        let err = CreativeBundle::assemble(None, Some(content())).unwrap_err();
        match err {
            GenerationError::IncompleteBundle { missing } => assert_eq!(missing, vec!["imageUrl"]),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_assemble_rejects_non_url_image() {
        let err = CreativeBundle::assemble(Some("not a url".to_string()), Some(content()));
        assert!(matches!(
            err,
            Err(GenerationError::IncompleteBundle { .. })
        ));
    }

    #[test]
    fn test_assemble_reports_every_missing_field() {
        let err = CreativeBundle::assemble(None, None).unwrap_err();
        match err {
            GenerationError::IncompleteBundle { missing } => {
                assert_eq!(missing, vec!["imageUrl", "captions", "hashtags"])
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_response_serializes_camel_case() {
        let bundle = CreativeBundle::assemble(
            Some("https://images.example.com/a.png".to_string()),
            Some(content()),
        )
        .unwrap();
        let json = serde_json::to_value(GenerateContentResponse::from(bundle)).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["imageUrl"], "https://images.example.com/a.png");
        assert_eq!(json["captions"].as_array().unwrap().len(), 5);
    }
}
