//! Prompt construction for text and image generation.

use storia_core::models::ProductBrief;

const STORY_TUNING: &str = "A clean, modern Instagram story background for a trendy sneaker. \
The design should include space at the center for the product image overlay. \
Vibrant, high-contrast, and eye-catching.";

const OUTPUT_CONTRACT: &str = "Provide data in only JSON format. With just two keys. \
hashtags, captions: each must be a array";

const OUTPUT_COUNTS: &str = "5 captions and 5 hashtags";

const IMAGE_STYLE: &str = "image must be reliable, since it will affect business, \
nothing too fancy, something related to the brand and its theme and simple, good for eyes.";

fn product_lines(products: &[ProductBrief]) -> String {
    products
        .iter()
        .map(|p| {
            format!(
                "Create a good background, captions and hashtags for an Instagram story advertisement \
for the product \"{}\" and category \"{}\". Include captions and hashtags.",
                p.brand_name, p.category_name
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prompt for the text provider: product lines, tuning, then the JSON output contract.
pub fn build_text_prompt(products: &[ProductBrief]) -> String {
    format!(
        "{}\n{}\n{}\n{}",
        product_lines(products),
        STORY_TUNING,
        OUTPUT_CONTRACT,
        OUTPUT_COUNTS
    )
}

/// Prompt for the image provider: product lines, tuning, then the style instruction.
pub fn build_image_prompt(products: &[ProductBrief]) -> String {
    format!("{}\n{}\n{}", product_lines(products), STORY_TUNING, IMAGE_STYLE)
}
