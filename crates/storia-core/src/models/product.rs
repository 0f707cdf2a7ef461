//! Catalog products and the generation inputs derived from them.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::constants::{MAX_PRODUCTS_PER_REQUEST, UNKNOWN_BRAND, UNKNOWN_CATEGORY};
use crate::error::AppError;

/// Media attached to a catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MediaRef {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

/// A product as listed by the commerce platform. Read-only once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDescriptor {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub brand_name: Option<String>,
    #[serde(default)]
    pub category_slug: Option<String>,
    #[serde(default)]
    pub item_code: Option<String>,
    #[serde(default)]
    pub media_refs: Vec<MediaRef>,
}

impl ProductDescriptor {
    /// Resolve this product into the brand/category pair used for prompts.
    pub fn brief(&self) -> ProductBrief {
        ProductBrief::resolve(self.brand_name.as_deref(), self.category_slug.as_deref())
    }
}

/// Paging information returned alongside catalog listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub current: u32,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub item_total: u64,
}

/// One page of catalog products.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProductPage {
    pub items: Vec<ProductDescriptor>,
    pub page: PageInfo,
}

/// Paging query for catalog listings
#[derive(Debug, Clone, Copy, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct ProductListQuery {
    #[serde(default = "default_page_no")]
    #[validate(range(min = 1, message = "page_no starts at 1"))]
    pub page_no: u32,
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100, message = "page_size must be between 1 and 100"))]
    pub page_size: u32,
}

fn default_page_no() -> u32 {
    1
}

fn default_page_size() -> u32 {
    20
}

impl Default for ProductListQuery {
    fn default() -> Self {
        Self {
            page_no: default_page_no(),
            page_size: default_page_size(),
        }
    }
}

/// Brand and category of one product with fallbacks already applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductBrief {
    pub brand_name: String,
    pub category_name: String,
}

impl ProductBrief {
    /// Blank or absent values fall back to [`UNKNOWN_BRAND`] / [`UNKNOWN_CATEGORY`].
    pub fn resolve(brand_name: Option<&str>, category_name: Option<&str>) -> Self {
        fn or_fallback(value: Option<&str>, fallback: &str) -> String {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or(fallback)
                .to_string()
        }

        Self {
            brand_name: or_fallback(brand_name, UNKNOWN_BRAND),
            category_name: or_fallback(category_name, UNKNOWN_CATEGORY),
        }
    }
}

/// One product entry in a `POST /generate-content` body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerationProduct {
    #[serde(default)]
    pub brand_name: Option<String>,
    #[serde(default, alias = "categorySlug")]
    pub category_name: Option<String>,
}

impl From<&GenerationProduct> for ProductBrief {
    fn from(product: &GenerationProduct) -> Self {
        ProductBrief::resolve(
            product.brand_name.as_deref(),
            product.category_name.as_deref(),
        )
    }
}

impl From<&ProductDescriptor> for ProductBrief {
    fn from(product: &ProductDescriptor) -> Self {
        product.brief()
    }
}

/// Request DTO for content generation
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct GenerateContentRequest {
    #[validate(length(
        min = 1,
        max = 5,
        message = "Select between 1 and 5 products"
    ))]
    pub products: Vec<GenerationProduct>,
}

/// A validated, ordered set of 1..=5 products. Consumed once per generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    products: Vec<ProductBrief>,
}

impl GenerationRequest {
    pub fn new(products: Vec<ProductBrief>) -> Result<Self, AppError> {
        if products.is_empty() {
            return Err(AppError::InvalidInput(
                "At least one product must be selected".to_string(),
            ));
        }
        if products.len() > MAX_PRODUCTS_PER_REQUEST {
            return Err(AppError::InvalidInput(format!(
                "At most {} products can be selected, got {}",
                MAX_PRODUCTS_PER_REQUEST,
                products.len()
            )));
        }
        Ok(Self { products })
    }

    pub fn products(&self) -> &[ProductBrief] {
        &self.products
    }
}

impl TryFrom<GenerateContentRequest> for GenerationRequest {
    type Error = AppError;

    fn try_from(request: GenerateContentRequest) -> Result<Self, Self::Error> {
        request.validate()?;
        GenerationRequest::new(request.products.iter().map(ProductBrief::from).collect())
    }
}
