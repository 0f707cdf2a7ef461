//! Commerce platform catalog client
//!
//! Lists products on behalf of a merchant using the access token from their
//! extension session. Raw platform items are mapped to [`ProductDescriptor`].

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use storia_core::models::{
    ExtensionSession, MediaRef, PageInfo, ProductDescriptor, ProductListQuery, ProductPage,
};
use storia_core::PlatformConfig;

use crate::error::ProviderError;
use crate::http::{build_client, read_json, transport_error};
use crate::provider::CatalogClient;

const PROVIDER: &str = "platform";
const CATALOG_PATH: &str = "service/platform/catalog/v1.0";

pub struct PlatformCatalogClient {
    http_client: reqwest::Client,
    cluster: String,
}

impl Debug for PlatformCatalogClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("PlatformCatalogClient")
            .field("cluster", &self.cluster)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct RawProductList {
    #[serde(default)]
    items: Vec<RawProduct>,
    #[serde(default)]
    page: Option<RawPage>,
}

#[derive(Debug, Deserialize)]
struct RawPage {
    #[serde(default)]
    current: u32,
    #[serde(default)]
    size: u32,
    #[serde(default)]
    has_next: bool,
    #[serde(default)]
    item_total: u64,
}

impl From<RawPage> for PageInfo {
    fn from(page: RawPage) -> Self {
        Self {
            current: page.current,
            size: page.size,
            has_next: page.has_next,
            item_total: page.item_total,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawProduct {
    #[serde(default)]
    uid: Option<Value>,
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    brand: Option<RawBrand>,
    #[serde(default)]
    category_slug: Option<String>,
    #[serde(default)]
    item_code: Option<String>,
    #[serde(default)]
    medias: Vec<RawMedia>,
}

#[derive(Debug, Deserialize)]
struct RawBrand {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawMedia {
    #[serde(default)]
    url: Option<String>,
    #[serde(default, rename = "type")]
    media_type: Option<String>,
}

fn value_to_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl RawProduct {
    /// Items without any usable identifier are dropped.
    fn into_descriptor(self) -> Option<ProductDescriptor> {
        let id = self
            .uid
            .as_ref()
            .and_then(value_to_id)
            .or_else(|| self.id.as_ref().and_then(value_to_id))?;

        Some(ProductDescriptor {
            id,
            name: self.name,
            brand_name: self.brand.and_then(|b| b.name),
            category_slug: self.category_slug,
            item_code: self.item_code,
            media_refs: self
                .medias
                .into_iter()
                .filter_map(|m| {
                    m.url.map(|url| MediaRef {
                        url,
                        media_type: m.media_type,
                    })
                })
                .collect(),
        })
    }
}

impl PlatformCatalogClient {
    pub fn new(config: &PlatformConfig, timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            http_client: build_client(PROVIDER, timeout)?,
            cluster: config.cluster.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_page(
        &self,
        url: String,
        session: &ExtensionSession,
        query: &ProductListQuery,
    ) -> Result<ProductPage, ProviderError> {
        let response = self
            .http_client
            .get(url)
            .query(&[("page_no", query.page_no), ("page_size", query.page_size)])
            .bearer_auth(&session.access_token)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;

        let raw: RawProductList = read_json(PROVIDER, response).await?;
        let received = raw.items.len();
        let items: Vec<ProductDescriptor> = raw
            .items
            .into_iter()
            .filter_map(RawProduct::into_descriptor)
            .collect();

        if items.len() != received {
            tracing::warn!(
                dropped = received - items.len(),
                "Catalog items without an identifier were skipped"
            );
        }

        let page = raw.page.map(PageInfo::from).unwrap_or(PageInfo {
            current: query.page_no,
            size: query.page_size,
            has_next: false,
            item_total: items.len() as u64,
        });

        Ok(ProductPage { items, page })
    }
}

#[async_trait]
impl CatalogClient for PlatformCatalogClient {
    #[tracing::instrument(skip(self, session), fields(company_id = %session.company_id))]
    async fn get_products(
        &self,
        session: &ExtensionSession,
        query: &ProductListQuery,
    ) -> Result<ProductPage, ProviderError> {
        let url = format!(
            "{}/{}/company/{}/products/",
            self.cluster, CATALOG_PATH, session.company_id
        );
        self.fetch_page(url, session, query).await
    }

    #[tracing::instrument(skip(self, session), fields(company_id = %session.company_id))]
    async fn get_app_products(
        &self,
        session: &ExtensionSession,
        application_id: &str,
        query: &ProductListQuery,
    ) -> Result<ProductPage, ProviderError> {
        let url = format!(
            "{}/{}/company/{}/application/{}/raw-products/",
            self.cluster, CATALOG_PATH, session.company_id, application_id
        );
        self.fetch_page(url, session, query).await
    }
}
