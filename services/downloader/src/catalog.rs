//! Granule search against NASA CMR.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tb_common::{TbError, TbResult};
use tracing::{debug, info, instrument};

use crate::config::FetcherConfig;

/// A granule as listed by the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    /// Granule file name
    pub native_id: String,
    /// Externally reachable download URLs, in catalog order
    pub data_urls: Vec<String>,
}

/// Source of granule listings for a collection.
#[async_trait]
pub trait GranuleCatalog: Send + Sync {
    async fn search(&self, short_name: &str) -> TbResult<Vec<CatalogEntry>>;
}

#[derive(Debug, Deserialize)]
struct UmmSearchResponse {
    #[serde(default)]
    items: Vec<UmmItem>,
}

#[derive(Debug, Deserialize)]
struct UmmItem {
    meta: UmmMeta,
    umm: UmmGranule,
}

#[derive(Debug, Deserialize)]
struct UmmMeta {
    #[serde(rename = "native-id")]
    native_id: String,
}

#[derive(Debug, Deserialize)]
struct UmmGranule {
    #[serde(rename = "RelatedUrls", default)]
    related_urls: Vec<RelatedUrl>,
}

#[derive(Debug, Deserialize)]
struct RelatedUrl {
    #[serde(rename = "URL")]
    url: String,
    #[serde(rename = "Type", default)]
    url_type: String,
}

impl UmmItem {
    fn into_entry(self) -> CatalogEntry {
        let data_urls = self
            .umm
            .related_urls
            .into_iter()
            .filter(|u| u.url_type == "GET DATA" && !u.url.starts_with("s3://"))
            .map(|u| u.url)
            .collect();
        CatalogEntry {
            native_id: self.meta.native_id,
            data_urls,
        }
    }
}

/// CMR granule search (`granules.umm_json`).
pub struct CmrCatalog {
    client: Client,
    base_url: String,
    page_size: u32,
}

impl CmrCatalog {
    pub fn new(config: &FetcherConfig) -> TbResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| TbError::InvalidConfig(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.cmr_url.trim_end_matches('/').to_string(),
            page_size: config.page_size,
        })
    }
}

#[async_trait]
impl GranuleCatalog for CmrCatalog {
    #[instrument(skip(self), fields(cmr = %self.base_url))]
    async fn search(&self, short_name: &str) -> TbResult<Vec<CatalogEntry>> {
        let url = format!("{}/search/granules.umm_json", self.base_url);
        let fail = |reason: String| TbError::RemoteFetchError {
            granule: short_name.to_string(),
            reason,
        };

        let response = self
            .client
            .get(&url)
            .query(&[
                ("short_name", short_name.to_string()),
                ("page_size", self.page_size.to_string()),
            ])
            .send()
            .await
            .map_err(|e| fail(format!("catalog request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fail(format!("catalog search returned {}", status)));
        }

        let body: UmmSearchResponse = response
            .json()
            .await
            .map_err(|e| fail(format!("invalid catalog response: {}", e)))?;

        let entries: Vec<CatalogEntry> = body.items.into_iter().map(UmmItem::into_entry).collect();
        for entry in &entries {
            debug!(granule = %entry.native_id, urls = entry.data_urls.len(), "Catalog entry");
        }
        info!(count = entries.len(), "Found granules");
        Ok(entries)
    }
}
