//! Remote collection loader for the CMS content API

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use super::collection::{CollectionName, RemoteEntry};
use crate::config::StrapiConfig;
use crate::error::{LoadError, SchemaError};

const TIMEOUT_SECONDS: u64 = 30;

/// Fetches every entry of one content type, following pagination
pub struct StrapiLoader {
    http_client: reqwest::Client,
    base_url: String,
    content_type: String,
    plural: String,
    page_size: usize,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    data: Vec<Value>,
    #[serde(default)]
    meta: Meta,
}

#[derive(Debug, Default, Deserialize)]
struct Meta {
    #[serde(default)]
    pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Pagination {
    page_count: usize,
}

impl StrapiLoader {
    /// Create a loader for `config.content_type` against `base_url`
    pub fn new(base_url: &str, config: &StrapiConfig) -> Result<Self, LoadError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &config.token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| {
                LoadError::Response {
                    url: base_url.to_string(),
                    message: format!("invalid API token: {}", e),
                }
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECONDS))
            .default_headers(headers)
            .build()
            .map_err(|source| LoadError::Http {
                url: base_url.to_string(),
                source,
            })?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            content_type: config.content_type.clone(),
            plural: config.plural_name(),
            page_size: config.page_size.max(1),
        })
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    fn page_url(&self, page: usize) -> String {
        format!(
            "{}/api/{}?pagination[page]={}&pagination[pageSize]={}",
            self.base_url, self.plural, page, self.page_size
        )
    }

    /// Load all entries
    pub async fn load(&self) -> Result<Vec<RemoteEntry>, LoadError> {
        let mut entries = Vec::new();
        let mut page = 1;

        loop {
            let url = self.page_url(page);
            tracing::debug!("Fetching {}", url);
            let response = self.fetch_page(&url).await?;
            let page_count = response
                .meta
                .pagination
                .as_ref()
                .map(|p| p.page_count)
                .unwrap_or(1);

            for item in response.data {
                entries.push(to_entry(item)?);
            }

            if page >= page_count {
                break;
            }
            page += 1;
        }

        tracing::info!(
            "Loaded {} {} entries from {}",
            entries.len(),
            self.content_type,
            self.base_url
        );
        Ok(entries)
    }

    async fn fetch_page(&self, url: &str) -> Result<ListResponse, LoadError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|source| LoadError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json::<ListResponse>()
            .await
            .map_err(|e| LoadError::Response {
                url: url.to_string(),
                message: e.to_string(),
            })
    }
}

/// Every item must be an object with an `id`; v4-style `attributes` are flattened
fn to_entry(item: Value) -> Result<RemoteEntry, LoadError> {
    let collection = CollectionName::StrapiPostsLoader.as_str();
    let Value::Object(mut object) = item else {
        return Err(SchemaError::new(collection, "?", "entry is not an object").into());
    };

    if let Some(Value::Object(attributes)) = object.remove("attributes") {
        for (key, value) in attributes {
            object.entry(key).or_insert(value);
        }
    }

    let id = match object.get("documentId").or_else(|| object.get("id")) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => {
            return Err(SchemaError::new(collection, "?", "entry has no `id`").into());
        }
    };

    Ok(RemoteEntry { id, data: object })
}
