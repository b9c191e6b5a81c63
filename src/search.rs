use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, error, info};

use crate::config;
use crate::error::SearchError;
use crate::model::{BookRecord, UNKNOWN_AUTHOR, UNTITLED};

#[derive(Debug, Default, Deserialize)]
struct VolumesResponse {
    #[serde(default)]
    items: Option<Vec<Volume>>,
}

/// One item of the catalog's `items` list.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    #[serde(default)]
    pub volume_info: VolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    pub title: Option<String>,
    pub authors: Option<Vec<String>>,
    pub preview_link: Option<String>,
    pub image_links: Option<ImageLinks>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    pub thumbnail: Option<String>,
    pub small_thumbnail: Option<String>,
}

/// Maps a catalog item to a display record, defaulting whatever is missing.
pub fn normalize(volume: Volume) -> BookRecord {
    let info = volume.volume_info;

    let authors: Vec<String> = info
        .authors
        .unwrap_or_default()
        .into_iter()
        .filter(|a| !a.trim().is_empty())
        .collect();
    let author = if authors.is_empty() {
        UNKNOWN_AUTHOR.to_string()
    } else {
        authors.join(", ")
    };

    let image_url = info
        .image_links
        .and_then(|links| links.thumbnail.or(links.small_thumbnail))
        .map(|url| match url.strip_prefix("http://") {
            Some(rest) => format!("https://{}", rest),
            None => url,
        });

    BookRecord {
        title: info
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| UNTITLED.to_string()),
        author,
        preview_link: info.preview_link,
        image_url,
    }
}

pub struct SearchClient {
    http: reqwest::Client,
    endpoint: String,
    max_results: u32,
    print_type: Option<String>,
}

impl SearchClient {
    pub fn new(cfg: &config::Search) -> Result<Self, SearchError> {
        reqwest::Url::parse(&cfg.endpoint)
            .map_err(|e| SearchError::InvalidEndpoint(format!("{}: {}", cfg.endpoint, e)))?;

        let http = reqwest::Client::builder()
            .user_agent(concat!("bookshelf/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(cfg.timeout_seconds))
            .build()?;

        Ok(SearchClient {
            http,
            endpoint: cfg.endpoint.clone(),
            max_results: cfg.max_results,
            print_type: cfg.print_type.clone(),
        })
    }

    pub fn request_url(&self, query: &str) -> String {
        let separator = if self.endpoint.contains('?') { '&' } else { '?' };
        let mut url = format!(
            "{}{}q={}&maxResults={}",
            self.endpoint,
            separator,
            urlencoding::encode(query),
            self.max_results
        );
        if let Some(print_type) = &self.print_type {
            url.push_str("&printType=");
            url.push_str(&urlencoding::encode(print_type));
        }
        url
    }

    /// Runs a search, logging any failure and returning no results instead.
    pub async fn search(&self, query: &str) -> Vec<BookRecord> {
        match self.try_search(query).await {
            Ok(records) => records,
            Err(e) => {
                error!(error = %crate::unpack_error(&e), query, "failed to fetch books");
                Vec::new()
            }
        }
    }

    pub async fn try_search(&self, query: &str) -> Result<Vec<BookRecord>, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            debug!("search query is empty, skipping request");
            return Ok(Vec::new());
        }

        info!(query, "searching catalog");
        let response = self.http.get(self.request_url(query)).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status));
        }

        let body = response.bytes().await?;
        let parsed: VolumesResponse = serde_json::from_slice(&body)?;
        let records: Vec<BookRecord> = parsed
            .items
            .unwrap_or_default()
            .into_iter()
            .map(normalize)
            .collect();

        info!(query, count = records.len(), "search returned results");
        Ok(records)
    }
}
