//! Client for the mod statistics API.
//!
//! Everything a card needs is fetched here, completely, before rendering
//! starts. Failures are reported as [`CardError::UpstreamFetchFailed`] and
//! never retried.

use std::time::Duration;

use image::RgbaImage;
use reqwest::Url;
use serde::Deserialize;

use crate::error::{CardError, Result};

pub const DEFAULT_BASE_URL: &str = "https://tmlapis.tomat.dev";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Game version whose statistics are queried.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ApiVersion {
    #[default]
    V1_4,
    V1_3,
}

impl ApiVersion {
    /// Parses the `v` query value. Unknown versions yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "1.4" => Some(ApiVersion::V1_4),
            "1.3" => Some(ApiVersion::V1_3),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ApiVersion::V1_4 => "1.4",
            ApiVersion::V1_3 => "1.3",
        }
    }
}

/// One published mod.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ModRecord {
    pub rank: u32,
    /// May contain `[c/RRGGBB:text]` color directives and HTML entities.
    pub display_name: String,
    pub downloads_total: u64,
    pub downloads_yesterday: u64,
    /// URL of the PNG icon.
    pub icon: String,
    pub last_updated: String,
    pub version: String,
}

/// An author and every mod they published.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Author {
    pub total: u32,
    pub mods: Vec<ModRecord>,
    pub steam_name: String,
}

/// Mod record plus its decoded icon.
pub struct ModCardData {
    pub record: ModRecord,
    pub icon: RgbaImage,
}

/// Async HTTP client for the statistics API.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| CardError::InvalidInput(format!("bad API base url {base_url:?}: {e}")))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CardError::UpstreamFetchFailed(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// `GET {base}/{version}/author/{steam_id}`
    pub async fn fetch_author(&self, version: ApiVersion, steam_id: &str) -> Result<Author> {
        if steam_id.trim().is_empty() {
            return Err(CardError::InvalidInput(
                "please enter a valid steamid64".to_string(),
            ));
        }

        let url = self.endpoint(version, "author", steam_id)?;
        let author: Author = self.get(url).await?.json().await?;
        log::debug!("Fetched {} mods of {}", author.mods.len(), author.steam_name);
        Ok(author)
    }

    /// `GET {base}/{version}/mod/{name}`
    pub async fn fetch_mod(&self, version: ApiVersion, name: &str) -> Result<ModRecord> {
        if name.trim().is_empty() {
            return Err(CardError::InvalidInput(
                "please enter a valid modname".to_string(),
            ));
        }

        let url = self.endpoint(version, "mod", name)?;
        Ok(self.get(url).await?.json().await?)
    }

    /// Fetches a mod record and downloads its icon.
    pub async fn fetch_mod_card(&self, version: ApiVersion, name: &str) -> Result<ModCardData> {
        let record = self.fetch_mod(version, name).await?;
        let icon = self.fetch_icon(&record.icon).await?;
        Ok(ModCardData { record, icon })
    }

    /// Downloads and decodes a PNG icon.
    pub async fn fetch_icon(&self, url: &str) -> Result<RgbaImage> {
        let url = Url::parse(url)
            .map_err(|e| CardError::UpstreamFetchFailed(format!("bad icon url {url:?}: {e}")))?;
        let bytes = self.get(url).await?.bytes().await?;

        let icon = image::load_from_memory_with_format(&bytes, image::ImageFormat::Png)
            .map_err(|e| CardError::UpstreamFetchFailed(format!("icon is not a PNG image: {e}")))?;
        Ok(icon.to_rgba8())
    }

    fn endpoint(&self, version: ApiVersion, kind: &str, id: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CardError::InvalidInput(format!("bad API base url {}", self.base_url)))?
            .pop_if_empty()
            .extend([version.as_str(), kind, id.trim()]);
        Ok(url)
    }

    async fn get(&self, url: Url) -> Result<reqwest::Response> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(CardError::UpstreamFetchFailed(format!(
                "request returned with status code: {}",
                status.as_u16()
            )));
        }
        Ok(response)
    }
}
