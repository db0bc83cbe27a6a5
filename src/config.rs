//! Service configuration.

use serde::Deserialize;

/// Configuration for the metadata server.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "defaults::rpc_url")]
    pub rpc_url: String,

    #[serde(default = "defaults::fallback_rpc_url")]
    pub fallback_rpc_url: String,

    #[serde(default = "defaults::contract_address")]
    pub contract_address: String,

    #[serde(default = "defaults::catalog_path")]
    pub catalog_path: String,

    #[serde(default = "defaults::bind_address")]
    pub bind_address: String,

    /// Public base URL used to build asset links in metadata documents.
    #[serde(default = "defaults::public_base_url")]
    pub public_base_url: String,

    /// Object-store endpoint that serves the collection's media objects.
    #[serde(default = "defaults::storage_base_url")]
    pub storage_base_url: String,

    /// Key namespace prepended to catalog storage keys.
    #[serde(default = "defaults::assets_prefix")]
    pub assets_prefix: String,

    /// Seconds between mint-filter drains.
    #[serde(default = "defaults::poll_interval_secs")]
    pub poll_interval_secs: u64,

    #[serde(default = "defaults::image_content_type")]
    pub image_content_type: String,

    #[serde(default = "defaults::video_content_type")]
    pub video_content_type: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: defaults::rpc_url(),
            fallback_rpc_url: defaults::fallback_rpc_url(),
            contract_address: defaults::contract_address(),
            catalog_path: defaults::catalog_path(),
            bind_address: defaults::bind_address(),
            public_base_url: defaults::public_base_url(),
            storage_base_url: defaults::storage_base_url(),
            assets_prefix: defaults::assets_prefix(),
            poll_interval_secs: defaults::poll_interval_secs(),
            image_content_type: defaults::image_content_type(),
            video_content_type: defaults::video_content_type(),
        }
    }
}

mod defaults {
    /// Build an Alchemy HTTP RPC URL from an API key.
    fn build_alchemy_url() -> Option<String> {
        let key = std::env::var("ALCHEMY_API_KEY").ok()?;
        if key.is_empty() {
            return None;
        }
        Some(format!("https://eth-mainnet.g.alchemy.com/v2/{key}"))
    }

    pub fn rpc_url() -> String {
        // Priority: GALLERY_RPC_URL > ALCHEMY_API_KEY > public endpoint
        if let Ok(url) = std::env::var("GALLERY_RPC_URL") {
            if !url.is_empty() {
                return url;
            }
        }
        if let Some(url) = build_alchemy_url() {
            return url;
        }
        "https://eth.llamarpc.com".into()
    }

    pub fn fallback_rpc_url() -> String {
        "https://cloudflare-eth.com".into()
    }

    pub fn contract_address() -> String {
        "0xf47ecc3b549a1e96ffdbd3c1aa421936826f3be5".into()
    }

    pub fn catalog_path() -> String {
        "./catalog/tokens.json".into()
    }

    pub fn bind_address() -> String {
        "0.0.0.0:5000".into()
    }

    pub fn public_base_url() -> String {
        std::env::var("GALLERY_PUBLIC_BASE_URL")
            .ok()
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| "http://localhost:5000".into())
    }

    pub fn storage_base_url() -> String {
        // Priority: explicit URL > AWS bucket/region pair > local dev store
        if let Ok(url) = std::env::var("GALLERY_STORAGE_BASE_URL") {
            if !url.is_empty() {
                return url;
            }
        }
        if let (Ok(bucket), Ok(region)) = (
            std::env::var("AWS_BUCKET_NAME"),
            std::env::var("AWS_BUCKET_REGION"),
        ) {
            if !bucket.is_empty() && !region.is_empty() {
                return format!("https://{bucket}.s3.{region}.amazonaws.com");
            }
        }
        "http://localhost:9000/gallery".into()
    }

    pub fn assets_prefix() -> String {
        "assets".into()
    }

    pub fn poll_interval_secs() -> u64 {
        15
    }

    pub fn image_content_type() -> String {
        "image/png".into()
    }

    pub fn video_content_type() -> String {
        "video/mp4".into()
    }
}
