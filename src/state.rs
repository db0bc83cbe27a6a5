//! Application state shared across handlers.

use std::sync::atomic::AtomicU64;
use std::time::Instant;
use tracing::info;

use crate::catalog::Catalog;
use crate::chain::ChainClient;
use crate::config::Config;
use crate::storage::BlobStore;
use crate::supply::SupplyTracker;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub catalog: Catalog,
    pub supply: SupplyTracker,
    pub chain: ChainClient,
    pub storage: BlobStore,
    pub start_time: Instant,
    pub request_count: AtomicU64,
}

impl AppState {
    /// Create application state from configuration. Bootstraps the supply
    /// with one `totalSupply()` read; a failure here is fatal since no
    /// request can be gated without it.
    pub async fn new(config: Config) -> Result<Self, crate::Error> {
        let catalog = Catalog::load(&config.catalog_path)?;

        let chain = ChainClient::new(
            &config.rpc_url,
            &config.fallback_rpc_url,
            &config.contract_address,
        )?;
        let storage = BlobStore::new(&config.storage_base_url)?;

        let initial_supply = chain.total_supply().await?;
        info!(supply = initial_supply, "Bootstrapped total supply");

        Ok(Self {
            config,
            catalog,
            supply: SupplyTracker::new(initial_supply),
            chain,
            storage,
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
        })
    }
}
