//! Prometheus metrics (lock-free atomics, zero allocation on hot path).

use std::sync::atomic::{AtomicU64, Ordering};

pub static METRICS: Metrics = Metrics::new();

pub struct Metrics {
    // --- Traffic ---
    pub http_requests: AtomicU64,
    pub metadata_served: AtomicU64,
    pub assets_served: AtomicU64,
    pub gate_invalid: AtomicU64,
    pub gate_not_minted: AtomicU64,

    // --- Supply tracking ---
    pub mint_events: AtomicU64,

    // --- Upstreams ---
    pub rpc_errors: AtomicU64,
    pub storage_open_errors: AtomicU64,
    pub storage_stream_errors: AtomicU64,
}

impl Metrics {
    const fn new() -> Self {
        Self {
            http_requests: AtomicU64::new(0),
            metadata_served: AtomicU64::new(0),
            assets_served: AtomicU64::new(0),
            gate_invalid: AtomicU64::new(0),
            gate_not_minted: AtomicU64::new(0),
            mint_events: AtomicU64::new(0),
            rpc_errors: AtomicU64::new(0),
            storage_open_errors: AtomicU64::new(0),
            storage_stream_errors: AtomicU64::new(0),
        }
    }

    /// Render in Prometheus text exposition format.
    pub fn render(&self, total_supply: u64, catalog_size: usize) -> String {
        let http_requests = self.http_requests.load(Ordering::Relaxed);
        let metadata_served = self.metadata_served.load(Ordering::Relaxed);
        let assets_served = self.assets_served.load(Ordering::Relaxed);
        let gate_invalid = self.gate_invalid.load(Ordering::Relaxed);
        let gate_not_minted = self.gate_not_minted.load(Ordering::Relaxed);
        let mint_events = self.mint_events.load(Ordering::Relaxed);
        let rpc_errors = self.rpc_errors.load(Ordering::Relaxed);
        let storage_open_errors = self.storage_open_errors.load(Ordering::Relaxed);
        let storage_stream_errors = self.storage_stream_errors.load(Ordering::Relaxed);

        format!(
            "\
# HELP gallery_http_requests_total Requests received on token and asset routes.\n\
# TYPE gallery_http_requests_total counter\n\
gallery_http_requests_total {http_requests}\n\
# HELP gallery_metadata_served_total Metadata documents served.\n\
# TYPE gallery_metadata_served_total counter\n\
gallery_metadata_served_total {metadata_served}\n\
# HELP gallery_assets_served_total Asset streams opened.\n\
# TYPE gallery_assets_served_total counter\n\
gallery_assets_served_total {assets_served}\n\
# HELP gallery_gate_invalid_total Requests rejected for a non-positive token ID.\n\
# TYPE gallery_gate_invalid_total counter\n\
gallery_gate_invalid_total {gate_invalid}\n\
# HELP gallery_gate_not_minted_total Requests rejected as not yet minted.\n\
# TYPE gallery_gate_not_minted_total counter\n\
gallery_gate_not_minted_total {gate_not_minted}\n\
# HELP gallery_mint_events_total Mint events observed by the listener.\n\
# TYPE gallery_mint_events_total counter\n\
gallery_mint_events_total {mint_events}\n\
# HELP gallery_rpc_errors_total Chain RPC errors.\n\
# TYPE gallery_rpc_errors_total counter\n\
gallery_rpc_errors_total {rpc_errors}\n\
# HELP gallery_storage_open_errors_total Object-store failures before streaming.\n\
# TYPE gallery_storage_open_errors_total counter\n\
gallery_storage_open_errors_total {storage_open_errors}\n\
# HELP gallery_storage_stream_errors_total Object-store failures mid-stream.\n\
# TYPE gallery_storage_stream_errors_total counter\n\
gallery_storage_stream_errors_total {storage_stream_errors}\n\
# HELP gallery_total_supply Latest known total supply.\n\
# TYPE gallery_total_supply gauge\n\
gallery_total_supply {total_supply}\n\
# HELP gallery_catalog_records Token records loaded from the catalog.\n\
# TYPE gallery_catalog_records gauge\n\
gallery_catalog_records {catalog_size}\n"
        )
    }
}
