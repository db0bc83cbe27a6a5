//! # Gallery Metadata Server
//!
//! Serves NFT metadata and media assets for a collection minted by an
//! ERC-721 contract, gating every request on a live, monotonically
//! increasing view of the contract's total supply.
//!
//! ## Quick Start
//! ```bash
//! cargo run --bin gallery-metadata
//! ```
//!
//! ## Endpoints
//! - `GET /health` - Health check with supply and catalog gauges
//! - `GET /metrics` - Prometheus metrics
//! - `GET /api/token/{id}` - Metadata document for a minted token
//! - `GET /assets/images/{id}` - Streamed token image
//! - `GET /assets/videos/{id}` - Streamed token video, where one exists

pub mod catalog;
pub mod chain;
pub mod config;
mod error;
pub mod gate;
mod handlers;
pub mod metrics;
mod middleware;
pub mod response;
mod router;
pub mod state;
pub mod storage;
pub mod supply;

pub use config::Config;
pub use error::Error;
pub use router::create as create_router;
pub use state::AppState;
