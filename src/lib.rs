//! MAP Prometheus Exporter
//!
//! A Prometheus metrics exporter for MicroART MAP inverters/charge controllers
//! reachable through a Malina controller's JSON status page.
//!
//! # Overview
//!
//! Every scrape of `/metrics` polls each configured device over HTTP, maps its
//! status payload to gauges, counters and an info metric, and returns whatever
//! the reachable devices reported. Unreachable or misbehaving devices are left
//! out of that scrape without affecting the others.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐   HTTP GET (+basic)   ┌──────────────────┐
//! │  Malina #1  │ ◄──────────────────── │     Exporter     │
//! └─────────────┘  read_json.php        │                  │
//! ┌─────────────┐                       │  ┌────────────┐  │      HTTP      ┌────────────┐
//! │  Malina #N  │ ◄──────────────────── │  │ Collector  │  │ ◄────────────► │ Prometheus │
//! └─────────────┘                       │  └────────────┘  │   /metrics     └────────────┘
//!                                       │  ┌────────────┐  │
//!                                       │  │   Mapper   │  │
//!                                       │  └────────────┘  │
//!                                       └──────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`malina`] - device targets, status payload and HTTP client
//! - [`collectors`] - per-scrape collection and the field-to-metric table
//! - [`metrics`] - metric samples and Prometheus text rendering
//! - [`server`] - HTTP server
//! - [`config`] - configuration loading and validation
//! - [`error`] - error types
//!
//! # Quick Start
//!
//! ```no_run
//! use malina_exporter::{config::Config, server};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("malina.json")?;
//!     server::start(config).await?;
//!     Ok(())
//! }
//! ```

pub mod collectors;
pub mod config;
pub mod error;
pub mod malina;
pub mod metrics;
pub mod server;
