//! # Kruize client
//!
//! Demo and test client for the Kruize autotuning REST API.
//!
//! This library provides:
//! - Resolution of the service address from an override or from the cluster
//!   the service runs on (local, kind, minikube, OpenShift)
//! - One async method per REST endpoint (experiments, recommendations,
//!   metric profiles, bulk jobs, datasources and their metadata)
//! - Best-effort response logging that never interferes with the response
//!
//! ## Flow
//! 1. Build a [`Config`] (environment plus overrides)
//! 2. Resolve a [`BaseUrl`] with [`discovery::resolve_base_url`]
//! 3. Create a [`KruizeClient`] from it and call endpoints
//!
//! Every endpoint returns the raw [`ApiResponse`] regardless of status code;
//! callers decide what a 4xx means for them.
//!
//! ## Modules
//! - `config`: environment configuration
//! - `discovery`: base address resolution strategies
//! - `client`: endpoint methods and response logging
//! - `payload`: JSON request files

pub mod client;
pub mod config;
pub mod discovery;
pub mod payload;
pub mod util;

pub use client::{ApiResponse, ClientError, KruizeClient};
pub use config::Config;
pub use discovery::{BaseUrl, ClusterType, DiscoveryError, DiscoveryStrategy};
