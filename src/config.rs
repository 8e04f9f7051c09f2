//! Configuration management for the Kruize client.
//!
//! Configuration can be set via environment variables:
//! - `KRUIZE_CLUSTER_TYPE` - Optional. One of `local`, `kind`, `minikube`, `openshift`. Defaults to `local`.
//! - `KRUIZE_SERVER_ADDRESS` - Optional. Direct `host[:port]` override; skips cluster discovery.
//! - `KRUIZE_NAMESPACE` - Optional. Namespace of the Kruize service. Defaults to `monitoring`.
//! - `KRUIZE_OPENSHIFT_NAMESPACE` - Optional. Namespace on OpenShift. Defaults to `openshift-tuning`.
//! - `KRUIZE_SERVICE_NAME` - Optional. Service and route name. Defaults to `kruize`.
//! - `KUBECTL_PATH` / `MINIKUBE_PATH` / `OC_PATH` - Optional. External tool binaries.
//! - `KRUIZE_LOG_BODIES` - Optional. Log response bodies of list calls. Defaults to `true`.

use thiserror::Error;

use crate::discovery::ClusterType;
use crate::util::{env_var_bool, env_var_opt, env_var_or};

pub const DEFAULT_NAMESPACE: &str = "monitoring";
pub const DEFAULT_OPENSHIFT_NAMESPACE: &str = "openshift-tuning";
pub const DEFAULT_SERVICE_NAME: &str = "kruize";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Paths of the cluster tools shelled out to during discovery.
#[derive(Debug, Clone)]
pub struct ToolPaths {
    pub kubectl: String,
    pub minikube: String,
    pub oc: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            kubectl: "kubectl".to_string(),
            minikube: "minikube".to_string(),
            oc: "oc".to_string(),
        }
    }
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Deployment target used to discover the service address
    pub cluster_type: ClusterType,

    /// Explicit `host[:port]`, bypasses discovery when set
    pub server_address: Option<String>,

    /// Namespace of the service on kind/minikube
    pub namespace: String,

    /// Namespace of the service on OpenShift
    pub openshift_namespace: String,

    /// Kubernetes service (and OpenShift route) name
    pub service_name: String,

    pub tools: ToolPaths,

    /// Whether list endpoints log the full response body
    pub log_bodies: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cluster_type: ClusterType::Local,
            server_address: None,
            namespace: DEFAULT_NAMESPACE.to_string(),
            openshift_namespace: DEFAULT_OPENSHIFT_NAMESPACE.to_string(),
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            tools: ToolPaths::default(),
            log_bodies: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `KRUIZE_CLUSTER_TYPE` names an
    /// unsupported deployment target.
    pub fn from_env() -> Result<Self, ConfigError> {
        let cluster_type = env_var_or("KRUIZE_CLUSTER_TYPE", "local")
            .parse::<ClusterType>()
            .map_err(|e| ConfigError::InvalidValue("KRUIZE_CLUSTER_TYPE".to_string(), e))?;

        let tools = ToolPaths {
            kubectl: env_var_or("KUBECTL_PATH", "kubectl"),
            minikube: env_var_or("MINIKUBE_PATH", "minikube"),
            oc: env_var_or("OC_PATH", "oc"),
        };

        Ok(Self {
            cluster_type,
            server_address: env_var_opt("KRUIZE_SERVER_ADDRESS"),
            namespace: env_var_or("KRUIZE_NAMESPACE", DEFAULT_NAMESPACE),
            openshift_namespace: env_var_or(
                "KRUIZE_OPENSHIFT_NAMESPACE",
                DEFAULT_OPENSHIFT_NAMESPACE,
            ),
            service_name: env_var_or("KRUIZE_SERVICE_NAME", DEFAULT_SERVICE_NAME),
            tools,
            log_bodies: env_var_bool("KRUIZE_LOG_BODIES", true),
        })
    }

    /// Create a config pointing straight at `address` (useful for testing).
    pub fn with_server(address: impl Into<String>) -> Self {
        Self {
            server_address: Some(address.into()),
            ..Self::default()
        }
    }

    /// Apply command line overrides on top of the environment.
    pub fn with_overrides(
        mut self,
        cluster_type: Option<ClusterType>,
        server_address: Option<String>,
    ) -> Self {
        if let Some(cluster_type) = cluster_type {
            self.cluster_type = cluster_type;
        }
        if let Some(address) = server_address.filter(|a| !a.trim().is_empty()) {
            self.server_address = Some(address);
        }
        self
    }
}
