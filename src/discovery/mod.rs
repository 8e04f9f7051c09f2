//! Resolution of the Kruize service base address.
//!
//! The address either comes from an explicit override or is discovered by
//! asking the cluster tooling (`kubectl`, `minikube`, `oc`) where the
//! service is exposed. The result is a [`BaseUrl`] that every endpoint call
//! is built from.

mod command;

pub use command::{CommandOutput, CommandRunner, SystemCommandRunner};

use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;
use crate::util::trim_trailing_slashes;
use command::display_command;

/// Host used for local and kind deployments.
pub const LOCAL_HOST: &str = "127.0.0.1";
/// Port the service listens on for local and kind deployments.
pub const LOCAL_PORT: u16 = 8080;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' exited with status {code:?}: {stderr}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("'{command}' produced no output")]
    EmptyOutput { command: String },

    #[error("No route for service '{service}' in 'oc status' output")]
    RouteNotFound { service: String },

    #[error("Invalid server address: '{0}'")]
    InvalidAddress(String),
}

/// Supported deployment targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterType {
    Local,
    Kind,
    Minikube,
    Openshift,
}

impl std::fmt::Display for ClusterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Kind => write!(f, "kind"),
            Self::Minikube => write!(f, "minikube"),
            Self::Openshift => write!(f, "openshift"),
        }
    }
}

impl std::str::FromStr for ClusterType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "kind" => Ok(Self::Kind),
            "minikube" => Ok(Self::Minikube),
            "openshift" => Ok(Self::Openshift),
            _ => Err(format!("Invalid cluster type: {}", s)),
        }
    }
}

/// `scheme://host[:port]` prefix of every request URL, without trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl(String);

impl BaseUrl {
    /// Build from a `host[:port]` address. A scheme already present is kept.
    pub fn from_address(address: &str) -> Result<Self, DiscoveryError> {
        let trimmed = address.trim();
        let (scheme, rest) = match trimmed.split_once("://") {
            Some((scheme @ ("http" | "https"), rest)) => (scheme, rest),
            Some(_) => return Err(DiscoveryError::InvalidAddress(address.to_string())),
            None => ("http", trimmed),
        };

        let host = trim_trailing_slashes(rest);
        if host.is_empty()
            || host.starts_with(':')
            || host.ends_with(':')
            || host.contains(char::is_whitespace)
        {
            return Err(DiscoveryError::InvalidAddress(address.to_string()));
        }
        Ok(Self(format!("{}://{}", scheme, host)))
    }

    pub fn from_host_port(host: &str, port: &str) -> Result<Self, DiscoveryError> {
        let (host, port) = (host.trim(), port.trim());
        if host.is_empty() || port.is_empty() {
            return Err(DiscoveryError::InvalidAddress(format!("{}:{}", host, port)));
        }
        Self::from_address(&format!("{}:{}", host, port))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Append an absolute endpoint path such as `/listExperiments`.
    pub fn join(&self, path: &str) -> String {
        format!("{}/{}", self.0, path.trim_start_matches('/'))
    }
}

impl std::fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// How the base address is obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryStrategy {
    /// Explicit `host[:port]`; nothing is discovered.
    Direct(String),
    /// Service running on this machine.
    Local,
    /// Single-node kind cluster with the port forwarded to localhost.
    ContainerLocal,
    /// NodePort service on minikube.
    MinikubeCluster {
        namespace: String,
        service: String,
        kubectl: String,
        minikube: String,
    },
    /// Route exposed on OpenShift.
    OpenShiftCluster {
        namespace: String,
        service: String,
        oc: String,
    },
}

impl DiscoveryStrategy {
    /// Pick the strategy for `config`. A server override always wins.
    pub fn from_config(config: &Config) -> Self {
        if let Some(address) = &config.server_address {
            return Self::Direct(address.clone());
        }

        match config.cluster_type {
            ClusterType::Local => Self::Local,
            ClusterType::Kind => Self::ContainerLocal,
            ClusterType::Minikube => Self::MinikubeCluster {
                namespace: config.namespace.clone(),
                service: config.service_name.clone(),
                kubectl: config.tools.kubectl.clone(),
                minikube: config.tools.minikube.clone(),
            },
            ClusterType::Openshift => Self::OpenShiftCluster {
                namespace: config.openshift_namespace.clone(),
                service: config.service_name.clone(),
                oc: config.tools.oc.clone(),
            },
        }
    }

    pub async fn resolve(&self, runner: &dyn CommandRunner) -> Result<BaseUrl, DiscoveryError> {
        let url = match self {
            Self::Direct(address) => BaseUrl::from_address(address)?,
            Self::Local | Self::ContainerLocal => {
                BaseUrl::from_host_port(LOCAL_HOST, &LOCAL_PORT.to_string())?
            }
            Self::MinikubeCluster {
                namespace,
                service,
                kubectl,
                minikube,
            } => {
                let columns = "-o=custom-columns=PORT:.spec.ports[*].nodePort";
                let port_output = run_for_token(
                    runner,
                    kubectl,
                    &[
                        "-n",
                        namespace.as_str(),
                        "get",
                        "svc",
                        service.as_str(),
                        "--no-headers",
                        columns,
                    ],
                )
                .await?;
                // Multi-port services print a comma separated list.
                let port = port_output.split(',').next().unwrap_or("").trim().to_string();
                if port.is_empty() {
                    return Err(DiscoveryError::EmptyOutput {
                        command: display_command(kubectl, &["get", "svc", service.as_str()]),
                    });
                }
                let host = run_for_token(runner, minikube, &["ip"]).await?;
                BaseUrl::from_host_port(&host, &port)?
            }
            Self::OpenShiftCluster {
                namespace,
                service,
                oc,
            } => {
                let target = format!("svc/{}", service);
                let expose_args = ["expose", target.as_str(), "-n", namespace.as_str()];
                match runner.run(oc, &expose_args).await {
                    Ok(output) if !output.success => warn!(
                        "'{}' failed (route may already exist): {}",
                        display_command(oc, &expose_args),
                        output.stderr.trim()
                    ),
                    Ok(_) => {}
                    Err(e) => return Err(e),
                }

                let status = run_for_token(runner, oc, &["status", "-n", namespace.as_str()]).await?;
                let host = parse_route_host(&status, service).ok_or_else(|| {
                    DiscoveryError::RouteNotFound {
                        service: service.clone(),
                    }
                })?;
                info!("IP = {}", host);
                BaseUrl::from_address(&host)?
            }
        };

        info!("KRUIZE URL = {}", url);
        Ok(url)
    }
}

/// Resolve the base address for `config` using the real cluster tools.
pub async fn resolve_base_url(config: &Config) -> Result<BaseUrl, DiscoveryError> {
    DiscoveryStrategy::from_config(config)
        .resolve(&SystemCommandRunner)
        .await
}

/// Run a command and return its trimmed stdout, failing on error or silence.
async fn run_for_token(
    runner: &dyn CommandRunner,
    program: &str,
    args: &[&str],
) -> Result<String, DiscoveryError> {
    let output = runner.run(program, args).await?;
    if !output.success {
        return Err(DiscoveryError::CommandFailed {
            command: display_command(program, args),
            code: output.code,
            stderr: output.stderr.trim().to_string(),
        });
    }

    let token = output.stdout.trim();
    if token.is_empty() {
        return Err(DiscoveryError::EmptyOutput {
            command: display_command(program, args),
        });
    }
    Ok(token.to_string())
}

/// Extract the route host of `service` from `oc status` output.
///
/// Route lines look like
/// `http://kruize-openshift-tuning.apps.example.com to pod port 8080 (svc/kruize)`.
/// Lines for the `-ui` and `-db` companions are skipped.
pub fn parse_route_host(status: &str, service: &str) -> Option<String> {
    let ui = format!("{}-ui", service);
    let db = format!("{}-db", service);

    status
        .lines()
        .filter(|line| {
            line.contains(service)
                && !line.contains(&ui)
                && !line.contains(&db)
                && line.contains("port")
        })
        .find_map(|line| {
            let first_field = line.split(' ').next()?;
            let host = first_field.split('/').nth(2)?.trim();
            (!host.is_empty()).then(|| host.to_string())
        })
}
