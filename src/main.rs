//! kruize-client - command line entry point
//!
//! Resolves the Kruize address, performs one endpoint call and prints the
//! response body. The exit code only reflects local failures; HTTP error
//! statuses are printed like any other response.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use kruize_client::client::{ExperimentQuery, MetadataQuery, RecommendationQuery};
use kruize_client::{discovery, ApiResponse, ClusterType, Config, KruizeClient};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "kruize-client", version, about = "Kruize REST API demo client")]
struct Cli {
    /// Deployment target: local, kind, minikube or openshift
    #[arg(long, global = true)]
    cluster_type: Option<ClusterType>,

    /// Server address (host[:port]); skips cluster discovery
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the resolved base URL
    Resolve,
    CreateMetricProfile {
        file: PathBuf,
    },
    DeleteMetricProfile {
        file: PathBuf,
        #[arg(long)]
        invalid_header: bool,
    },
    ListMetricProfiles {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        verbose: Option<String>,
    },
    /// Submit a bulk job
    Bulk {
        file: PathBuf,
    },
    /// Poll a bulk job
    BulkStatus {
        job_id: String,
        #[arg(long)]
        include: Option<String>,
        #[arg(long)]
        experiment_name: Option<String>,
    },
    ListRecommendations {
        #[arg(long)]
        experiment_name: Option<String>,
        #[arg(long)]
        latest: Option<String>,
        #[arg(long)]
        monitoring_end_time: Option<String>,
    },
    CreateExperiment {
        file: PathBuf,
        #[arg(long)]
        invalid_header: bool,
    },
    DeleteExperiment {
        file: PathBuf,
        #[arg(long)]
        invalid_header: bool,
    },
    UpdateRecommendations {
        experiment_name: String,
        #[arg(long)]
        interval_start_time: Option<String>,
        #[arg(long)]
        interval_end_time: Option<String>,
    },
    ListExperiments {
        #[arg(long)]
        experiment_name: Option<String>,
        #[arg(long)]
        latest: Option<String>,
        #[arg(long)]
        results: Option<String>,
        #[arg(long)]
        recommendations: Option<String>,
    },
    ListDatasources {
        #[arg(long)]
        name: Option<String>,
    },
    ImportMetadata {
        file: PathBuf,
        #[arg(long)]
        invalid_header: bool,
    },
    DeleteMetadata {
        file: PathBuf,
        #[arg(long)]
        invalid_header: bool,
    },
    ListMetadata {
        #[arg(long)]
        datasource: Option<String>,
        #[arg(long)]
        cluster_name: Option<String>,
        #[arg(long)]
        namespace: Option<String>,
        #[arg(long)]
        verbose: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    // Every command is a single request; one thread is enough.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async_main())
}

async fn async_main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kruize_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?.with_overrides(cli.cluster_type, cli.server);
    info!("Cluster type: {}", config.cluster_type);

    let base_url = discovery::resolve_base_url(&config)
        .await
        .context("Failed to resolve the Kruize address")?;
    let client = KruizeClient::new(base_url).with_body_logging(config.log_bodies);

    let response = match cli.command {
        Command::Resolve => {
            println!("{}", client.base_url());
            return Ok(());
        }
        Command::CreateMetricProfile { file } => client.create_metric_profile(&file).await?,
        Command::DeleteMetricProfile {
            file,
            invalid_header,
        } => client.delete_metric_profile(&file, invalid_header).await?,
        Command::ListMetricProfiles { name, verbose } => {
            client
                .list_metric_profiles(name.as_deref(), verbose.as_deref(), config.log_bodies)
                .await?
        }
        Command::Bulk { file } => client.bulk(&file).await?,
        Command::BulkStatus {
            job_id,
            include,
            experiment_name,
        } => {
            client
                .get_bulk_job_status(&job_id, include.as_deref(), experiment_name.as_deref())
                .await?
        }
        Command::ListRecommendations {
            experiment_name,
            latest,
            monitoring_end_time,
        } => {
            client
                .list_recommendations(&RecommendationQuery {
                    experiment_name,
                    latest,
                    monitoring_end_time,
                })
                .await?
        }
        Command::CreateExperiment {
            file,
            invalid_header,
        } => client.create_experiment(&file, invalid_header).await?,
        Command::DeleteExperiment {
            file,
            invalid_header,
        } => client.delete_experiment(&file, invalid_header).await?,
        Command::UpdateRecommendations {
            experiment_name,
            interval_start_time,
            interval_end_time,
        } => {
            client
                .update_recommendations(
                    &experiment_name,
                    interval_start_time.as_deref(),
                    interval_end_time.as_deref(),
                )
                .await?
        }
        Command::ListExperiments {
            experiment_name,
            latest,
            results,
            recommendations,
        } => {
            client
                .list_experiments(&ExperimentQuery {
                    experiment_name,
                    latest,
                    results,
                    recommendations,
                })
                .await?
        }
        Command::ListDatasources { name } => client.list_datasources(name.as_deref()).await?,
        Command::ImportMetadata {
            file,
            invalid_header,
        } => client.import_metadata(&file, invalid_header).await?,
        Command::DeleteMetadata {
            file,
            invalid_header,
        } => client.delete_metadata(&file, invalid_header).await?,
        Command::ListMetadata {
            datasource,
            cluster_name,
            namespace,
            verbose,
        } => {
            client
                .list_metadata(
                    &MetadataQuery {
                        datasource,
                        cluster_name,
                        namespace,
                        verbose,
                    },
                    config.log_bodies,
                )
                .await?
        }
    };

    print_response(&response);
    Ok(())
}

/// Print the body, pretty-printed when it is JSON.
fn print_response(response: &ApiResponse) {
    let rendered = response
        .json()
        .and_then(|value| serde_json::to_string_pretty(&value))
        .unwrap_or_else(|_| response.body.clone());
    if !rendered.is_empty() {
        println!("{}", rendered);
    }
}
