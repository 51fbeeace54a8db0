use anyhow::Context;
use bridge_desktop::{ReqwestHttpClient, TokioFileSystem};
use clap::Parser;
use core_auth::{AuthError, PasswordGrantClient, PasswordGrantConfig};
use core_runtime::config::{UploaderConfig, DEFAULT_CONFIG_FILE};
use core_runtime::logging::{init_logging, LogFormat, LogLevel, LoggingConfig};
use core_sync::{AbortReason, SyncConfig, SyncCoordinator, SyncError, SyncReport};
use provider_fileserver::{FileserverConnector, FileserverError};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};

const EXIT_FAILURE: u8 = 1;
const EXIT_CONFIG: u8 = 2;
const EXIT_SOURCE_MISSING: u8 = 3;
const EXIT_AUTH: u8 = 4;
const EXIT_ABORTED: u8 = 5;

#[derive(Parser)]
#[command(name = "image-uploader")]
#[command(about = "Upload missing product images and their thumbnails to the file server")]
#[command(long_about = "\
Upload missing product images and their thumbnails to the file server

Every run scans the source directory for images named <5 digits>.jpg,
asks the file server which of them it already has, and uploads the rest.
For each upload a 300px-high thumbnail tn_<name> is generated next to the
original, uploaded to the thumbnail collection and removed again.

Exit codes:
  0  all images uploaded or already present
  1  unexpected failure
  2  configuration error
  3  source directory missing
  4  authentication failed
  5  an upload failed and the run was aborted")]
#[command(version)]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Override ImageSourcePath from the configuration file
    #[arg(long)]
    source_dir: Option<PathBuf>,

    /// Log output format: compact, pretty or json
    #[arg(long, default_value = "compact", value_parser = parse_log_format)]
    log_format: LogFormat,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Custom tracing filter, e.g. "core_sync=trace,reqwest=debug"
    #[arg(long)]
    log_filter: Option<String>,
}

fn parse_log_format(s: &str) -> Result<LogFormat, String> {
    s.parse().map_err(|e: core_runtime::Error| e.to_string())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::default()
        .with_format(cli.log_format)
        .with_level(LogLevel::from_verbosity(cli.verbose));
    if let Some(filter) = &cli.log_filter {
        logging = logging.with_filter(filter.clone());
    }
    if let Err(e) = init_logging(logging) {
        eprintln!("image-uploader: {}", e);
        return ExitCode::from(EXIT_FAILURE);
    }

    match run(&cli).await {
        Ok(report) => ExitCode::from(report_exit_code(&report)),
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(error_exit_code(&e))
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<SyncReport> {
    let mut config = UploaderConfig::load(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    if let Some(source_dir) = &cli.source_dir {
        config = config.with_image_source_path(source_dir);
        config.validate()?;
    }
    info!(
        source_dir = %config.image_source_path.display(),
        fileserver = %config.fileserver_api.url,
        "Configuration loaded"
    );

    let http_client = Arc::new(
        ReqwestHttpClient::with_timeout(config.request_timeout())
            .context("Failed to create HTTP client")?,
    );
    let fs = Arc::new(TokioFileSystem::new());

    let grant = PasswordGrantConfig::from_iam(&config.iam)?.with_timeout(config.request_timeout());
    let token_provider = Arc::new(PasswordGrantClient::new(grant, http_client.clone()));
    let image_store = Arc::new(FileserverConnector::from_config(
        &config,
        http_client,
        fs.clone(),
    )?);

    let coordinator = SyncCoordinator::new(
        SyncConfig::from_uploader_config(&config),
        fs,
        token_provider,
        image_store,
    );

    let report = coordinator.run().await?;

    if report.is_success() {
        info!(
            skipped = report.skipped,
            uploaded = report.uploaded,
            "All images are on the file server"
        );
    } else {
        let reason = report
            .abort_reason
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        warn!(
            phase = %report.phase,
            item = report.aborted_at.as_deref().unwrap_or("-"),
            reason = %reason,
            uploaded = report.uploaded,
            remaining = report.remaining(),
            "Run aborted"
        );
    }

    Ok(report)
}

fn report_exit_code(report: &SyncReport) -> u8 {
    match &report.abort_reason {
        _ if report.is_success() => 0,
        Some(AbortReason::Authentication(_)) => EXIT_AUTH,
        _ => EXIT_ABORTED,
    }
}

fn error_exit_code(err: &anyhow::Error) -> u8 {
    if err.downcast_ref::<core_runtime::Error>().is_some()
        || matches!(err.downcast_ref::<AuthError>(), Some(AuthError::InvalidConfig(_)))
        || matches!(
            err.downcast_ref::<FileserverError>(),
            Some(FileserverError::InvalidConfig(_))
        )
    {
        return EXIT_CONFIG;
    }

    match err.downcast_ref::<SyncError>() {
        Some(SyncError::SourceDirectoryMissing(_)) => EXIT_SOURCE_MISSING,
        _ => EXIT_FAILURE,
    }
}
