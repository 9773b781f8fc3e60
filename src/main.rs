use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use vra_state::config::Config;
use vra_state::error::ReadError;
use vra_state::resource::{read_deployment, DeploymentRecord, ReadContext, ReadRequest};
use vra_state::state::{StateChange, StateStore};
use vra_state::vra::{format_api_error, VraClient};

/// Read a vRA deployment into flat declarative state
#[derive(Parser, Debug)]
#[command(name = "vra-state", version = vra_state::VERSION, about, long_about = None)]
struct Args {
    /// Request id of the deployment (defaults to the id in the state file)
    #[arg(long)]
    id: Option<String>,

    /// Deployment id; takes precedence over --id
    #[arg(long)]
    deployment_id: Option<String>,

    /// vRA appliance URL
    #[arg(long)]
    host: Option<String>,

    /// Bearer token for the vRA API
    #[arg(long)]
    token: Option<String>,

    /// State file to update
    #[arg(long)]
    state: Option<PathBuf>,

    /// Output format of the record printed to stdout
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Remember host and state file in the user configuration
    #[arg(long)]
    save_config: bool,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("vra-state started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("vra-state").join("vra-state.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".vra-state").join("vra-state.log");
    }
    PathBuf::from("vra-state.log")
}

fn render(record: &DeploymentRecord, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(record)?,
        OutputFormat::Yaml => serde_yaml::to_string(record)?,
    })
}

/// User-facing summary of a failed read
fn describe(error: &ReadError) -> String {
    match error {
        ReadError::IdentityResolutionFailed { source, .. }
        | ReadError::ResourceViewFetchFailed { source, .. }
        | ReadError::ChildResourceFetchFailed { source, .. } => {
            format!("{} ({})", error, format_api_error(source))
        }
        _ => error.to_string(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    let mut config = Config::load();
    let host = config
        .effective_host(args.host.as_deref())
        .context("No vRA host configured. Set VRA_HOST or use --host")?;
    let token = config.effective_token(args.token.as_deref());
    let store = StateStore::new(config.effective_state_path(args.state.as_deref()));

    if args.save_config {
        config.host = Some(host.clone());
        config.state_path = Some(store.path().to_path_buf());
        config.save()?;
    }

    let mut request = ReadRequest::new(args.id.clone(), args.deployment_id.clone());
    if request.id.is_none() && request.deployment_id.is_none() {
        request.id = store.load()?.id;
    }

    tracing::info!("Using host: {}, state file: {:?}", host, store.path());

    let client = VraClient::new(&host, token).context("Failed to create vRA client")?;
    let ctx = ReadContext::now().with_span(tracing::info_span!("read_deployment", host = %host));

    let outcome = read_deployment(&client, &request, &ctx).await;
    let change = store.apply(&outcome)?;

    match outcome {
        Ok(record) => {
            println!("{}", render(&record, args.format)?);
            Ok(())
        }
        Err(err) => {
            if change == StateChange::Cleared {
                eprintln!("Deployment no longer exists; cleared {:?}", store.path());
            }
            Err(anyhow::anyhow!(describe(&err)))
        }
    }
}
