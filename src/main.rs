use std::fs::File;
use std::sync::Arc;

use atpinsight::backend::HttpBackend;
use atpinsight::core::config::{self, AtpConfig, CliOverrides};
use atpinsight::tui;
use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "atpinsight", about = "Terminal chat client for ATP match questions")]
struct Args {
    /// Backend base URL (e.g. http://127.0.0.1:8000)
    #[arg(long)]
    api_url: Option<String>,
    /// Access code to verify at start-up
    #[arg(long)]
    access_code: Option<String>,
    /// Skip the access gate (backend without /verify)
    #[arg(long)]
    no_gate: bool,
    /// Client-side request timeout in seconds (0 disables it)
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Log file path
    #[arg(long)]
    log_file: Option<String>,
}

impl From<Args> for CliOverrides {
    fn from(args: Args) -> Self {
        Self {
            api_url: args.api_url,
            access_code: args.access_code,
            no_gate: args.no_gate,
            timeout_secs: args.timeout_secs,
            log_file: args.log_file,
        }
    }
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let cli = CliOverrides::from(Args::parse());
    dotenv::dotenv().ok();

    let file_config = config::load_config().unwrap_or_else(|e| {
        eprintln!("Warning: {e}, using defaults");
        AtpConfig::default()
    });
    let resolved = config::resolve(&file_config, &cli);

    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create(&resolved.log_file) {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    log::info!(
        "ATPInsight starting up: backend={}, gate={}",
        resolved.base_url,
        resolved.require_access_code
    );

    let backend = match HttpBackend::from_config(&resolved) {
        Ok(backend) => backend,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    tui::run(resolved, Arc::new(backend))
}
