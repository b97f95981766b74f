//! Search worker entry point.

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use search_worker::{Dependencies, LogFormat, WorkerError, WorkerSettings};

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

async fn run() -> Result<(), WorkerError> {
    let settings = WorkerSettings::from_env()?;
    init_tracing(settings.log_format);

    let dependencies = Dependencies::new(&settings).await?;
    dependencies.worker.run().await?;

    info!("Search worker stopped");
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    if let Err(e) = run().await {
        // Tracing may not be installed yet when settings fail to parse.
        eprintln!("search-worker failed: {}", e);
        error!(error = %e, "Search worker failed");
        std::process::exit(1);
    }
}
