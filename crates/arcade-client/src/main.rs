use arcade_client::app;
use arcade_client::config::ClientConfig;
use arcade_client::error::ClientError;
use arcade_client::logging;

fn main() {
    if let Err(e) = run() {
        eprintln!("arcade: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), ClientError> {
    let config = ClientConfig::load();
    config.validate()?;
    logging::init(&config.log_file)?;

    tracing::info!(games_dir = %config.launcher.games_dir.display(), "Arcade launcher starting");
    app::run_launcher(&config)
}
