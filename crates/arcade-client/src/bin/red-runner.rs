use arcade_client::app;
use arcade_client::config::ClientConfig;
use arcade_client::error::ClientError;
use arcade_client::logging;
use arcade_platformer::config::PlatformerConfig;

fn main() {
    if let Err(e) = run() {
        eprintln!("red-runner: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), ClientError> {
    let config = ClientConfig::load();
    config.validate()?;
    logging::init(&config.log_file)?;

    let game_config = PlatformerConfig::load();
    tracing::info!(seed = game_config.seed, "Red Runner starting");
    app::run_red_runner(&config, &game_config)
}
