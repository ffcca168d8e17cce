use std::path::Path;

use arcade_client::config::ClientConfig;
use arcade_client::launcher::{Launcher, resolve_program_in};
use arcade_core::game_registry::discover_games;

const ROOT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../..");

#[test]
fn shipped_catalog_lists_red_runner() {
    let games = discover_games(&Path::new(ROOT).join("games"));
    assert_eq!(games.len(), 1);
    let red = &games[0];
    assert_eq!(red.id.0, "red_runner");
    assert_eq!(red.title, "Red Runner");
    assert_eq!(red.accent, [230, 70, 80]);
    assert_eq!(red.command, vec!["red-runner"]);
}

#[test]
fn shipped_game_resolves_to_the_built_binary() {
    let games = discover_games(&Path::new(ROOT).join("games"));
    let built = Path::new(env!("CARGO_BIN_EXE_red-runner"));
    assert_eq!(
        resolve_program_in(&games[0], built.parent()),
        Some(built.to_path_buf())
    );
}

#[test]
fn shipped_client_config_is_default_and_valid() {
    let cfg = ClientConfig::load_from(&Path::new(ROOT).join("arcade.toml"));
    assert_eq!(cfg, ClientConfig::default());
    assert!(cfg.validate().is_ok());
}

#[test]
fn launcher_over_shipped_catalog() {
    let launcher = Launcher::new(Path::new(ROOT).join("games"));
    assert_eq!(
        launcher.selected().map(|g| g.title.as_str()),
        Some("Red Runner")
    );
}
