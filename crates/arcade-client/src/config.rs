use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// File read by [`ClientConfig::load`] from the working directory.
pub const CONFIG_FILE: &str = "arcade.toml";

/// Top-level client configuration, loaded from `arcade.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub fps: u32,
    /// Upper bound on a single frame's delta time, in seconds.
    pub max_dt: f32,
    pub log_file: PathBuf,
    pub input: InputConfig,
    pub launcher: LauncherConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            max_dt: 1.0 / 20.0,
            log_file: PathBuf::from("arcade.log"),
            input: InputConfig::default(),
            launcher: LauncherConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Left stick magnitude below which horizontal input is ignored.
    pub deadzone: f32,
    pub gamepad_index: usize,
    /// How long a key counts as held after its last press or repeat, for
    /// terminals that never report key releases.
    pub key_hold_secs: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            deadzone: 0.35,
            gamepad_index: 0,
            key_hold_secs: 0.15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    pub games_dir: PathBuf,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            games_dir: PathBuf::from("games"),
        }
    }
}

impl ClientConfig {
    /// Load config from `arcade.toml` if it exists, then apply env var overrides.
    ///
    /// Runs before logging is set up, so problems are reported by `validate`.
    pub fn load() -> Self {
        let mut config = Self::load_from(Path::new(CONFIG_FILE));
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Parse the given file, falling back to defaults when it is missing or
    /// malformed.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<ClientConfig>(&content) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {e}, using defaults", path.display());
                    ClientConfig::default()
                },
            },
            Err(_) => ClientConfig::default(),
        }
    }

    /// Environment variable overrides. `lookup` is `std::env::var` outside tests.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("ARCADE_FPS")
            && let Ok(n) = val.parse::<u32>()
        {
            self.fps = n;
        }
        if let Some(dir) = lookup("ARCADE_GAMES_DIR")
            && !dir.is_empty()
        {
            self.launcher.games_dir = PathBuf::from(dir);
        }
        if let Some(file) = lookup("ARCADE_LOG_FILE")
            && !file.is_empty()
        {
            self.log_file = PathBuf::from(file);
        }
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if self.fps == 0 {
            return Err(ClientError::Config("fps must be > 0".into()));
        }
        if !self.max_dt.is_finite() || self.max_dt <= 0.0 {
            return Err(ClientError::Config("max_dt must be > 0".into()));
        }
        if !(0.0..1.0).contains(&self.input.deadzone) {
            return Err(ClientError::Config(
                "input.deadzone must be in [0, 1)".into(),
            ));
        }
        if !self.input.key_hold_secs.is_finite() || self.input.key_hold_secs <= 0.0 {
            return Err(ClientError::Config(
                "input.key_hold_secs must be > 0".into(),
            ));
        }
        if self.launcher.games_dir.as_os_str().is_empty() {
            return Err(ClientError::Config(
                "launcher.games_dir must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.fps, 60);
        assert_eq!(cfg.max_dt, 0.05);
        assert_eq!(cfg.log_file, PathBuf::from("arcade.log"));
        assert_eq!(cfg.input.deadzone, 0.35);
        assert_eq!(cfg.input.gamepad_index, 0);
        assert_eq!(cfg.launcher.games_dir, PathBuf::from("games"));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn parse_partial_toml() {
        let toml_str = r#"
fps = 30

[input]
deadzone = 0.2
"#;
        let cfg: ClientConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.fps, 30);
        assert_eq!(cfg.input.deadzone, 0.2);
        assert_eq!(cfg.input.key_hold_secs, 0.15);
        assert_eq!(cfg.launcher, LauncherConfig::default());
    }

    #[test]
    fn load_from_falls_back_on_missing_or_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            ClientConfig::load_from(&dir.path().join("absent.toml")),
            ClientConfig::default()
        );

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "fps = \"fast\"").unwrap();
        assert_eq!(ClientConfig::load_from(&bad), ClientConfig::default());

        let good = dir.path().join("arcade.toml");
        std::fs::write(&good, "log_file = \"play.log\"\n").unwrap();
        assert_eq!(
            ClientConfig::load_from(&good).log_file,
            PathBuf::from("play.log")
        );
    }

    #[test]
    fn env_overrides_apply() {
        let mut cfg = ClientConfig::default();
        cfg.apply_overrides(|key| match key {
            "ARCADE_FPS" => Some("120".into()),
            "ARCADE_GAMES_DIR" => Some("/srv/games".into()),
            "ARCADE_LOG_FILE" => Some(String::new()),
            _ => None,
        });
        assert_eq!(cfg.fps, 120);
        assert_eq!(cfg.launcher.games_dir, PathBuf::from("/srv/games"));
        assert_eq!(cfg.log_file, PathBuf::from("arcade.log"));
    }

    #[test]
    fn unparsable_override_is_ignored() {
        let mut cfg = ClientConfig::default();
        cfg.apply_overrides(|key| (key == "ARCADE_FPS").then(|| "lots".to_string()));
        assert_eq!(cfg.fps, 60);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let zero_fps = ClientConfig {
            fps: 0,
            ..Default::default()
        };
        assert!(matches!(zero_fps.validate(), Err(ClientError::Config(_))));

        let mut wide = ClientConfig::default();
        wide.input.deadzone = 1.0;
        assert!(wide.validate().is_err());

        let mut no_hold = ClientConfig::default();
        no_hold.input.key_hold_secs = 0.0;
        assert!(no_hold.validate().is_err());

        let no_dt = ClientConfig {
            max_dt: f32::NAN,
            ..Default::default()
        };
        assert!(no_dt.validate().is_err());
    }
}
