use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Name of the optional metadata file inside a game directory.
pub const META_FILE: &str = "meta.json";
/// Executable looked up when `meta.json` does not name a command.
pub const ENTRY_FILE: &str = "run";
/// Accent used when a game does not specify one.
pub const DEFAULT_ACCENT: [u8; 3] = [64, 140, 255];

/// Unique identifier for a game in the catalog (its directory name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameId(pub String);

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A game found in the games directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEntry {
    pub id: GameId,
    pub title: String,
    pub subtitle: String,
    pub accent: [u8; 3],
    pub path: PathBuf,
    /// Program followed by its arguments. Relative programs resolve against `path`.
    pub command: Vec<String>,
}

/// On-disk `meta.json` contents. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct GameMeta {
    title: Option<String>,
    subtitle: Option<String>,
    accent: Option<Vec<serde_json::Value>>,
    command: Option<Vec<String>>,
}

/// Scan `root` for game directories, sorted by directory name.
///
/// A directory is a game if its `meta.json` names a command or it contains a
/// `run` file. A missing root yields an empty catalog.
pub fn discover_games(root: &Path) -> Vec<GameEntry> {
    let Ok(dir) = std::fs::read_dir(root) else {
        tracing::info!(root = %root.display(), "games directory not found");
        return Vec::new();
    };

    let mut slugs: Vec<(String, PathBuf)> = dir
        .filter_map(Result::ok)
        .filter(|e| e.path().is_dir())
        .filter_map(|e| {
            let name = e.file_name().into_string().ok()?;
            Some((name, e.path()))
        })
        .collect();
    slugs.sort_by(|a, b| a.0.cmp(&b.0));

    let games: Vec<GameEntry> = slugs
        .into_iter()
        .filter_map(|(slug, path)| load_entry(slug, path))
        .collect();
    tracing::info!(count = games.len(), root = %root.display(), "discovered games");
    games
}

fn load_entry(slug: String, path: PathBuf) -> Option<GameEntry> {
    let meta = read_meta(&path.join(META_FILE));

    let command = match meta.command.filter(|c| !c.is_empty()) {
        Some(command) => command,
        None => {
            let entry = path.join(ENTRY_FILE);
            if !entry.is_file() {
                return None;
            }
            vec![entry.to_string_lossy().into_owned()]
        },
    };

    Some(GameEntry {
        title: meta.title.unwrap_or_else(|| title_from_slug(&slug)),
        subtitle: meta.subtitle.unwrap_or_default(),
        accent: meta.accent.as_deref().and_then(parse_accent).unwrap_or(DEFAULT_ACCENT),
        id: GameId(slug),
        path,
        command,
    })
}

fn read_meta(path: &Path) -> GameMeta {
    let Ok(content) = std::fs::read_to_string(path) else {
        return GameMeta::default();
    };
    match serde_json::from_str::<GameMeta>(&content) {
        Ok(meta) => meta,
        Err(e) => {
            tracing::warn!("Ignoring {}: {e}", path.display());
            GameMeta::default()
        },
    }
}

/// Accepts exactly three numeric channels; anything else is ignored.
fn parse_accent(values: &[serde_json::Value]) -> Option<[u8; 3]> {
    if values.len() != 3 {
        return None;
    }
    let mut rgb = [0u8; 3];
    for (slot, value) in rgb.iter_mut().zip(values) {
        let channel = value.as_f64()?;
        *slot = channel.clamp(0.0, 255.0) as u8;
    }
    Some(rgb)
}

/// `"red_runner"` -> `"Red Runner"`.
pub fn title_from_slug(slug: &str) -> String {
    slug.replace('_', " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                },
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_game(root: &Path, slug: &str, meta: Option<&str>, entry: bool) {
        let dir = root.join(slug);
        std::fs::create_dir_all(&dir).unwrap();
        if let Some(meta) = meta {
            std::fs::write(dir.join(META_FILE), meta).unwrap();
        }
        if entry {
            std::fs::write(dir.join(ENTRY_FILE), "#!/bin/sh\n").unwrap();
        }
    }

    #[test]
    fn missing_root_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(discover_games(&tmp.path().join("nope")).is_empty());
    }

    #[test]
    fn games_sorted_and_defaults_applied() {
        let tmp = tempfile::tempdir().unwrap();
        make_game(tmp.path(), "zeta_blaster", None, true);
        make_game(tmp.path(), "alpha", None, true);

        let games = discover_games(tmp.path());
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].id, GameId("alpha".into()));
        assert_eq!(games[1].title, "Zeta Blaster");
        assert_eq!(games[1].subtitle, "");
        assert_eq!(games[1].accent, DEFAULT_ACCENT);
        assert!(games[1].command[0].ends_with(ENTRY_FILE));
    }

    #[test]
    fn directory_without_entry_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        make_game(tmp.path(), "empty", None, false);
        make_game(tmp.path(), "meta_only", Some(r#"{"title":"No Command"}"#), false);
        assert!(discover_games(tmp.path()).is_empty());
    }

    #[test]
    fn meta_overrides_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        make_game(
            tmp.path(),
            "red_runner",
            Some(
                r#"{"title":"Red Runner","subtitle":"Run and jump","accent":[230,70,80],"command":["red-runner","--seed","7"]}"#,
            ),
            false,
        );
        let games = discover_games(tmp.path());
        assert_eq!(games.len(), 1);
        let game = &games[0];
        assert_eq!(game.title, "Red Runner");
        assert_eq!(game.subtitle, "Run and jump");
        assert_eq!(game.accent, [230, 70, 80]);
        assert_eq!(game.command, vec!["red-runner", "--seed", "7"]);
    }

    #[test]
    fn bad_accent_and_bad_json_fall_back() {
        let tmp = tempfile::tempdir().unwrap();
        make_game(tmp.path(), "a", Some(r#"{"accent":[1,2]}"#), true);
        make_game(tmp.path(), "b", Some("{not json"), true);
        let games = discover_games(tmp.path());
        assert_eq!(games[0].accent, DEFAULT_ACCENT);
        assert_eq!(games[1].title, "B");
    }

    #[test]
    fn slug_titles() {
        assert_eq!(title_from_slug("red_runner"), "Red Runner");
        assert_eq!(title_from_slug("pong"), "Pong");
    }
}
