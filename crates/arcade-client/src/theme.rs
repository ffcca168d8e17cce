use serde::{Deserialize, Serialize};

pub type Rgb = [u8; 3];

/// Terminal color theme, loaded from JSON at compile time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub ui: UiTheme,
    pub platformer: PlatformerTheme,
}

/// Launcher colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiTheme {
    pub background: Rgb,
    pub card: Rgb,
    pub card_footer: Rgb,
    pub text_primary: Rgb,
    pub text_secondary: Rgb,
}

impl Default for UiTheme {
    fn default() -> Self {
        Self {
            background: [15, 16, 20],
            card: [28, 29, 36],
            card_footer: [22, 23, 28],
            text_primary: [238, 239, 244],
            text_secondary: [188, 190, 198],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformerTheme {
    pub background: Rgb,
    pub solid: Rgb,
    pub platform: Rgb,
    pub spike: Rgb,
    pub coin: Rgb,
    pub enemy: Rgb,
    pub goal: Rgb,
    pub checkpoint: Rgb,
    pub player: Rgb,
    pub hud: Rgb,
    pub hint: Rgb,
}

impl Default for PlatformerTheme {
    fn default() -> Self {
        Self {
            background: [18, 19, 23],
            solid: [36, 37, 46],
            platform: [140, 140, 170],
            spike: [220, 60, 60],
            coin: [245, 200, 80],
            enemy: [200, 80, 120],
            goal: [70, 200, 120],
            checkpoint: [100, 180, 255],
            player: [230, 70, 80],
            hud: [245, 245, 250],
            hint: [180, 184, 194],
        }
    }
}

impl Theme {
    /// Load theme from embedded JSON, falling back to defaults.
    pub fn load() -> Self {
        let json = include_str!("../../../assets/theme.json");
        serde_json::from_str(json).unwrap_or_default()
    }
}

/// Scale a color toward black; `amount` 1.0 keeps it unchanged.
pub fn dim(c: Rgb, amount: f32) -> Rgb {
    let k = amount.clamp(0.0, 1.0);
    c.map(|channel| (f32::from(channel) * k).round() as u8)
}

/// Convert to a crossterm color.
pub fn term_color(c: Rgb) -> crossterm::style::Color {
    crossterm::style::Color::Rgb {
        r: c[0],
        g: c[1],
        b: c[2],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_theme_matches_defaults() {
        assert_eq!(Theme::load(), Theme::default());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let theme: Theme = serde_json::from_str(r#"{"platformer":{"coin":[1,2,3]}}"#).unwrap();
        assert_eq!(theme.platformer.coin, [1, 2, 3]);
        assert_eq!(theme.platformer.player, PlatformerTheme::default().player);
        assert_eq!(theme.ui, UiTheme::default());
    }

    #[test]
    fn dim_scales_channels() {
        assert_eq!(dim([200, 100, 0], 0.5), [100, 50, 0]);
        assert_eq!(dim([200, 100, 0], 2.0), [200, 100, 0]);
        assert_eq!(dim([200, 100, 0], -1.0), [0, 0, 0]);
    }
}
