use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;

const GITHUB_LIGHT_BACKGROUND: &str = "#ffffff";
const GITHUB_LIGHT_TEXT: &str = "#24292f";
const GITHUB_LIGHT_ENTITY_FILL: &str = "#f6f8fa";
const GITHUB_LIGHT_EDGE: &str = "#24292f";
const GITHUB_LIGHT_ACCENT: &str = "#0969da";

const BUILTIN_THEMES: &[(&str, &str)] = &[
    ("dracula", include_str!("../themes/dracula.toml")),
    ("github_dark", include_str!("../themes/github_dark.toml")),
    ("github_light", include_str!("../themes/github_light.toml")),
    ("nord", include_str!("../themes/nord.toml")),
    ("solarized_light", include_str!("../themes/solarized_light.toml")),
];

const FONT_FAMILY: &str = "sans-serif";
const FONT_SIZE: f32 = 14.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default = "default_background")]
    pub background_color: String,
    #[serde(default = "default_text")]
    pub text_color: String,
    #[serde(default = "default_entity_fill")]
    pub entity_fill_color: String,
    #[serde(default = "default_edge")]
    pub edge_color: String,
    /// Fill of "one" cardinality glyphs
    #[serde(default = "default_accent")]
    pub accent_color: String,

    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
}

fn default_background() -> String {
    GITHUB_LIGHT_BACKGROUND.to_string()
}
fn default_text() -> String {
    GITHUB_LIGHT_TEXT.to_string()
}
fn default_entity_fill() -> String {
    GITHUB_LIGHT_ENTITY_FILL.to_string()
}
fn default_edge() -> String {
    GITHUB_LIGHT_EDGE.to_string()
}
fn default_accent() -> String {
    GITHUB_LIGHT_ACCENT.to_string()
}
fn default_font_family() -> String {
    FONT_FAMILY.to_string()
}
fn default_font_size() -> f32 {
    FONT_SIZE
}

impl Default for Theme {
    fn default() -> Self {
        Self::github_light()
    }
}

#[derive(Debug, Deserialize)]
struct AlacrittyColors {
    primary: AlacrittyPrimary,
    normal: AlacrittyNormal,
}

#[derive(Debug, Deserialize)]
struct AlacrittyPrimary {
    background: String,
    foreground: String,
}

#[derive(Debug, Deserialize)]
struct AlacrittyNormal {
    black: String,
    blue: String,
}

#[derive(Debug, Deserialize)]
struct AlacrittyTheme {
    colors: AlacrittyColors,
}

impl Theme {
    pub fn github_light() -> Self {
        Theme {
            background_color: GITHUB_LIGHT_BACKGROUND.to_string(),
            text_color: GITHUB_LIGHT_TEXT.to_string(),
            entity_fill_color: GITHUB_LIGHT_ENTITY_FILL.to_string(),
            edge_color: GITHUB_LIGHT_EDGE.to_string(),
            accent_color: GITHUB_LIGHT_ACCENT.to_string(),
            font_family: FONT_FAMILY.to_string(),
            font_size: FONT_SIZE,
        }
    }

    pub fn from_builtin(name: &str) -> Result<Self, Error> {
        let normalized = name.trim().to_ascii_lowercase().replace('-', "_");
        let content = BUILTIN_THEMES
            .iter()
            .find(|(n, _)| *n == normalized)
            .map(|(_, c)| *c)
            .ok_or_else(|| Error::UnknownTheme {
                name: name.to_string(),
                available: Self::list_builtins().join(", "),
            })?;
        Self::from_alacritty_toml(content)
    }

    pub fn list_builtins() -> Vec<&'static str> {
        BUILTIN_THEMES.iter().map(|(n, _)| *n).collect()
    }

    /// Loads an Alacritty theme file, trying TOML before the legacy YAML format.
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        if !path.is_file() {
            return Err(Error::ThemeNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;

        match Self::from_alacritty_toml(&content) {
            Ok(theme) => Ok(theme),
            Err(toml_err) => Self::from_alacritty_yaml(&content).map_err(|yaml_err| {
                tracing::debug!(%toml_err, %yaml_err, "theme is neither TOML nor YAML");
                Error::ThemeFormat(path.to_path_buf())
            }),
        }
    }

    pub fn from_alacritty_yaml(content: &str) -> Result<Self, Error> {
        let alacritty: AlacrittyTheme = serde_yaml::from_str(content)?;
        Ok(Self::from_alacritty_theme(alacritty))
    }

    pub fn from_alacritty_toml(content: &str) -> Result<Self, Error> {
        let alacritty: AlacrittyTheme = toml::from_str(content)?;
        Ok(Self::from_alacritty_theme(alacritty))
    }

    fn from_alacritty_theme(alacritty: AlacrittyTheme) -> Self {
        let colors = alacritty.colors;

        Theme {
            entity_fill_color: colors.primary.background.clone(),
            background_color: colors.primary.background,
            edge_color: colors.primary.foreground.clone(),
            text_color: colors.primary.foreground,
            accent_color: colors.normal.blue,
            font_family: FONT_FAMILY.to_string(),
            font_size: FONT_SIZE,
        }
        .with_black(&colors.normal.black)
    }

    /// Dark palettes draw entity boxes on the terminal black so they stand
    /// off the background.
    fn with_black(mut self, black: &str) -> Self {
        if is_dark(&self.background_color) {
            self.entity_fill_color = black.to_string();
        }
        self
    }
}

fn is_dark(color: &str) -> bool {
    parse_hex_rgb(color).is_some_and(|rgb| relative_luminance(rgb) < 0.2)
}

fn parse_hex_rgb(value: &str) -> Option<(f32, f32, f32)> {
    let hex = value.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()? as f32 / 255.0;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()? as f32 / 255.0;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()? as f32 / 255.0;
    Some((r, g, b))
}

fn relative_luminance(color: (f32, f32, f32)) -> f32 {
    let linear = |v: f32| {
        if v <= 0.03928 {
            v / 12.92
        } else {
            ((v + 0.055) / 1.055).powf(2.4)
        }
    };

    let (r, g, b) = color;
    0.2126 * linear(r) + 0.7152 * linear(g) + 0.0722 * linear(b)
}

fn contrast_ratio(a: &str, b: &str) -> Option<f32> {
    let l1 = relative_luminance(parse_hex_rgb(a)?);
    let l2 = relative_luminance(parse_hex_rgb(b)?);
    let (hi, lo) = if l1 >= l2 { (l1, l2) } else { (l2, l1) };
    Some((hi + 0.05) / (lo + 0.05))
}

/// Whichever of `primary` and `secondary` reads better on `base`; ties and
/// unparsable colours go to `primary`.
pub(crate) fn pick_higher_contrast(base: &str, primary: &str, secondary: &str) -> String {
    let p = contrast_ratio(base, primary).unwrap_or(0.0);
    let s = contrast_ratio(base, secondary).unwrap_or(0.0);

    if s > p {
        secondary.to_string()
    } else {
        primary.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{Theme, pick_higher_contrast};
    use crate::error::Error;

    #[test]
    fn contrast_prefers_readable_colour() {
        assert_eq!(pick_higher_contrast("#ffffff", "#000000", "#eeeeee"), "#000000");
        assert_eq!(pick_higher_contrast("#000000", "#000000", "#f8f8f2"), "#f8f8f2");
        assert_eq!(pick_higher_contrast("#ffffff", "black", "#eeeeee"), "#eeeeee");
    }

    #[test]
    fn from_builtin_accepts_hyphenated_and_case_insensitive_names() {
        let underscore = Theme::from_builtin("github_dark").expect("underscore variant");
        let hyphen = Theme::from_builtin("GitHub-Dark").expect("hyphen variant");
        assert_eq!(underscore, hyphen);
    }

    #[test]
    fn every_builtin_parses() {
        for name in Theme::list_builtins() {
            Theme::from_builtin(name).unwrap_or_else(|e| panic!("{}: {}", name, e));
        }
    }

    #[test]
    fn unknown_builtin_lists_available_names() {
        let err = Theme::from_builtin("no-such-theme").unwrap_err();
        assert!(matches!(err, Error::UnknownTheme { .. }));
        assert!(err.to_string().contains("github_light"));
    }

    #[test]
    fn yaml_theme_maps_primary_colors() {
        let yaml = r##"
colors:
  primary:
    background: "#fdf6e3"
    foreground: "#657b83"
  normal:
    black: "#073642"
    blue: "#268bd2"
"##;
        let theme = Theme::from_alacritty_yaml(yaml).unwrap();
        assert_eq!(theme.background_color, "#fdf6e3");
        assert_eq!(theme.text_color, "#657b83");
        assert_eq!(theme.accent_color, "#268bd2");
        // light background keeps boxes on the background colour
        assert_eq!(theme.entity_fill_color, "#fdf6e3");
    }

    #[test]
    fn dark_theme_fills_entities_with_black() {
        let theme = Theme::from_builtin("dracula").unwrap();
        assert_ne!(theme.entity_fill_color, theme.background_color);
    }

    #[test]
    fn missing_theme_file_is_reported() {
        let err = Theme::from_file(std::path::Path::new("/nonexistent/theme.toml")).unwrap_err();
        assert!(matches!(err, Error::ThemeNotFound(_)));
    }
}
