use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read from stdin: {0}")]
    Stdin(#[source] std::io::Error),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid diagram model: {0}")]
    Model(#[from] serde_json::Error),

    #[error("theme file not found: {}", .0.display())]
    ThemeNotFound(PathBuf),

    #[error("failed to parse theme file {} as TOML or YAML", .0.display())]
    ThemeFormat(PathBuf),

    #[error("failed to parse Alacritty TOML: {0}")]
    ThemeToml(#[from] toml::de::Error),

    #[error("failed to parse Alacritty YAML: {0}")]
    ThemeYaml(#[from] serde_yaml::Error),

    #[error("unknown built-in theme '{name}'. Available: {available}")]
    UnknownTheme { name: String, available: String },

    #[error("route needs at least 2 points, got {len}")]
    ShortRoute { len: usize },

    #[error("output file has no extension")]
    MissingExtension,

    #[error("unsupported output format: .{0} (use .svg, .png or .pdf)")]
    UnsupportedFormat(String),

    #[error("invalid --png-scale value: {0}")]
    InvalidScale(f32),

    #[error("failed to rasterize SVG: {0}")]
    Raster(String),

    #[error("failed to convert SVG to PDF: {0}")]
    Pdf(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
