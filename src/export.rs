//! SVG, PNG and PDF output.

use std::path::Path;
use std::sync::Arc;

use resvg::usvg;
use tiny_skia::{Pixmap, Transform};
use tracing::info;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    Pdf,
}

impl OutputFormat {
    /// Picks the format from the file extension, case-insensitively.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or(Error::MissingExtension)?
            .to_ascii_lowercase();

        match ext.as_str() {
            "svg" => Ok(OutputFormat::Svg),
            "png" => Ok(OutputFormat::Png),
            "pdf" => Ok(OutputFormat::Pdf),
            _ => Err(Error::UnsupportedFormat(ext)),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            OutputFormat::Svg => "SVG",
            OutputFormat::Png => "PNG",
            OutputFormat::Pdf => "PDF",
        }
    }
}

/// Generic family names mapped onto installed faces.
#[derive(Debug, Default, PartialEq)]
struct FallbackFamilies {
    sans: Option<String>,
    serif: Option<String>,
    mono: Option<String>,
}

impl FallbackFamilies {
    fn scan<'a>(families: impl IntoIterator<Item = &'a str>) -> Self {
        let mut sans: Option<String> = None;
        let mut serif: Option<String> = None;
        let mut mono: Option<String> = None;
        let mut first: Option<String> = None;

        for family in families {
            if first.is_none() {
                first = Some(family.to_string());
            }

            let lower = family.to_ascii_lowercase();
            if sans.is_none() && lower.contains("sans") {
                sans = Some(family.to_string());
            }
            if serif.is_none() && lower.contains("serif") {
                serif = Some(family.to_string());
            }
            if mono.is_none() && (lower.contains("mono") || lower.contains("code")) {
                mono = Some(family.to_string());
            }
        }

        Self {
            mono: mono.or_else(|| sans.clone()).or_else(|| first.clone()),
            serif: serif.or_else(|| first.clone()),
            sans: sans.or(first),
        }
    }
}

// resvg and svg2pdf may pin different fontdb versions, so the two databases
// are distinct types.
macro_rules! load_fonts {
    ($db:expr) => {{
        let db = $db;
        db.load_system_fonts();

        let local_fonts = Path::new("fonts");
        if local_fonts.is_dir() {
            db.load_fonts_dir(local_fonts);
        }

        let fallbacks = FallbackFamilies::scan(
            db.faces()
                .flat_map(|face| face.families.iter().map(|(name, _)| name.as_str())),
        );
        if let Some(family) = &fallbacks.sans {
            db.set_sans_serif_family(family.as_str());
        }
        if let Some(family) = &fallbacks.serif {
            db.set_serif_family(family.as_str());
        }
        if let Some(family) = &fallbacks.mono {
            db.set_monospace_family(family.as_str());
        }
    }};
}

pub fn svg_to_png(svg: &str, scale: f32) -> Result<Vec<u8>, Error> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(Error::InvalidScale(scale));
    }

    let mut opts = usvg::Options::default();
    load_fonts!(opts.fontdb_mut());

    let tree = usvg::Tree::from_str(svg, &opts).map_err(|e| Error::Raster(e.to_string()))?;

    let width = (tree.size().width() * scale).ceil() as u32;
    let height = (tree.size().height() * scale).ceil() as u32;

    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| Error::Raster(format!("cannot allocate {}x{} pixmap", width, height)))?;
    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    pixmap.encode_png().map_err(|e| Error::Raster(e.to_string()))
}

pub fn svg_to_pdf(svg: &str) -> Result<Vec<u8>, Error> {
    let mut fontdb = svg2pdf::usvg::fontdb::Database::new();
    load_fonts!(&mut fontdb);

    let mut opts = svg2pdf::usvg::Options::default();
    opts.fontdb = Arc::new(fontdb);

    let tree =
        svg2pdf::usvg::Tree::from_str(svg, &opts).map_err(|e| Error::Pdf(e.to_string()))?;

    // Text goes out as paths so viewers without the fonts still show it.
    let mut options = svg2pdf::ConversionOptions::default();
    options.embed_text = false;

    svg2pdf::to_pdf(&tree, options, svg2pdf::PageOptions::default())
        .map_err(|e| Error::Pdf(e.to_string()))
}

/// Converts `svg` to the format named by `path` and writes it there.
pub fn write_output(svg: &str, path: &Path, png_scale: f32) -> Result<OutputFormat, Error> {
    let format = OutputFormat::from_path(path)?;
    let data = match format {
        OutputFormat::Svg => svg.as_bytes().to_vec(),
        OutputFormat::Png => svg_to_png(svg, png_scale)?,
        OutputFormat::Pdf => svg_to_pdf(svg)?,
    };

    std::fs::write(path, data).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), ?format, "diagram written");
    Ok(format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            OutputFormat::from_path(Path::new("out.SVG")).unwrap(),
            OutputFormat::Svg
        );
        assert_eq!(
            OutputFormat::from_path(Path::new("a/b.png")).unwrap(),
            OutputFormat::Png
        );
        assert_eq!(
            OutputFormat::from_path(Path::new("x.pdf")).unwrap(),
            OutputFormat::Pdf
        );
    }

    #[test]
    fn unknown_or_missing_extension_is_rejected() {
        assert!(matches!(
            OutputFormat::from_path(Path::new("out.jpg")),
            Err(Error::UnsupportedFormat(ext)) if ext == "jpg"
        ));
        assert!(matches!(
            OutputFormat::from_path(Path::new("out")),
            Err(Error::MissingExtension)
        ));
    }

    #[test]
    fn fallbacks_prefer_matching_names() {
        let found = FallbackFamilies::scan(["Foo", "Noto Sans", "Noto Serif", "Fira Code"]);
        assert_eq!(found.sans.as_deref(), Some("Noto Sans"));
        assert_eq!(found.serif.as_deref(), Some("Noto Serif"));
        assert_eq!(found.mono.as_deref(), Some("Fira Code"));
    }

    #[test]
    fn fallbacks_use_first_family_when_nothing_matches() {
        let found = FallbackFamilies::scan(["Foo", "Bar"]);
        assert_eq!(found.sans.as_deref(), Some("Foo"));
        assert_eq!(found.serif.as_deref(), Some("Foo"));
        assert_eq!(found.mono.as_deref(), Some("Foo"));
        assert_eq!(FallbackFamilies::scan([]), FallbackFamilies::default());
    }

    #[test]
    fn png_scale_must_be_positive() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4"/>"#;
        assert!(matches!(svg_to_png(svg, 0.0), Err(Error::InvalidScale(_))));
        assert!(matches!(
            svg_to_png(svg, f32::NAN),
            Err(Error::InvalidScale(_))
        ));
    }

    #[test]
    fn svg_output_is_written_verbatim() {
        let path = std::env::temp_dir().join(format!("erview-export-{}.svg", std::process::id()));
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"/>"#;
        assert_eq!(write_output(svg, &path, 1.0).unwrap(), OutputFormat::Svg);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), svg);
        let _ = std::fs::remove_file(&path);
    }
}
