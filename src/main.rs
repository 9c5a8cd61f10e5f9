use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use erview::diagram::{DiagramStyle, RenderedDiagram, render_diagram};
use erview::error::Error;
use erview::export::write_output;
use erview::fonts::{ApproximateMeasure, CosmicTextMeasure};
use erview::svg;
use erview::theme::Theme;

/// Render ER diagram models with CHEN or BACH cardinality notation
#[derive(Parser, Debug)]
#[command(name = "erview")]
#[command(version)]
#[command(about = "Render ER diagram models to SVG, PNG or PDF", long_about = None)]
struct Args {
    /// Input diagram model in JSON (use "-" for stdin)
    #[arg(value_name = "INPUT", required_unless_present = "completions")]
    input: Option<PathBuf>,

    /// Output file path (extension determines format: .svg, .png or .pdf)
    #[arg(short, long, value_name = "OUTPUT", required_unless_present = "completions")]
    output: Option<PathBuf>,

    /// Path to Alacritty theme file (YAML or TOML)
    #[arg(short, long, value_name = "THEME", conflicts_with = "builtin_theme")]
    theme: Option<PathBuf>,

    /// Name of a built-in theme (dracula, github_dark, github_light, nord, solarized_light)
    #[arg(long, value_name = "NAME")]
    builtin_theme: Option<String>,

    /// Raster scale multiplier for PNG output
    #[arg(long, default_value_t = 1.0)]
    png_scale: f32,

    /// Padding around the diagram in pixels
    #[arg(long, default_value_t = 20.0)]
    padding: f32,

    /// Estimate label sizes instead of shaping text with system fonts
    #[arg(long)]
    approximate_text: bool,

    /// Print a shell completion script and exit
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,

    /// Log decoration decisions to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), String> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Some(shell) = args.completions {
        let mut cmd = Args::command();
        clap_complete::generate(shell, &mut cmd, "erview", &mut std::io::stdout());
        return Ok(());
    }

    run(&args).map_err(|e| e.to_string())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "erview=debug" } else { "erview=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: &Args) -> Result<(), Error> {
    let (Some(input), Some(output)) = (&args.input, &args.output) else {
        // clap enforces both unless --completions was given
        return Ok(());
    };

    let theme = load_theme(args)?;
    let style = DiagramStyle::from_theme(&theme);
    let source = read_input(input)?;

    let rendered: RenderedDiagram = if args.approximate_text {
        render_diagram(&source, &style, ApproximateMeasure)?
    } else {
        render_diagram(&source, &style, CosmicTextMeasure::new())?
    };
    debug!(bounds = ?rendered.bounds, "diagram rendered");

    let document = svg::document(&rendered.svg, &rendered.bounds, args.padding, &style.background);
    let format = write_output(&document, output, args.png_scale)?;
    info!(format = format.name(), "done");
    eprintln!("{} saved to: {}", format.name(), output.display());
    Ok(())
}

fn load_theme(args: &Args) -> Result<Theme, Error> {
    match (&args.theme, &args.builtin_theme) {
        (Some(path), _) => Theme::from_file(path),
        (None, Some(name)) => Theme::from_builtin(name),
        (None, None) => Ok(Theme::default()),
    }
}

fn read_input(input: &Path) -> Result<String, Error> {
    if input.to_str() == Some("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(Error::Stdin)?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(input).map_err(|source| Error::Read {
            path: input.to_path_buf(),
            source,
        })
    }
}
