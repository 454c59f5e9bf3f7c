//! CLI binary for pdf2pptx.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use pdf2pptx::{
    clean, convert_to_file, inspect, ConversionConfig, ConversionProgressCallback, PairingMode,
    ProgressCallback, DEFAULT_DPI,
};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a spinner until the slide count is known,
/// then a bar with one log line per slide.
struct CliProgressCallback {
    bar: ProgressBar,
    slide_started: Mutex<Option<Instant>>,
}

impl CliProgressCallback {
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            slide_started: Mutex::new(None),
        })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} slides  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Converting");
        self.bar.reset_eta();
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, total_slides: usize) {
        self.activate_bar(total_slides);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Converting {total_slides} slides…"))
        ));
    }

    fn on_slide_start(&self, ordinal: usize, _total: usize) {
        if let Ok(mut started) = self.slide_started.lock() {
            *started = Some(Instant::now());
        }
        self.bar.set_message(format!("slide {}", ordinal + 1));
    }

    fn on_slide_complete(&self, ordinal: usize, total: usize, notes_len: usize) {
        let elapsed_ms = self
            .slide_started
            .lock()
            .ok()
            .and_then(|mut started| started.take())
            .map(|t| t.elapsed().as_millis())
            .unwrap_or(0);

        let notes = if notes_len == 0 {
            dim("no notes")
        } else {
            format!("{notes_len} bytes of notes")
        };
        self.bar.println(format!(
            "  {} Slide {:>3}/{:<3}  {:<18}  {}",
            green("✓"),
            ordinal + 1,
            total,
            notes,
            dim(&format!("{:.1}s", elapsed_ms as f64 / 1000.0)),
        ));
        self.bar.inc(1);
    }

    fn on_conversion_complete(&self, total_slides: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} slides packaged",
            green("✔"),
            bold(&total_slides.to_string())
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Slides only, next to the input (talk.pptx)
  pdf2pptx convert -i talk.pdf

  # Beamer deck built with notes on every second page
  pdf2pptx convert -i talk.pdf -o talk.pptx --mode interleaved --dpi 300

  # Notes taken from sticky-note annotations
  pdf2pptx convert -i talk.pdf --mode annotations

  # What would each mode produce?
  pdf2pptx inspect talk.pdf

  # Remove staging files left by interrupted runs
  pdf2pptx clean ./decks

PAIRING MODES:
  none         every page is a slide (default)
  interleaved  slide, note, slide, note, … ; an odd last page gets no notes
  annotations  every page is a slide; notes come from its comment annotations

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH   pdfium shared library, or the directory holding it
  RUST_LOG          tracing filter, overrides --verbose/--quiet
"#;

/// Convert PDF slide decks to PowerPoint with speaker notes.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2pptx",
    version,
    about = "Convert PDF slide decks to PowerPoint with speaker notes",
    long_about = "Convert PDF slide decks into .pptx packages. Slide pages are rasterised \
at a chosen DPI; note pages or annotations become the presenter's speaker notes.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "PDF2PPTX_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "PDF2PPTX_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a PDF into a .pptx package.
    Convert(ConvertArgs),
    /// Remove staging files left behind by interrupted conversions.
    Clean {
        /// Directory to clean. Default: the working directory.
        dir: Option<PathBuf>,
    },
    /// Print page count, page sizes and predicted slide counts.
    Inspect {
        /// Local PDF file.
        input: PathBuf,

        /// PDF user password for encrypted documents.
        #[arg(long, env = "PDF2PPTX_PASSWORD")]
        password: Option<String>,

        /// Output JSON instead of text.
        #[arg(long, env = "PDF2PPTX_JSON")]
        json: bool,
    },
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Local PDF file.
    #[arg(short, long)]
    input: PathBuf,

    /// Destination .pptx. Default: the input path with a .pptx extension.
    #[arg(short, long, env = "PDF2PPTX_OUTPUT")]
    output: Option<PathBuf>,

    /// Rendering DPI.
    #[arg(short, long, env = "PDF2PPTX_DPI", default_value_t = DEFAULT_DPI,
          value_parser = clap::value_parser!(u32).range(1..))]
    dpi: u32,

    /// How pages pair into slides and notes.
    #[arg(short, long, env = "PDF2PPTX_MODE", value_enum, default_value = "none")]
    mode: ModeArg,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF2PPTX_PASSWORD")]
    password: Option<String>,

    /// Print conversion stats as JSON on stdout.
    #[arg(long, env = "PDF2PPTX_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF2PPTX_NO_PROGRESS")]
    no_progress: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    None,
    Interleaved,
    Annotations,
}

impl From<ModeArg> for PairingMode {
    fn from(v: ModeArg) -> Self {
        match v {
            ModeArg::None => PairingMode::NoNotes,
            ModeArg::Interleaved => PairingMode::Interleaved,
            ModeArg::Annotations => PairingMode::Annotations,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar provides all the feedback that matters; library INFO
    // logs would tear it.
    let show_progress = match &cli.command {
        Command::Convert(args) => !cli.quiet && !args.no_progress && !args.json,
        _ => false,
    };
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Convert(args) => run_convert(args, cli.quiet, show_progress).await,
        Command::Clean { dir } => run_clean(dir, cli.quiet),
        Command::Inspect {
            input,
            password,
            json,
        } => run_inspect(&input, password, json).await,
    }
}

async fn run_convert(args: ConvertArgs, quiet: bool, show_progress: bool) -> Result<()> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.input));

    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };
    let config = build_config(&args, progress_cb)?;

    let stats = convert_to_file(&args.input, &output, &config)
        .await
        .with_context(|| format!("Conversion of {} failed", args.input.display()))?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&stats).context("Failed to serialise stats")?
        );
    } else if !quiet {
        eprintln!(
            "{}  {} slides ({} with notes)  {}ms  →  {}",
            green("✔"),
            stats.slides,
            stats.slides_with_notes,
            stats.total_duration_ms,
            bold(&output.display().to_string()),
        );
        eprintln!(
            "   {} pages at {} DPI  /  {} bytes",
            dim(&stats.total_pages.to_string()),
            dim(&stats.dpi.to_string()),
            dim(&stats.package_bytes.to_string()),
        );
    }
    Ok(())
}

fn run_clean(dir: Option<PathBuf>, quiet: bool) -> Result<()> {
    let dir = dir.unwrap_or_else(|| PathBuf::from("."));
    let removed =
        clean(&dir).with_context(|| format!("Failed to clean {}", dir.display()))?;
    if !quiet {
        for path in &removed {
            eprintln!("  {} {}", dim("removed"), path.display());
        }
        eprintln!(
            "{} {} staging file(s) removed from {}",
            green("✔"),
            bold(&removed.len().to_string()),
            dir.display()
        );
    }
    Ok(())
}

async fn run_inspect(input: &Path, password: Option<String>, json: bool) -> Result<()> {
    let info = inspect(input, password)
        .await
        .context("Failed to inspect PDF")?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&info).context("Failed to serialize document info")?
        );
        return Ok(());
    }

    println!("File:         {}", input.display());
    if let Some(ref t) = info.title {
        println!("Title:        {}", t);
    }
    println!("Pages:        {}", info.page_count);
    if let Some(size) = info.first_page {
        println!(
            "Page size:    {:.1} x {:.1} pt ({:.2} x {:.2} in)",
            size.width_pt,
            size.height_pt,
            size.width_pt / 72.0,
            size.height_pt / 72.0
        );
    }
    if info.mixed_page_sizes {
        println!("              (page sizes vary; later pages are centered on the first page's canvas)");
    }
    for predicted in &info.predicted_slides {
        let label = format!("{} mode:", predicted.mode);
        println!("{label:<14}{} slides", predicted.slides);
    }
    Ok(())
}

/// `talk.pdf` → `talk.pptx` in the same directory.
fn default_output(input: &Path) -> PathBuf {
    input.with_extension("pptx")
}

/// Map CLI args to `ConversionConfig`.
fn build_config(args: &ConvertArgs, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .dpi(args.dpi)
        .pairing(args.mode.into());

    if let Some(ref pwd) = args.password {
        builder = builder.password(pwd);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
