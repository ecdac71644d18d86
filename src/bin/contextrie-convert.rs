//! CLI binary for contextrie-convert.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use contextrie_convert::{
    convert_pdf, convert_source, convert_to_file, ConversionConfig, ConversionOutput, ConvertError,
    EngineKind, PageSelection, PageSeparator,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert a PDF (stdout)
  contextrie-convert document.pdf

  # Born-digital PDF, skip OCR
  contextrie-convert --no-ocr document.pdf

  # Text layer only, in-process through pdfium
  contextrie-convert --engine pdfium document.pdf -o document.md

  # Plain-text book from Project Gutenberg
  contextrie-convert --text https://www.gutenberg.org/files/132/132-0.txt -o book.md

  # JSON output with the conversion method and stats
  contextrie-convert --json document.pdf > output.json

ENGINES:
  docling  The `docling` command (pip install docling). Layout, tables, OCR. (default)
  pdfium   Text layer of the PDF, in-process. Fast, no OCR; --no-ocr has no effect.

  Plain text is never handled by either engine; it always goes through the
  heading-promotion fallback (ALL-CAPS lines become `##` headings, text
  outside the *** START OF / *** END OF markers is dropped).

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH         Path to libpdfium (otherwise ./ then system paths)
  RUST_LOG                Override log filtering (e.g. contextrie_convert=debug)

EXIT STATUS:
  0  success
  1  file not found, not a .pdf file, or any other failure
"#;

/// Convert PDF documents and plain-text books to Markdown.
#[derive(Parser, Debug)]
#[command(
    name = "contextrie-convert",
    version,
    about = "Convert a PDF to markdown",
    long_about = "Convert PDF documents to Markdown through a conversion engine (pdfium or \
docling), or turn plain-text book transcriptions into Markdown by promoting ALL-CAPS lines \
to headings.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to the PDF file (or, with --text, a text file path or URL).
    input: String,

    /// Disable OCR (for born-digital PDFs).
    #[arg(long, env = "CONTEXTRIE_NO_OCR")]
    no_ocr: bool,

    /// Conversion engine.
    #[arg(long, env = "CONTEXTRIE_ENGINE", value_enum, default_value = "docling")]
    engine: EngineArg,

    /// Executable used by the docling engine.
    #[arg(long, env = "CONTEXTRIE_DOCLING", default_value = "docling")]
    docling_command: String,

    /// Treat INPUT as plain text (file path or HTTP/HTTPS URL).
    #[arg(long)]
    text: bool,

    /// Write Markdown to this file instead of stdout.
    #[arg(short, long, env = "CONTEXTRIE_OUTPUT")]
    output: Option<PathBuf>,

    /// Page selection: all, 5, 3-15, or 1,3,5,7.
    #[arg(long, env = "CONTEXTRIE_PAGES", default_value = "all")]
    pages: String,

    /// Page separator: none, hr, comment, or custom string.
    #[arg(long, env = "CONTEXTRIE_SEPARATOR", default_value = "none")]
    separator: String,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "CONTEXTRIE_PASSWORD")]
    password: Option<String>,

    /// Skip post-processing of engine output.
    #[arg(long)]
    raw: bool,

    /// Output structured JSON (ConversionOutput) instead of Markdown.
    #[arg(long, env = "CONTEXTRIE_JSON")]
    json: bool,

    /// Per-run engine timeout in seconds.
    #[arg(long, env = "CONTEXTRIE_ENGINE_TIMEOUT", default_value_t = 600)]
    engine_timeout: u64,

    /// HTTP download timeout in seconds (--text with a URL).
    #[arg(long, env = "CONTEXTRIE_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Disable the progress spinner.
    #[arg(long, env = "CONTEXTRIE_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "CONTEXTRIE_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "CONTEXTRIE_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum EngineArg {
    Pdfium,
    Docling,
}

impl From<EngineArg> for EngineKind {
    fn from(v: EngineArg) -> Self {
        match v {
            EngineArg::Pdfium => EngineKind::Pdfium,
            EngineArg::Docling => EngineKind::Docling,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner already says what is happening; keep INFO logs out of its way.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else if show_progress {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match run(&cli, show_progress).await {
        Ok(()) => Ok(()),
        Err(e) => match e.downcast_ref::<ConvertError>() {
            Some(ce) if ce.is_user_error() => {
                eprintln!("Error: {ce}");
                std::process::exit(1);
            }
            _ => Err(e),
        },
    }
}

async fn run(cli: &Cli, show_progress: bool) -> Result<()> {
    let config = build_config(cli)?;

    let spinner = show_progress.then(|| new_spinner(cli));

    let result = if cli.text {
        convert_source(&cli.input, &config).await
    } else {
        convert_pdf(&cli.input, &config).await
    };

    if let Some(ref bar) = spinner {
        bar.finish_and_clear();
    }

    let output = match result {
        Ok(output) => output,
        Err(e) if e.is_user_error() => return Err(e.into()),
        Err(e) => return Err(anyhow::Error::new(e).context("Conversion failed")),
    };

    write_output(cli, &output).await?;

    if !cli.quiet && !cli.json {
        report(cli, &output);
    }

    Ok(())
}

fn new_spinner(cli: &Cli) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
    );
    bar.set_prefix("Converting");
    bar.set_message(cli.input.clone());
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

async fn write_output(cli: &Cli, output: &ConversionOutput) -> Result<()> {
    if cli.json {
        let json = serde_json::to_string_pretty(output).context("Failed to serialise output")?;
        match cli.output {
            Some(ref path) => convert_to_file(&json, path).await?,
            None => println!("{json}"),
        }
        return Ok(());
    }

    if let Some(ref path) = cli.output {
        convert_to_file(&output.markdown, path).await?;
        return Ok(());
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(output.markdown.as_bytes())
        .and_then(|()| handle.flush())
        .context("Failed to write to stdout")?;
    Ok(())
}

/// One-line summary on stderr.
fn report(cli: &Cli, output: &ConversionOutput) {
    let marker = if output.method.is_fallback() {
        yellow("⚠")
    } else {
        green("✔")
    };
    let target = cli
        .output
        .as_ref()
        .map(|p| bold(&p.display().to_string()))
        .unwrap_or_else(|| "stdout".to_string());

    eprintln!(
        "{}  {}  {} → {} bytes  {}ms  →  {}",
        marker,
        output.method,
        output.stats.input_bytes,
        output.stats.output_bytes,
        output.stats.duration_ms,
        target,
    );
    if output.method.is_fallback() {
        eprintln!(
            "   {}",
            dim(&format!("{} headings promoted", output.stats.headings_promoted))
        );
    }
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli) -> Result<ConversionConfig> {
    let pages = parse_pages(&cli.pages)?;
    let separator = parse_separator(&cli.separator);

    let mut builder = ConversionConfig::builder()
        .ocr(!cli.no_ocr)
        .engine(cli.engine.clone().into())
        .docling_command(cli.docling_command.clone())
        .pages(pages)
        .page_separator(separator)
        .clean_output(!cli.raw)
        .engine_timeout_secs(cli.engine_timeout)
        .download_timeout_secs(cli.download_timeout);

    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.clone());
    }

    builder.build().context("Invalid configuration")
}

/// Parse `--pages` string into `PageSelection`.
fn parse_pages(s: &str) -> Result<PageSelection> {
    let s = s.trim().to_lowercase();

    if s == "all" {
        return Ok(PageSelection::All);
    }

    // Range: "3-15"
    if let Some((start, end)) = s.split_once('-') {
        let start: usize = start
            .trim()
            .parse()
            .context("Invalid start page in range")?;
        let end: usize = end.trim().parse().context("Invalid end page in range")?;

        if start < 1 {
            anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", start);
        }
        if start > end {
            anyhow::bail!(
                "Invalid page range '{}-{}': start must be <= end",
                start,
                end
            );
        }

        return Ok(PageSelection::Range(start, end));
    }

    // Set: "1,3,5,7"
    if s.contains(',') {
        let pages: Vec<usize> = s
            .split(',')
            .map(|p| {
                p.trim()
                    .parse::<usize>()
                    .with_context(|| format!("Invalid page number: '{}'", p.trim()))
            })
            .collect::<Result<Vec<_>>>()?;

        if let Some(&p) = pages.iter().find(|&&p| p < 1) {
            anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", p);
        }

        return Ok(PageSelection::Set(pages));
    }

    // Single page: "5"
    let page: usize = s.parse().context("Invalid page number")?;
    if page < 1 {
        anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", page);
    }

    Ok(PageSelection::Single(page))
}

/// Parse `--separator` string into `PageSeparator`.
fn parse_separator(s: &str) -> PageSeparator {
    match s.to_lowercase().as_str() {
        "none" => PageSeparator::None,
        "hr" | "---" => PageSeparator::HorizontalRule,
        "comment" => PageSeparator::Comment,
        _ => PageSeparator::Custom(s.to_string()),
    }
}
