//! CLI binary for edgequake-cardgen.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `GeneratorConfig` and prints the batch report.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_cardgen::{
    generate, BatchProgressCallback, BatchReport, ErrorCorrection, GeneratorConfig,
    ProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
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

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar for the batch plus a log line per card.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    /// Create a callback whose bar length is set by `on_batch_start`.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Scanning input…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }

    /// Switch to the full progress-bar style once we know `total`.
    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} cards  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Generating");
    }

    /// Stop the spinner when the batch never ran to completion.
    fn abandon(&self) {
        self.bar.finish_and_clear();
    }
}

impl BatchProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total: usize) {
        self.activate_bar(total);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Generating {total} contact card(s)…"))
        ));
    }

    fn on_card_start(&self, _index: usize, _total: usize, input: &str) {
        self.bar.set_message(input.to_string());
    }

    fn on_card_complete(&self, index: usize, total: usize, output: &str) {
        self.bar.println(format!(
            "  {} Card {:>3}/{:<3}  {}",
            green("✓"),
            index,
            total,
            dim(output),
        ));
        self.bar.inc(1);
    }

    fn on_card_error(&self, index: usize, total: usize, input: &str, error: &str) {
        self.bar.println(format!(
            "  {} Card {:>3}/{:<3}  {}  {}",
            red("✗"),
            index,
            total,
            bold(input),
            red(error),
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total: usize, success_count: usize) {
        self.bar.finish_and_clear();
        let failed = total.saturating_sub(success_count);
        if failed == 0 {
            eprintln!(
                "{} {} card(s) generated",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} card(s) generated  ({} failed)",
                if success_count == 0 { red("✘") } else { cyan("⚠") },
                bold(&success_count.to_string()),
                total,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Generate cards from ./input into ./output
  cardgen

  # Other directories
  cardgen --input cards --output site

  # Higher error correction, bigger QR code
  cardgen --ecc high --qr-size 320

  # Replace documents from an earlier run instead of suffixing
  cardgen --overwrite

  # Machine-readable report
  cardgen --json > report.json

RECORD FORMAT (one JSON object per file):
  {
    "name": "Jane Doe",                      required
    "title": "Engineer",                     optional
    "company": "Acme",                       optional
    "email": "jane@example.com",             optional
    "phone": "+1 555 0100",                  optional
    "website": "https://jane.dev",           optional
    "linkedin": "https://linkedin.com/in/jane",
    "github": "https://github.com/jane",
    "twitter": "https://twitter.com/jane"
  }

TEMPLATE SLOTS (for --template):
  {{name}} {{title}} {{company}} {{email}} {{phone}} {{website}}
  {{linkedin}} {{github}} {{twitter}} {{headline}} {{contact_links}} {{qr_code}}
"#;

/// Generate HTML contact cards with embedded vCard QR codes.
#[derive(Parser, Debug)]
#[command(
    name = "cardgen",
    version,
    about = "Generate HTML contact cards with embedded vCard QR codes",
    long_about = "Read one JSON contact record per file from the input directory and write a \
self-contained HTML card for each, with a QR code that saves the contact as a vCard.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Directory holding *.json contact records.
    #[arg(short, long, env = "CARDGEN_INPUT", default_value = "input")]
    input: PathBuf,

    /// Directory receiving the generated *.html cards.
    #[arg(short, long, env = "CARDGEN_OUTPUT", default_value = "output")]
    output: PathBuf,

    /// Custom HTML template using {{slot}} markers.
    #[arg(long, env = "CARDGEN_TEMPLATE")]
    template: Option<PathBuf>,

    /// QR error-correction level.
    #[arg(long, env = "CARDGEN_ECC", value_enum, default_value = "medium")]
    ecc: EccArg,

    /// Minimum QR image edge in pixels (64–2048).
    #[arg(long, env = "CARDGEN_QR_SIZE", default_value_t = 200,
          value_parser = clap::value_parser!(u32).range(64..=2048))]
    qr_size: u32,

    /// Overwrite existing cards instead of adding a numeric suffix.
    #[arg(long, env = "CARDGEN_OVERWRITE")]
    overwrite: bool,

    /// Print the batch report as JSON on stdout.
    #[arg(long, env = "CARDGEN_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "CARDGEN_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "CARDGEN_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "CARDGEN_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum EccArg {
    Low,
    Medium,
    Quartile,
    High,
}

impl From<EccArg> for ErrorCorrection {
    fn from(v: EccArg) -> Self {
        match v {
            EccArg::Low => ErrorCorrection::Low,
            EccArg::Medium => ErrorCorrection::Medium,
            EccArg::Quartile => ErrorCorrection::Quartile,
            EccArg::High => ErrorCorrection::High,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar already reports every card; keep INFO logs out of it.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
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

    // ── Run batch ────────────────────────────────────────────────────────
    let progress = show_progress.then(CliProgressCallback::new_dynamic);
    let (config, report) = run(&cli, progress)?;

    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialise report")?;
        println!("{json}");
    } else if !cli.quiet {
        print_summary(&report, &config, show_progress);
    }

    Ok(())
}

/// Build the config and run the batch, clearing the spinner on a fatal error.
fn run(
    cli: &Cli,
    progress: Option<Arc<CliProgressCallback>>,
) -> Result<(GeneratorConfig, BatchReport)> {
    let progress_cb = progress
        .clone()
        .map(|cb| cb as Arc<dyn BatchProgressCallback>);

    let outcome = build_config(cli, progress_cb).and_then(|config| {
        let report = generate(&config).context("Card generation failed")?;
        Ok((config, report))
    });

    if outcome.is_err() {
        if let Some(ref cb) = progress {
            cb.abandon();
        }
    }
    outcome
}

/// Map CLI args to `GeneratorConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<GeneratorConfig> {
    let mut builder = GeneratorConfig::builder()
        .input_dir(&cli.input)
        .output_dir(&cli.output)
        .ecc(cli.ecc.into())
        .qr_target_px(cli.qr_size)
        .overwrite(cli.overwrite);

    if let Some(ref template) = cli.template {
        builder = builder.template_path(template);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Print per-card failures (unless the bar already did) and a summary line.
fn print_summary(report: &BatchReport, config: &GeneratorConfig, show_progress: bool) {
    if !show_progress {
        for card in report.failures() {
            if let Some(ref e) = card.error {
                eprintln!("{} {}: {}", red("✗"), bold(&card.input_id()), e);
            }
        }
    }

    let stats = &report.stats;
    eprintln!(
        "{}  {}/{} cards  {}ms  →  {}",
        if stats.failed == 0 { green("✔") } else { cyan("⚠") },
        stats.generated,
        stats.total_inputs,
        stats.duration_ms,
        bold(&config.output_dir.display().to_string()),
    );
}
