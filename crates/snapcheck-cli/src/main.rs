use anyhow::Result;
use clap::Parser;
use snapcheck_cli::{OutputFormat, commands};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "snapcheck")]
#[command(author, version)]
#[command(
    about = "Verify a page renders by clicking through to it and capturing a screenshot",
    long_about = "Snapcheck launches headless Chrome, navigates to a page, clicks a link, \
                  waits for an element to appear, and writes a PNG screenshot as evidence. \
                  A failure at any step exits non-zero and writes no screenshot."
)]
struct Cli {
    /// Page to open
    #[arg(long, default_value = "http://localhost:8080/admin.php")]
    url: String,

    /// CSS selector of the link to click after the page loads
    #[arg(
        long,
        value_name = "SELECTOR",
        default_value = "a[href='admin.php?view=payment-gateways']"
    )]
    click: String,

    /// CSS selector that must appear before the screenshot is taken
    #[arg(long, value_name = "SELECTOR", default_value = "#view-payment-gateways")]
    wait_for: String,

    /// Screenshot output path (overwritten if present)
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "jules-scratch/verification/payment_gateways.png"
    )]
    output: PathBuf,

    /// Seconds to wait for the element before giving up
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    timeout: u64,

    /// Path to the Chrome binary (auto-detected when omitted)
    #[arg(long, value_name = "PATH")]
    chrome_path: Option<PathBuf>,

    /// Output format for the run report
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let url = url::Url::parse(&cli.url)
        .map_err(|e| anyhow::anyhow!("Invalid URL '{}': {}", cli.url, e))?;

    commands::verify::execute(
        url,
        &cli.click,
        &cli.wait_for,
        &cli.output,
        Duration::from_secs(cli.timeout),
        cli.chrome_path,
        cli.format,
    )
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("snapcheck=debug,snapcheck_cli=debug,snapcheck_browser=debug")
    } else {
        EnvFilter::new("snapcheck=info,snapcheck_cli=info,snapcheck_browser=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}
