use crate::OutputFormat;
use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use snapcheck_browser::{BrowserSession, ChromeFinder, SessionOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use url::Url;

/// Evidence record for one verification run
#[derive(Debug, Serialize)]
pub struct VerifyReport {
    pub url: String,
    pub clicked: String,
    pub awaited: String,
    pub screenshot: PathBuf,
    pub screenshot_bytes: u64,
    pub elapsed_ms: u64,
    pub completed_at: String,
}

pub fn execute(
    url: Url,
    click: &str,
    wait_for: &str,
    output: &Path,
    timeout: Duration,
    chrome_path: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    // Create tokio runtime for async operations
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let result = runtime.block_on(async {
        let start = Instant::now();

        // Step 1: Find Chrome before paying the launch cost
        let finder = ChromeFinder::new(chrome_path);
        let chrome_binary = finder.find()?;
        tracing::debug!("Using Chrome at {}", chrome_binary.display());

        // Step 2: Launch headless Chrome with a fresh page
        let session = BrowserSession::launch(SessionOptions {
            chrome_path: Some(chrome_binary),
            wait_timeout: timeout,
            ..SessionOptions::default()
        })
        .await?;

        // Steps 3-6: the fixed interaction path, strictly in order
        session.goto(url.as_str()).await?;
        session.click(click).await?;
        session.wait_for_selector(wait_for).await?;
        let screenshot_bytes = session.save_screenshot(output).await?;

        // Step 7: Release the browser
        session.close().await?;

        Ok::<_, anyhow::Error>(VerifyReport {
            url: url.to_string(),
            clicked: click.to_string(),
            awaited: wait_for.to_string(),
            screenshot: output.to_path_buf(),
            screenshot_bytes,
            elapsed_ms: start.elapsed().as_millis() as u64,
            completed_at: Utc::now().to_rfc3339(),
        })
    });

    // Explicitly shutdown runtime with timeout to prevent hanging on blocking tasks
    runtime.shutdown_timeout(Duration::from_millis(100));

    let report = result?;
    print_report(&report, format)?;

    Ok(())
}

fn print_report(report: &VerifyReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Pretty => {
            println!("✅ {} rendered at {}", report.awaited, report.url);
            println!("   Clicked: {}", report.clicked);
            println!(
                "   Screenshot: {} ({} bytes)",
                report.screenshot.display(),
                report.screenshot_bytes
            );
            println!("   Completed in {}ms", report.elapsed_ms);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> VerifyReport {
        VerifyReport {
            url: "http://localhost:8080/admin.php".to_string(),
            clicked: "a[href='admin.php?view=payment-gateways']".to_string(),
            awaited: "#view-payment-gateways".to_string(),
            screenshot: PathBuf::from("jules-scratch/verification/payment_gateways.png"),
            screenshot_bytes: 48_213,
            elapsed_ms: 1_730,
            completed_at: "2026-08-24T12:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn report_serializes_expected_fields() {
        let json = serde_json::to_value(sample_report()).unwrap();

        assert_eq!(json["url"], "http://localhost:8080/admin.php");
        assert_eq!(json["awaited"], "#view-payment-gateways");
        assert_eq!(json["screenshot_bytes"], 48_213);
        assert_eq!(
            json["screenshot"],
            "jules-scratch/verification/payment_gateways.png"
        );
        assert!(json["completed_at"].is_string());
    }

    #[test]
    fn pretty_print_does_not_fail() {
        print_report(&sample_report(), OutputFormat::Pretty).unwrap();
        print_report(&sample_report(), OutputFormat::Json).unwrap();
    }
}
