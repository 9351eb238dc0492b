use crate::{Error, Result};
use chromiumoxide::Page;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Knobs for a browser session
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub window_width: u32,
    pub window_height: u32,
    /// Chrome binary override; chromiumoxide auto-detects when None
    pub chrome_path: Option<PathBuf>,
    /// Deadline for wait_for_selector
    pub wait_timeout: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            chrome_path: None,
            wait_timeout: Duration::from_secs(30),
        }
    }
}

/// A live headless Chrome instance holding a single page
///
/// The session owns the browser process, the CDP handler task, and one tab.
/// Every page operation goes through a live session, so creation-before-use
/// ordering holds by construction. Abnormal termination relies on
/// chromiumoxide's own child-process cleanup.
pub struct BrowserSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    wait_timeout: Duration,
}

impl BrowserSession {
    /// Launch headless Chrome and open a blank page
    pub async fn launch(options: SessionOptions) -> Result<Self> {
        tracing::info!("Launching headless Chrome...");

        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .window_size(options.window_width, options.window_height);

        if let Some(path) = &options.chrome_path {
            builder = builder.chrome_executable(path);
        }

        let config = builder.build().map_err(Error::Browser)?;

        let (browser, mut handler) = Browser::launch(config).await?;

        // The handler task must run for any page command to complete
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("CDP handler event error (continuing): {}", e);
                }
            }
        });

        let page = browser.new_page("about:blank").await?;

        tracing::info!("Headless Chrome ready");

        Ok(Self {
            browser,
            page,
            handler_task,
            wait_timeout: options.wait_timeout,
        })
    }

    /// Navigate the page and wait for the load to settle
    pub async fn goto(&self, url: &str) -> Result<()> {
        tracing::info!("Navigating to {}", url);

        self.page.goto(url).await.map_err(|e| Error::Navigation {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        self.page
            .wait_for_navigation()
            .await
            .map_err(|e| Error::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        Ok(())
    }

    /// Click the first element matching a CSS selector
    ///
    /// Fails with [`Error::Selector`] when nothing matches.
    pub async fn click(&self, selector: &str) -> Result<()> {
        tracing::info!("Clicking '{}'", selector);

        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| Error::Selector(selector.to_string()))?;

        element.click().await?;

        Ok(())
    }

    /// Poll until an element matching the selector is present in the page
    pub async fn wait_for_selector(&self, selector: &str) -> Result<()> {
        tracing::info!("Waiting for '{}'", selector);

        let start = Instant::now();

        loop {
            if self.page.find_element(selector).await.is_ok() {
                tracing::debug!("'{}' appeared after {:?}", selector, start.elapsed());
                return Ok(());
            }

            if start.elapsed() >= self.wait_timeout {
                return Err(Error::WaitTimeout {
                    selector: selector.to_string(),
                    timeout_ms: self.wait_timeout.as_millis() as u64,
                });
            }

            tokio::time::sleep(WAIT_POLL_INTERVAL).await;
        }
    }

    /// Capture a viewport PNG and write it to `path`, overwriting any
    /// existing file. Returns the screenshot size in bytes.
    pub async fn save_screenshot(&self, path: &Path) -> Result<u64> {
        tracing::info!("Writing screenshot to {}", path.display());

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let bytes = self
            .page
            .save_screenshot(
                ScreenshotParams::builder()
                    .format(CaptureScreenshotFormat::Png)
                    .full_page(false)
                    .build(),
                path,
            )
            .await
            .map_err(|e| Error::Screenshot(e.to_string()))?;

        Ok(bytes.len() as u64)
    }

    /// Shut down Chrome and stop the CDP handler task
    pub async fn close(mut self) -> Result<()> {
        tracing::info!("Closing browser");

        self.browser.close().await?;
        let _ = self.browser.wait().await;
        self.handler_task.abort();

        Ok(())
    }
}
