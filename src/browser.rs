//! Chrome DevTools Protocol adapter for the banner tab.
//!
//! Launches headless Chrome sized to the scaled render viewport and walks
//! a single tab through the capture sequence: navigate, settle, wait for
//! fonts, measure, screenshot.

use crate::{CaptureConfig, Error, Result};
use headless_chrome::browser::tab::Tab;
use headless_chrome::protocol::cdp::{Emulation, Page, DOM};
use headless_chrome::{Browser, LaunchOptions};
use log::debug;
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Bounding box of the page's root element, in CSS pixels.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageMetrics {
    pub width: f64,
    pub height: f64,
}

/// A headless Chrome instance driving one tab.
pub struct BannerBrowser {
    browser: Browser,
    tab: Arc<Tab>,
    config: CaptureConfig,
}

impl BannerBrowser {
    /// Launch the browser and prepare the tab: scaled viewport, desktop
    /// user agent, print-media emulation, JavaScript enabled.
    pub fn launch(config: CaptureConfig) -> Result<Self> {
        let render = config.render_viewport();

        let launch_options = LaunchOptions::default_builder()
            .headless(true)
            .window_size(Some((render.width, render.height)))
            .build()
            .map_err(|e| {
                Error::InitializationError(format!("Failed to build launch options: {}", e))
            })?;

        let browser = Browser::new(launch_options)
            .map_err(|e| Error::InitializationError(format!("Failed to launch browser: {}", e)))?;

        let tab = browser
            .new_tab()
            .map_err(|e| Error::InitializationError(format!("Failed to create tab: {}", e)))?;

        tab.set_default_timeout(Duration::from_millis(config.timeout_ms));

        tab.set_user_agent(&config.user_agent, None, None)
            .map_err(|e| Error::InitializationError(format!("Failed to set user agent: {}", e)))?;

        // Print-scoped CSS is what the banner layout targets
        tab.call_method(Emulation::SetEmulatedMedia {
            media: Some("print".to_string()),
            features: None,
        })
        .map_err(|e| {
            Error::InitializationError(format!("Failed to emulate print media: {}", e))
        })?;

        debug!(
            "launched browser at {}x{} for a {}x{} crop",
            render.width, render.height, config.viewport.width, config.viewport.height
        );

        Ok(Self {
            browser,
            tab,
            config,
        })
    }

    /// Navigate to `url` and wait for the page to finish loading and the
    /// network to settle, bounded by the configured timeout.
    pub fn goto(&self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .map_err(|e| Error::LoadError(format!("Navigation failed: {}", e)))?;

        self.tab
            .wait_until_navigated()
            .map_err(|e| Error::LoadError(format!("Wait for navigation failed: {}", e)))?;

        let deadline = Instant::now() + Duration::from_millis(self.config.timeout_ms);
        loop {
            let ready = self
                .tab
                .evaluate("document.readyState", false)
                .map_err(|e| Error::LoadError(format!("readyState check failed: {}", e)))?;
            match ready.value {
                Some(v) if v.as_str() == Some("complete") => break,
                _ => {}
            }
            if Instant::now() >= deadline {
                return Err(Error::Timeout(self.config.timeout_ms));
            }
            std::thread::sleep(Duration::from_millis(50));
        }

        // Let late asset requests drain before measuring
        std::thread::sleep(Duration::from_millis(self.config.settle_ms));
        Ok(())
    }

    /// Block until every declared font face has finished loading, so the
    /// capture never shows fallback glyphs.
    pub fn wait_for_fonts(&self) -> Result<()> {
        let result = self
            .tab
            .evaluate("document.fonts.ready.then(() => document.fonts.status)", true)
            .map_err(|e| Error::LoadError(format!("Font readiness wait failed: {}", e)))?;
        debug!("fonts ready: {:?}", result.value);
        Ok(())
    }

    /// Measure the root element's bounding box. Fails when the document
    /// has no measurable root.
    pub fn measure_root(&self) -> Result<PageMetrics> {
        let eval = self
            .tab
            .evaluate(
                r#"
                (function() {
                    const root = document.documentElement;
                    if (!root) return null;
                    const rect = root.getBoundingClientRect();
                    return JSON.stringify({ width: rect.width, height: rect.height });
                })()
                "#,
                false,
            )
            .map_err(|e| Error::CaptureError(format!("Bounding box evaluation failed: {}", e)))?;

        let raw = match eval.value {
            Some(v) if v.is_string() => v.as_str().unwrap_or_default().to_string(),
            _ => {
                return Err(Error::CaptureError(
                    "document has no measurable root element".into(),
                ))
            }
        };

        serde_json::from_str(&raw)
            .map_err(|e| Error::CaptureError(format!("Bounding box payload invalid: {}", e)))
    }

    /// Capture the top-left target rectangle as a PNG with the default
    /// white canvas background suppressed.
    pub fn capture_banner(&self) -> Result<Vec<u8>> {
        self.tab
            .call_method(Emulation::SetDefaultBackgroundColorOverride {
                color: Some(DOM::RGBA {
                    r: 0,
                    g: 0,
                    b: 0,
                    a: Some(0.0),
                }),
            })
            .map_err(|e| {
                Error::CaptureError(format!("Failed to clear canvas background: {}", e))
            })?;

        let clip = Page::Viewport {
            x: 0.0,
            y: 0.0,
            width: self.config.viewport.width as f64,
            height: self.config.viewport.height as f64,
            scale: 1.0,
        };

        let data = self
            .tab
            .capture_screenshot(
                Page::CaptureScreenshotFormatOption::Png,
                None,
                Some(clip),
                true,
            )
            .map_err(|e| Error::CaptureError(format!("Screenshot failed: {}", e)))?;

        Ok(data)
    }

    /// Close the tab and terminate the browser process.
    pub fn close(self) -> Result<()> {
        // Dropping the handles tears the child process down promptly
        drop(self.tab);
        drop(self.browser);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_launch() {
        // Requires Chrome; skip in CI and when launch fails locally
        if std::env::var("CI").is_ok() {
            return;
        }
        let config = CaptureConfig::default();
        match BannerBrowser::launch(config) {
            Ok(browser) => browser.close().unwrap(),
            Err(e) => eprintln!("Skipping browser launch test, Chrome unavailable: {}", e),
        }
    }
}
