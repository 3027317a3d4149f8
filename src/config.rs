//! Run configuration and the banner dimension constants.
//!
//! The constants mirror the site's Open Graph banner contract: the page is
//! rendered at `SCALE_FACTOR` times the target size and the top-left
//! `WIDTH`x`HEIGHT` rectangle is what lands in the output file.

use std::path::PathBuf;

/// Target banner width in pixels
pub const WIDTH: u32 = 1200;

/// Target banner height in pixels
pub const HEIGHT: u32 = 630;

/// Pixel-density factor applied to the browser viewport
pub const SCALE_FACTOR: u32 = 2;

/// Desktop user agent sent by the rendering tab
pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_6) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/85.0.4183.121 Safari/537.36";

/// Default output path, relative to the working directory
pub const OUTPUT_PATH: &str = "image.png";

/// Default directory served as the site root
pub const SITE_ROOT: &str = "site";

/// Viewport dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// The viewport multiplied by a pixel-density factor
    pub fn scaled(&self, factor: u32) -> Viewport {
        Viewport {
            width: self.width * factor,
            height: self.height * factor,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
        }
    }
}

/// Configuration for a single capture run
///
/// The defaults reproduce the production banner run exactly: serve `site/`
/// on an ephemeral port, render at 2400x1260, crop 1200x630, write
/// `image.png`.
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// User agent string the tab identifies as
    pub user_agent: String,
    /// Target capture dimensions (unscaled)
    pub viewport: Viewport,
    /// Pixel-density factor for the rendering viewport
    pub scale_factor: u32,
    /// Upper bound for page load and settle, in milliseconds
    pub timeout_ms: u64,
    /// Post-navigation settle delay, in milliseconds
    pub settle_ms: u64,
    /// Directory served as the site root
    pub site_root: PathBuf,
    /// Server port; 0 picks an ephemeral port
    pub port: u16,
    /// Where the PNG is written (overwritten if present)
    pub output: PathBuf,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            user_agent: USER_AGENT.to_string(),
            viewport: Viewport::default(),
            scale_factor: SCALE_FACTOR,
            timeout_ms: 30000,
            settle_ms: 500,
            site_root: PathBuf::from(SITE_ROOT),
            port: 0,
            output: PathBuf::from(OUTPUT_PATH),
        }
    }
}

impl CaptureConfig {
    /// The viewport the browser actually renders at
    pub fn render_viewport(&self) -> Viewport {
        self.viewport.scaled(self.scale_factor)
    }
}
