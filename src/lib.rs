//! Banner image generator
//!
//! Boots a local dev server over the site root, renders the page in
//! headless Chrome with print-media emulation, and writes the top-left
//! WIDTHxHEIGHT crop as a transparent PNG. Also carries the typed models
//! of the two CSS build configuration documents the site's external CSS
//! toolchain consumes.
//!
//! # Example
//!
//! ```no_run
//! use bannergen::{capture, CaptureConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CaptureConfig::default();
//! let report = capture::run(&config).await?;
//! println!("wrote {} ({} bytes)", report.output.display(), report.bytes_written);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod config;
pub use config::{CaptureConfig, Viewport};

pub mod browser;
pub mod capture;
pub mod cssbuild;
pub mod server;
pub mod session;

pub use capture::CaptureReport;
pub use server::DevServer;
pub use session::Session;
