//! The capture run: serve, render, crop, write, tear down.

use crate::server::DevServer;
use crate::session::Session;
use crate::{CaptureConfig, Result};
use log::info;
use std::path::PathBuf;

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct CaptureReport {
    /// Measured bounding box of the page root, CSS pixels
    pub page_width: f64,
    /// Measured bounding box of the page root, CSS pixels
    pub page_height: f64,
    /// Dimensions of the written image
    pub image_width: u32,
    /// Dimensions of the written image
    pub image_height: u32,
    /// Where the PNG landed
    pub output: PathBuf,
    /// PNG size in bytes
    pub bytes_written: usize,
}

/// Run the whole pipeline once.
///
/// The server and the browser session are released on every exit path:
/// the session is closed before a step error propagates, and both carry
/// drop glue for the paths that never reach the explicit teardown.
pub async fn run(config: &CaptureConfig) -> Result<CaptureReport> {
    let server = DevServer::start(&config.site_root, config.port)?;
    info!("serving {} at {}", server.root().display(), server.base_url());

    let outcome = capture_page(config, server.base_url().as_str()).await;
    server.shutdown();
    outcome
}

async fn capture_page(config: &CaptureConfig, url: &str) -> Result<CaptureReport> {
    let session = Session::launch(config.clone()).await?;

    let steps = async {
        session.goto(url).await?;
        session.wait_for_fonts().await?;

        let metrics = session.measure_root().await?;
        info!(
            "page bounding box: {} x {}",
            metrics.width, metrics.height
        );

        let png = session.capture().await?;
        std::fs::write(&config.output, &png)?;

        Ok(CaptureReport {
            page_width: metrics.width,
            page_height: metrics.height,
            image_width: config.viewport.width,
            image_height: config.viewport.height,
            output: config.output.clone(),
            bytes_written: png.len(),
        })
    };

    let result: Result<CaptureReport> = steps.await;
    let closed = session.close().await;

    let report = result?;
    closed?;
    Ok(report)
}
