//! Async facade over the synchronous browser adapter.
//!
//! A dedicated worker thread owns the `BannerBrowser` and executes
//! commands sent from async tasks, so the capture flow can await each
//! step without the adapter having to be `Send`.

use crate::browser::{BannerBrowser, PageMetrics};
use crate::{CaptureConfig, Error, Result};
use std::sync::mpsc::{self, Sender};
use std::thread;
use tokio::sync::oneshot;

enum Command {
    Goto(String, oneshot::Sender<Result<()>>),
    WaitForFonts(oneshot::Sender<Result<()>>),
    MeasureRoot(oneshot::Sender<Result<PageMetrics>>),
    Capture(oneshot::Sender<Result<Vec<u8>>>),
    Close(oneshot::Sender<Result<()>>),
}

/// A handle to a browser running on its worker thread.
///
/// Dropping the last handle without `close` still ends the worker loop,
/// which drops the browser and kills the child process.
#[derive(Clone)]
pub struct Session {
    cmd_tx: Sender<Command>,
}

impl Session {
    /// Launch the browser on a background thread and wait for it to be
    /// ready.
    pub async fn launch(config: CaptureConfig) -> Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
        let (init_tx, init_rx): (oneshot::Sender<Result<()>>, oneshot::Receiver<Result<()>>) =
            oneshot::channel();

        thread::spawn(move || {
            let browser = match BannerBrowser::launch(config) {
                Ok(b) => b,
                Err(err) => {
                    let _ = init_tx.send(Err(err));
                    return;
                }
            };

            let _ = init_tx.send(Ok(()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    Command::Goto(url, resp) => {
                        let _ = resp.send(browser.goto(&url));
                    }
                    Command::WaitForFonts(resp) => {
                        let _ = resp.send(browser.wait_for_fonts());
                    }
                    Command::MeasureRoot(resp) => {
                        let _ = resp.send(browser.measure_root());
                    }
                    Command::Capture(resp) => {
                        let _ = resp.send(browser.capture_banner());
                    }
                    Command::Close(resp) => {
                        let _ = resp.send(browser.close());
                        break;
                    }
                }
            }
        });

        init_rx
            .await
            .map_err(|e| Error::Other(format!("Worker init canceled: {}", e)))??;

        Ok(Self { cmd_tx })
    }

    /// Navigate the tab and wait for load completion and network settle.
    pub async fn goto(&self, url: &str) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Goto(url.to_string(), tx));
        rx.await
            .map_err(|e| Error::Other(format!("Goto canceled: {}", e)))?
    }

    /// Wait for `document.fonts.ready`.
    pub async fn wait_for_fonts(&self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::WaitForFonts(tx));
        rx.await
            .map_err(|e| Error::Other(format!("Font wait canceled: {}", e)))?
    }

    /// Measure the root element's bounding box.
    pub async fn measure_root(&self) -> Result<PageMetrics> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::MeasureRoot(tx));
        rx.await
            .map_err(|e| Error::Other(format!("Measure canceled: {}", e)))?
    }

    /// Capture the banner rectangle as PNG bytes.
    pub async fn capture(&self) -> Result<Vec<u8>> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Capture(tx));
        rx.await
            .map_err(|e| Error::Other(format!("Capture canceled: {}", e)))?
    }

    /// Shut the worker down and close the browser.
    pub async fn close(self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Close(tx));
        rx.await
            .map_err(|e| Error::Other(format!("Close canceled: {}", e)))?
    }
}
