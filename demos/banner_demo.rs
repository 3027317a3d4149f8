//! Basic example demonstrating a banner capture run

use bannergen::{capture, CaptureConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("bannergen - capture example\n");

    let config = CaptureConfig::default();

    println!("Running with config:");
    println!("  Site root: {}", config.site_root.display());
    println!(
        "  Crop: {}x{} (viewport {}x{})",
        config.viewport.width,
        config.viewport.height,
        config.render_viewport().width,
        config.render_viewport().height
    );
    println!("  Output: {}\n", config.output.display());

    let report = capture::run(&config).await?;

    println!(
        "Page bounding box: {} x {}",
        report.page_width, report.page_height
    );
    println!(
        "Wrote {} ({}x{}, {} bytes)",
        report.output.display(),
        report.image_width,
        report.image_height,
        report.bytes_written
    );

    Ok(())
}
