use bannergen::{capture, config, CaptureConfig};
use clap::Parser;
use log::{error, LevelFilter};
use std::path::PathBuf;

/// Render the site's banner page and write the cropped PNG.
#[derive(Parser, Debug)]
#[command(name = "bannergen", version, about)]
struct Args {
    /// Directory served as the site root
    #[arg(long, default_value = config::SITE_ROOT)]
    site_root: PathBuf,

    /// Where the PNG is written
    #[arg(long, default_value = config::OUTPUT_PATH)]
    output: PathBuf,

    /// Server port; 0 picks an ephemeral port
    #[arg(long, default_value_t = 0)]
    port: u16,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    let args = Args::parse();

    if simple_logger::SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .env()
        .init()
        .is_err()
    {
        eprintln!("bannergen: failed to initialize logging");
    }

    let config = CaptureConfig {
        site_root: args.site_root,
        output: args.output,
        port: args.port,
        ..Default::default()
    };

    if let Err(e) = capture::run(&config).await {
        error!("{}", e);
        std::process::exit(1);
    }
}
