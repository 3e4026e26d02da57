//! mohead - JY901 orientation daemon
//!
//! ## Modes
//!
//! - **Service (default)**: decode the serial stream and serve NDJSON
//!   orientation updates to every TCP consumer on the bind address.
//! - **Setup (`--setup`)**: run the reset/calibrate/save script and exit.

use clap::Parser;
use mohead::config::AppConfig;
use mohead::protocol::FrameDecoder;
use mohead::streaming::NdjsonServer;
use mohead::transport::SerialTransport;
use mohead::{Result, ShutdownToken, StateStore, calibration, ingest};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

/// JY901 IMU orientation decoder and NDJSON broadcaster
#[derive(Parser, Debug)]
#[command(name = "mohead")]
#[command(version)]
struct Args {
    /// TOML configuration file (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Serial device file to open
    #[arg(long)]
    device: Option<String>,

    /// Baud rate of the serial device
    #[arg(long)]
    baud: Option<u32>,

    /// Bind address of the NDJSON service
    #[arg(long)]
    bind: Option<String>,

    /// Run the calibration script instead of the service
    #[arg(long)]
    setup: bool,
}

impl Args {
    fn load_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };

        if let Some(device) = &self.device {
            config.serial.device = device.clone();
        }
        if let Some(baud) = self.baud {
            config.serial.baud = baud;
        }
        if let Some(bind) = &self.bind {
            config.server.bind = bind.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    let loaded = args.load_config();

    // RUST_LOG overrides the configured level
    let level = match &loaded {
        Ok(config) => config.logging.level.as_str(),
        Err(_) => "info",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = loaded.and_then(|config| run(&args, &config));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args, config: &AppConfig) -> Result<()> {
    log::info!(
        "mohead v{} starting (device={}, baud={}, bind={}, setup={})",
        env!("CARGO_PKG_VERSION"),
        config.serial.device,
        config.serial.baud,
        config.server.bind,
        args.setup
    );

    let mut port = SerialTransport::open(&config.serial.device, config.serial.baud)?;

    if args.setup {
        return calibration::run(&mut port, &config.calibration);
    }

    let shutdown = ShutdownToken::install_ctrl_c()?;
    let port = port.with_shutdown(shutdown.clone());
    let store = Arc::new(StateStore::new());

    let server = NdjsonServer::bind(&config.server.bind, Arc::clone(&store), shutdown.clone())?;
    let accept_handle = server.spawn()?;

    log::info!("mohead running. Press Ctrl-C to stop.");

    let mut decoder = FrameDecoder::with_payload_len(port, config.protocol.payload_len)?;
    let result = ingest::run(&mut decoder, &store, &shutdown);

    let stats = decoder.stats();
    log::info!(
        "Decoder stats: {} frames, {} checksum failures, {} bytes discarded",
        stats.frames,
        stats.checksum_failures,
        stats.discarded_bytes
    );

    // Stops the accept loop; blocked sessions end with the process
    shutdown.trigger();
    if accept_handle.join().is_err() {
        log::warn!("Accept thread panicked");
    }

    log::info!("mohead stopped");
    result
}
