//! Serial frame dumper
//!
//! Opens the sensor port, decodes frames for a fixed time and prints each one
//! in hex (angle frames also in degrees), for protocol analysis and debugging.
//!
//! Usage: cargo run --example frame_dump -- [DEVICE] [BAUD] [SECONDS]

use mohead::protocol::{AngleReading, FrameDecoder};
use mohead::transport::SerialTransport;
use std::env;
use std::time::{Duration, Instant};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().collect();
    let device = args.get(1).map(String::as_str).unwrap_or("/dev/ttyUSB0");
    let baud: u32 = args.get(2).map(|s| s.parse()).transpose()?.unwrap_or(115_200);
    let seconds: u64 = args.get(3).map(|s| s.parse()).transpose()?.unwrap_or(10);

    log::info!("=== JY901 Frame Dumper ===");
    log::info!("Opening serial port {} at {} baud...", device, baud);
    let transport = SerialTransport::open(device, baud)?;
    let mut decoder = FrameDecoder::new(transport);

    log::info!("Capturing for {} seconds...", seconds);
    let start = Instant::now();
    let duration = Duration::from_secs(seconds);

    while start.elapsed() < duration {
        let frame = decoder.next_frame()?;

        let hex_line: String = frame
            .payload()
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join(" ");
        println!(
            "[{:8.3}s] TYPE=0x{:02X} {} CHK=0x{:02X}",
            start.elapsed().as_secs_f64(),
            frame.frame_type,
            hex_line,
            frame.checksum
        );

        if let Some(reading) = AngleReading::from_frame(&frame) {
            let (roll, pitch, yaw) = reading.to_degrees();
            println!(
                "           roll={:8.2}° pitch={:8.2}° yaw={:8.2}°",
                roll, pitch, yaw
            );
        }
    }

    let stats = decoder.stats();
    log::info!("=== Capture Complete ===");
    log::info!("Valid frames: {}", stats.frames);
    log::info!("Checksum failures: {}", stats.checksum_failures);
    log::info!("Bytes discarded while searching for sync: {}", stats.discarded_bytes);

    Ok(())
}
