//! Serial transport implementation
//!
//! The port is opened with a short read timeout. Timeouts are retried inside
//! `read`, so callers see a blocking stream, until a [`ShutdownToken`] attached
//! with [`SerialTransport::with_shutdown`] is triggered. From then on the next
//! timeout is returned as `ErrorKind::TimedOut`, which ends the decode loop
//! within one timeout period even when the sensor link is silent.

use crate::error::Result;
use crate::shutdown::ShutdownToken;
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::{self, Read, Write};
use std::time::Duration;

/// Poll interval of the underlying port
const READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Serial transport for the sensor UART (or its Bluetooth SPP bridge)
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
    shutdown: Option<ShutdownToken>,
}

impl SerialTransport {
    /// Open a serial port at 8N1 with no flow control
    ///
    /// # Arguments
    /// * `path` - Serial port path (e.g., "/dev/ttyUSB0")
    /// * `baud_rate` - Baud rate (e.g., 115200)
    pub fn open(path: &str, baud_rate: u32) -> Result<Self> {
        let port = serialport::new(path, baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(READ_TIMEOUT)
            .open()?;

        log::info!("Opened serial port: {} at {} baud", path, baud_rate);

        Ok(SerialTransport {
            port,
            shutdown: None,
        })
    }

    /// Stop retrying read timeouts once `shutdown` is triggered
    pub fn with_shutdown(mut self, shutdown: ShutdownToken) -> Self {
        self.shutdown = Some(shutdown);
        self
    }
}

impl Read for SerialTransport {
    fn read(&mut self, buffer: &mut [u8]) -> io::Result<usize> {
        let port = &mut self.port;
        read_retrying(|| port.read(buffer), self.shutdown.as_ref())
    }
}

impl Write for SerialTransport {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.port.write(data)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.port.flush()
    }
}

/// Repeat `read` across timeouts and interrupts while `shutdown` (if any) is running
fn read_retrying<F>(mut read: F, shutdown: Option<&ShutdownToken>) -> io::Result<usize>
where
    F: FnMut() -> io::Result<usize>,
{
    loop {
        match read() {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) if e.kind() == io::ErrorKind::TimedOut => {
                if shutdown.is_some_and(|token| !token.is_running()) {
                    return Err(e);
                }
            }
            result => return result,
        }
    }
}
