//! TCP listener that hands each consumer its own session thread
//!
//! The listener runs non-blocking and is polled every 10 ms so the accept
//! thread notices shutdown without a wake-up connection. Accepted streams are
//! switched back to blocking before they reach a [`ConsumerSession`].

use super::session::ConsumerSession;
use crate::error::Result;
use crate::shutdown::ShutdownToken;
use crate::state::StateStore;
use log::{error, info, warn};
use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Idle delay between accept polls
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Upper bound of the delay after repeated accept failures
const ACCEPT_ERROR_MAX_DELAY: Duration = Duration::from_secs(1);

/// Delay after failed accepts (fd exhaustion, aborted handshakes)
///
/// Starts at the poll interval and doubles per consecutive failure up to
/// [`ACCEPT_ERROR_MAX_DELAY`]. A successful accept resets it.
#[derive(Debug, Default)]
struct AcceptBackoff {
    failures: u32,
}

impl AcceptBackoff {
    /// Record a failure and return how long to wait before the next accept
    fn on_error(&mut self) -> Duration {
        let delay = ACCEPT_POLL_INTERVAL
            .saturating_mul(1u32 << self.failures.min(16))
            .min(ACCEPT_ERROR_MAX_DELAY);
        self.failures = self.failures.saturating_add(1);
        delay
    }

    fn on_success(&mut self) {
        self.failures = 0;
    }

    /// Log the first failure of a streak, then every tenth
    fn should_log(&self) -> bool {
        self.failures % 10 == 1
    }
}

/// NDJSON broadcast endpoint
pub struct NdjsonServer {
    listener: TcpListener,
    store: Arc<StateStore>,
    shutdown: ShutdownToken,
}

impl NdjsonServer {
    /// Bind the listener
    ///
    /// # Arguments
    /// - `bind_address`: TCP bind address (e.g., "127.0.0.1:6770"; port 0 picks a free one)
    pub fn bind(
        bind_address: &str,
        store: Arc<StateStore>,
        shutdown: ShutdownToken,
    ) -> Result<Self> {
        let listener = TcpListener::bind(bind_address)?;
        listener.set_nonblocking(true)?;
        info!("NDJSON server listening on {}", listener.local_addr()?);

        Ok(Self {
            listener,
            store,
            shutdown,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Start the accept thread; it exits once shutdown is requested
    pub fn spawn(self) -> Result<JoinHandle<()>> {
        let handle = thread::Builder::new()
            .name("ndjson-accept".to_string())
            .spawn(move || self.accept_loop())?;
        Ok(handle)
    }

    fn accept_loop(self) {
        let mut backoff = AcceptBackoff::default();

        while self.shutdown.is_running() {
            match self.listener.accept() {
                Ok((stream, addr)) => {
                    backoff.on_success();
                    if let Err(e) = self.start_session(stream, addr) {
                        warn!("Failed to start session for {}: {}", addr, e);
                    }
                }
                Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) => {
                    let delay = backoff.on_error();
                    if backoff.should_log() {
                        error!("Accept error (retrying in {:?}): {}", delay, e);
                    }
                    thread::sleep(delay);
                }
            }
        }

        info!("NDJSON server stopped");
    }

    /// Session threads are detached; they end on write failure or on the
    /// first wake after shutdown.
    fn start_session(&self, stream: TcpStream, addr: SocketAddr) -> Result<()> {
        stream.set_nonblocking(false)?;
        if let Err(e) = stream.set_nodelay(true) {
            warn!("Failed to set TCP_NODELAY for {}: {}", addr, e);
        }

        let session = ConsumerSession::new(stream, Arc::clone(&self.store), self.shutdown.clone());
        thread::Builder::new()
            .name(format!("consumer-{}", addr))
            .spawn(move || {
                info!("Consumer connected: {}", addr);
                match session.run() {
                    Ok(sent) => info!("Consumer {} closed after {} records", addr, sent),
                    Err(e) => info!("Consumer disconnected: {} ({})", addr, e),
                }
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::protocol::AngleReading;
    use std::io::{BufRead, BufReader};

    #[test]
    fn test_consumer_receives_updates() {
        let store = Arc::new(StateStore::new());
        let shutdown = ShutdownToken::new();
        let server =
            NdjsonServer::bind("127.0.0.1:0", Arc::clone(&store), shutdown.clone()).unwrap();
        let addr = server.local_addr().unwrap();
        let accept = server.spawn().unwrap();

        store.publish(AngleReading { roll: 0.5, pitch: 0.0, yaw: -0.5 });

        let stream = TcpStream::connect(addr).unwrap();
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        let mut reader = BufReader::new(stream);
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        assert_eq!(line, "{\"id\":1,\"roll\":0.5,\"pitch\":0.0,\"yaw\":-0.5}\n");

        store.publish(AngleReading { roll: 0.25, pitch: 0.25, yaw: 0.25 });
        line.clear();
        reader.read_line(&mut line).unwrap();
        assert_eq!(line, "{\"id\":2,\"roll\":0.25,\"pitch\":0.25,\"yaw\":0.25}\n");

        shutdown.trigger();
        accept.join().unwrap();
    }

    #[test]
    fn test_accept_errors_back_off() {
        let mut backoff = AcceptBackoff::default();
        let delays: Vec<Duration> = (0..10).map(|_| backoff.on_error()).collect();

        assert_eq!(delays[0], ACCEPT_POLL_INTERVAL);
        assert!(delays.iter().all(|d| *d >= ACCEPT_POLL_INTERVAL));
        assert!(delays.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(delays[9], ACCEPT_ERROR_MAX_DELAY);

        for _ in 0..100 {
            assert_eq!(backoff.on_error(), ACCEPT_ERROR_MAX_DELAY);
        }

        backoff.on_success();
        assert_eq!(backoff.on_error(), ACCEPT_POLL_INTERVAL);
    }

    #[test]
    fn test_accept_error_logging_is_throttled() {
        let mut backoff = AcceptBackoff::default();
        let logged = (0..100)
            .filter(|_| {
                backoff.on_error();
                backoff.should_log()
            })
            .count();
        assert_eq!(logged, 10);
    }

    #[test]
    fn test_bind_failure_is_reported() {
        let taken = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = taken.local_addr().unwrap().to_string();

        let store = Arc::new(StateStore::new());
        let result = NdjsonServer::bind(&addr, store, ShutdownToken::new());
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
