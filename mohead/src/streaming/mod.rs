//! NDJSON streaming to TCP consumers
//!
//! - [`NdjsonServer`]: accepts consumers and spawns one session thread each
//! - [`ConsumerSession`]: waits on the shared store and writes one line per change
//! - [`AngleMessage`]: the `{"id","roll","pitch","yaw"}` record

pub mod messages;
pub mod server;
pub mod session;

pub use messages::AngleMessage;
pub use server::NdjsonServer;
pub use session::ConsumerSession;
