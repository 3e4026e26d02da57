//! Serial bytes in, NDJSON lines out, over a real TCP socket

use mohead::protocol::{AngleReading, FrameDecoder, payload::angle_frame};
use mohead::streaming::{AngleMessage, NdjsonServer};
use mohead::{Error, ShutdownToken, StateStore, ingest};
use std::io::{BufRead, BufReader, Cursor, ErrorKind};
use std::net::TcpStream;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// One angle frame: roll=0.5, pitch=0.0, yaw=-0.5
const REFERENCE_STREAM: [u8; 11] = [
    0x55, 0x53, 0x00, 0x40, 0x00, 0x00, 0x00, 0xC0, 0x00, 0x00, 0xA8,
];

fn connect(server: &NdjsonServer) -> BufReader<TcpStream> {
    let stream = TcpStream::connect(server.local_addr().unwrap()).unwrap();
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();
    BufReader::new(stream)
}

fn wait_for_readers(store: &StateStore, count: usize) {
    for _ in 0..1000 {
        if store.waiting_readers() == count {
            return;
        }
        thread::sleep(Duration::from_millis(5));
    }
    panic!(
        "Expected {} waiting consumers, found {}",
        count,
        store.waiting_readers()
    );
}

fn read_line(reader: &mut BufReader<TcpStream>) -> String {
    let mut line = String::new();
    reader.read_line(&mut line).unwrap();
    line
}

#[test]
fn test_reference_frame_reaches_consumer() {
    let store = Arc::new(StateStore::new());
    let shutdown = ShutdownToken::new();
    let server = NdjsonServer::bind("127.0.0.1:0", Arc::clone(&store), shutdown.clone()).unwrap();
    let mut consumer = connect(&server);
    let accept = server.spawn().unwrap();

    wait_for_readers(&store, 1);

    let mut decoder = FrameDecoder::new(Cursor::new(REFERENCE_STREAM.to_vec()));
    let result = ingest::run(&mut decoder, &store, &shutdown);
    assert!(matches!(result, Err(Error::Io(ref e)) if e.kind() == ErrorKind::UnexpectedEof));

    assert_eq!(
        read_line(&mut consumer),
        "{\"id\":1,\"roll\":0.5,\"pitch\":0.0,\"yaw\":-0.5}\n"
    );

    shutdown.trigger();
    accept.join().unwrap();
}

#[test]
fn test_consumers_share_the_same_updates() {
    let store = Arc::new(StateStore::new());
    let shutdown = ShutdownToken::new();
    let server = NdjsonServer::bind("127.0.0.1:0", Arc::clone(&store), shutdown.clone()).unwrap();
    let mut first = connect(&server);
    let mut second = connect(&server);
    let accept = server.spawn().unwrap();

    wait_for_readers(&store, 2);

    // Garbage and a corrupted frame ahead of the good one
    let mut bytes = vec![0x00, 0x13, 0x37];
    let mut corrupted = angle_frame(1, 1, 1).to_bytes();
    corrupted[10] = corrupted[10].wrapping_add(1);
    bytes.extend_from_slice(&corrupted);
    bytes.extend_from_slice(&angle_frame(8192, -8192, 16384).to_bytes());

    let mut decoder = FrameDecoder::new(Cursor::new(bytes));
    assert!(ingest::run(&mut decoder, &store, &shutdown).is_err());
    assert_eq!(decoder.stats().checksum_failures, 1);

    let expected = "{\"id\":1,\"roll\":0.25,\"pitch\":-0.25,\"yaw\":0.5}\n";
    assert_eq!(read_line(&mut first), expected);
    assert_eq!(read_line(&mut second), expected);

    shutdown.trigger();
    accept.join().unwrap();
}

#[test]
fn test_late_consumer_gets_current_state_first() {
    let store = Arc::new(StateStore::new());
    let shutdown = ShutdownToken::new();

    let mut bytes = angle_frame(0, 0, 0).to_bytes();
    bytes.extend_from_slice(&angle_frame(16384, 16384, 16384).to_bytes());
    let mut decoder = FrameDecoder::new(Cursor::new(bytes));
    assert!(ingest::run(&mut decoder, &store, &shutdown).is_err());

    let server = NdjsonServer::bind("127.0.0.1:0", Arc::clone(&store), shutdown.clone()).unwrap();
    let mut consumer = connect(&server);
    let accept = server.spawn().unwrap();

    assert_eq!(
        read_line(&mut consumer),
        "{\"id\":2,\"roll\":0.5,\"pitch\":0.5,\"yaw\":0.5}\n"
    );

    shutdown.trigger();
    accept.join().unwrap();
}

#[test]
fn test_disconnected_consumer_does_not_affect_others() {
    let store = Arc::new(StateStore::new());
    let shutdown = ShutdownToken::new();
    let server = NdjsonServer::bind("127.0.0.1:0", Arc::clone(&store), shutdown.clone()).unwrap();
    let mut live = connect(&server);
    let gone = connect(&server);
    let accept = server.spawn().unwrap();

    wait_for_readers(&store, 2);
    drop(gone);

    // The dropped consumer's session fails on one of these writes
    for i in 1..=20i16 {
        let version = store.publish(AngleReading::from_raw(i * 100, -i * 100, 0));
        assert_eq!(version, i as u64);

        let line = read_line(&mut live);
        let message: AngleMessage = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(message.id, version);
        assert_eq!(message.roll, f64::from(i * 100) / 32768.0);
    }

    wait_for_readers(&store, 1);

    shutdown.trigger();
    accept.join().unwrap();
}
