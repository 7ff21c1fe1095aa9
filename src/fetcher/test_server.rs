// src/fetcher/test_server.rs
// =============================================================================
// Minimal HTTP/1.1 server for the fetcher tests (compiled only for tests).
//
// Routes:
// - `/` and `/path*`: 200, body is the request path
// - `/hold*`: like `/path*` but holds the request for a moment and records
//   how many requests were being served at the same time
// - `/slow`: sleeps well past any timeout the tests use, then answers 200
// - `/truncated`: promises 100 bytes, sends 5, then closes the connection
// - anything else: 404 with body `not found`
//
// Every response carries `Connection: close`, so each request is one
// connection and one handler thread.
// =============================================================================

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const HOLD_FOR: Duration = Duration::from_millis(50);
const SLOW_FOR: Duration = Duration::from_secs(3);
const TRUNCATED_BODY: &[u8] = b"short";

#[derive(Debug, Default)]
pub struct ServerStats {
    requests: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl ServerStats {
    /// Total number of requests the server has parsed.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Highest number of `/hold*` requests served at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

pub struct TestServer {
    /// Base URL without a trailing slash, e.g. "http://127.0.0.1:12345".
    pub url: String,
    pub stats: Arc<ServerStats>,
}

impl TestServer {
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.url, path)
    }
}

/// Starts the server on an ephemeral port in a background thread. The
/// server runs until the test process exits.
pub fn start() -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let stats = Arc::new(ServerStats::default());
    let shared = Arc::clone(&stats);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let stats = Arc::clone(&shared);
            thread::spawn(move || handle(stream, &stats));
        }
    });
    TestServer {
        url: format!("http://127.0.0.1:{}", port),
        stats,
    }
}

/// A URL whose connection is always refused.
///
/// Port 1 is privileged and outside the ephemeral range the OS hands out
/// for port 0 binds, so no listener in this test process can ever own it.
pub fn unreachable_url() -> String {
    "http://127.0.0.1:1/".to_string()
}

fn handle(mut stream: TcpStream, stats: &ServerStats) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));

    let path = match read_request_path(&mut stream) {
        Some(path) => path,
        None => return,
    };
    stats.requests.fetch_add(1, Ordering::SeqCst);

    let (status, body) = if path == "/" || path.starts_with("/path") {
        ("200 OK", path.into_bytes())
    } else if path.starts_with("/hold") {
        let now = stats.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        stats.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        thread::sleep(HOLD_FOR);
        stats.in_flight.fetch_sub(1, Ordering::SeqCst);
        ("200 OK", path.into_bytes())
    } else if path == "/truncated" {
        // Content-Length promises more than is sent
        let head = "HTTP/1.1 200 OK\r\nContent-Length: 100\r\nConnection: close\r\n\r\n";
        let _ = stream.write_all(head.as_bytes());
        let _ = stream.write_all(TRUNCATED_BODY);
        let _ = stream.flush();
        return;
    } else if path == "/slow" {
        thread::sleep(SLOW_FOR);
        ("200 OK", b"slow".to_vec())
    } else {
        ("404 Not Found", b"not found".to_vec())
    };

    let head = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nContent-Type: text/plain\r\nConnection: close\r\n\r\n",
        status,
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&body);
    let _ = stream.flush();
}

/// Reads until the end of the request head and returns the request target.
fn read_request_path(stream: &mut TcpStream) -> Option<String> {
    let mut request = Vec::new();
    let mut buf = [0u8; 4096];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            return None;
        }
        request.extend_from_slice(&buf[..n]);
    }
    let head = std::str::from_utf8(&request).ok()?;
    let request_line = head.lines().next()?;
    let mut parts = request_line.split_whitespace();
    let _method = parts.next()?;
    parts.next().map(str::to_string)
}
