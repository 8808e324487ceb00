//! Minimal HTTP server standing in for a BRouter servlet.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

/// GeoJSON track BRouter would return for a short leg.
pub const TRACK: &str = r#"{"type":"FeatureCollection","features":[{"type":"Feature",
"properties":{"creator":"BRouter-1.7.7","track-length":"1523","total-time":"341",
"total-energy":"41234","cost":"2110"},
"geometry":{"type":"LineString","coordinates":[[7.4474,46.948,541.0],[7.45,46.95,545.0]]}}]}"#;

/// A request the stub received.
#[derive(Debug, Clone)]
pub struct Received {
    /// Method and path, e.g. `GET /brouter?lonlats=...`.
    pub line: String,
    /// Request body.
    pub body: Vec<u8>,
}

/// Scripted response.
pub type Reply = (u16, String);

/// Running stub server; the listener thread lives for the rest of the test
/// process.
pub struct StubServer {
    /// Servlet URL to configure the oracle with.
    pub base_url: String,
    received: Arc<Mutex<Vec<Received>>>,
}

impl StubServer {
    /// Serve every request with `handler`.
    pub fn spawn(handler: impl Fn(&Received) -> Reply + Send + 'static) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
        let addr = listener.local_addr().expect("stub server address");
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let Some(request) = read_request(&stream) else {
                    continue;
                };
                let (status, body) = handler(&request);
                sink.lock().expect("request log").push(request);
                write_response(stream, status, &body);
            }
        });
        Self {
            base_url: format!("http://{addr}/brouter"),
            received,
        }
    }

    /// Serve `reply` for every request.
    pub fn always(status: u16, body: &str) -> Self {
        let body = body.to_owned();
        Self::spawn(move |_| (status, body.clone()))
    }

    /// Requests received so far.
    pub fn received(&self) -> Vec<Received> {
        self.received.lock().expect("request log").clone()
    }
}

/// URL of a port nothing listens on.
pub fn closed_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind probe");
    let addr = listener.local_addr().expect("probe address");
    drop(listener);
    format!("http://{addr}/brouter")
}

fn read_request(stream: &TcpStream) -> Option<Received> {
    let mut reader = BufReader::new(stream.try_clone().ok()?);
    let mut line = String::new();
    reader.read_line(&mut line).ok()?;
    let mut content_length = 0;
    loop {
        let mut header = String::new();
        if reader.read_line(&mut header).ok()? == 0 || header == "\r\n" {
            break;
        }
        let lower = header.to_ascii_lowercase();
        if let Some(value) = lower.strip_prefix("content-length:") {
            content_length = value.trim().parse().unwrap_or(0);
        }
    }
    let mut body = vec![0; content_length];
    reader.read_exact(&mut body).ok()?;
    let line = line
        .trim()
        .trim_end_matches("HTTP/1.1")
        .trim()
        .to_owned();
    Some(Received { line, body })
}

fn write_response(mut stream: TcpStream, status: u16, body: &str) {
    let reason = match status {
        200 => "OK",
        400 => "Bad Request",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    };
    let response = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\n\
         Connection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}
