//! One-shot HTTP responder for exercising the remote document store.

#![allow(dead_code)]

use staffdesk_core::{JsonBinStore, RemoteStoreConfig};
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Local server that answers every request with the same raw bytes and
/// records each request line it sees.
pub struct CannedServer {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl CannedServer {
    pub fn start(response: &'static [u8]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { break };
                let Ok(reader_half) = stream.try_clone() else { continue };
                let mut reader = BufReader::new(reader_half);

                let mut request_line = String::new();
                if reader.read_line(&mut request_line).is_err() {
                    continue;
                }
                seen.lock()
                    .unwrap()
                    .push(request_line.trim_end().to_string());
                loop {
                    let mut header = String::new();
                    match reader.read_line(&mut header) {
                        Ok(0) | Err(_) => break,
                        Ok(_) if header == "\r\n" => break,
                        Ok(_) => {}
                    }
                }

                let _ = stream.write_all(response);
                let _ = stream.flush();
            }
        });

        Self { base_url, requests }
    }

    pub fn store(&self) -> JsonBinStore {
        let config = RemoteStoreConfig::new("bin", "test-key")
            .unwrap()
            .with_base_url(&self.base_url)
            .unwrap()
            .with_timeout(Some(Duration::from_secs(5)));
        JsonBinStore::new(config).unwrap()
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Promises 5000 bytes, sends a JSON prefix, then hangs up.
pub const TRUNCATED_BODY: &[u8] = b"HTTP/1.1 200 OK\r\n\
Content-Type: application/json\r\n\
Content-Length: 5000\r\n\
Connection: close\r\n\
\r\n\
{\"record\":{\"stores\":[";

/// Complete response whose body is not JSON.
pub const GARBLED_BODY: &[u8] = b"HTTP/1.1 200 OK\r\n\
Content-Type: application/json\r\n\
Content-Length: 8\r\n\
Connection: close\r\n\
\r\n\
not json";
