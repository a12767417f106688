//! Shared utilities for integration tests: an in-process mock ledger node.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use ledger_roundtrip::config::LedgerConfig;
use ledger_roundtrip::ledger::transaction::verify_json;
use ledger_roundtrip::{LedgerClient, Pipeline};

/// How the mock node answers.
#[derive(Debug, Clone)]
pub enum NodeBehavior {
    /// Validate, store and serve transactions like a healthy node.
    Commit,
    /// Refuse every submission with this status and JSON message.
    Reject { status: u16, message: String },
    /// Accept submissions but never find them again.
    LoseTransactions,
    /// Serve stored transactions with the `asset` field removed.
    StripAsset,
    /// Close the connection without answering.
    Hangup,
    /// Hold the connection open without answering.
    Stall,
    /// Answer with headers shortly before the deadline, then never finish the body.
    StallBody,
}

/// Handle to a running mock node.
#[derive(Clone)]
pub struct MockLedger {
    pub addr: SocketAddr,
    pub submits: Arc<AtomicUsize>,
    pub fetches: Arc<AtomicUsize>,
    pub committed: Arc<Mutex<HashMap<String, Value>>>,
}

impl MockLedger {
    pub fn api_url(&self) -> String {
        format!("http://{}/api/v1/", self.addr)
    }

    pub fn submit_count(&self) -> usize {
        self.submits.load(Ordering::SeqCst)
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn committed(&self, id: &str) -> Option<Value> {
        self.committed.lock().unwrap().get(id).cloned()
    }

    pub fn pipeline(&self, output: &Path) -> Pipeline {
        pipeline_for(&self.api_url(), 5, output)
    }
}

pub fn pipeline_for(api_url: &str, timeout_secs: u64, output: &Path) -> Pipeline {
    let client = LedgerClient::new(LedgerConfig {
        api_url: api_url.to_string(),
        request_timeout_secs: timeout_secs,
        connect_timeout_secs: 1,
    })
    .unwrap();
    Pipeline::new(client, output)
}

/// An address nothing listens on.
pub async fn closed_address() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Start a mock ledger node on an ephemeral port.
pub async fn start_mock_ledger(behavior: NodeBehavior) -> MockLedger {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let node = MockLedger {
        addr: listener.local_addr().unwrap(),
        submits: Arc::new(AtomicUsize::new(0)),
        fetches: Arc::new(AtomicUsize::new(0)),
        committed: Arc::new(Mutex::new(HashMap::new())),
    };

    let handle = node.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let node = handle.clone();
                    let behavior = behavior.clone();
                    tokio::spawn(async move {
                        serve_connection(socket, node, behavior).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    node
}

async fn serve_connection(mut socket: TcpStream, node: MockLedger, behavior: NodeBehavior) {
    let Some((method, target, body)) = read_request(&mut socket).await else {
        return;
    };

    let is_submit = method == "POST" && target.starts_with("/api/v1/transactions");
    let fetch_id = target
        .strip_prefix("/api/v1/transactions/")
        .filter(|_| method == "GET")
        .map(str::to_string);

    if is_submit {
        node.submits.fetch_add(1, Ordering::SeqCst);
    }
    if fetch_id.is_some() {
        node.fetches.fetch_add(1, Ordering::SeqCst);
    }

    match behavior {
        NodeBehavior::Hangup => return,
        NodeBehavior::Stall => {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            return;
        }
        NodeBehavior::StallBody => {
            tokio::time::sleep(Duration::from_millis(900)).await;
            let head = "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 100\r\n\r\n{";
            let _ = socket.write_all(head.as_bytes()).await;
            let _ = socket.flush().await;
            tokio::time::sleep(Duration::from_secs(3600)).await;
            return;
        }
        _ => {}
    }

    let (status, response) = if is_submit {
        handle_submit(&node, &behavior, &target, &body)
    } else if let Some(id) = fetch_id {
        handle_fetch(&node, &behavior, &id)
    } else {
        (404, json!({"message": "Not found", "status": 404}))
    };

    write_response(&mut socket, status, &response.to_string()).await;
}

fn handle_submit(node: &MockLedger, behavior: &NodeBehavior, target: &str, body: &[u8]) -> (u16, Value) {
    if let NodeBehavior::Reject { status, message } = behavior {
        return (*status, json!({"message": message, "status": status}));
    }
    if !target.ends_with("?mode=commit") {
        return (400, json!({"message": "Expected commit mode", "status": 400}));
    }

    let tx: Value = match serde_json::from_slice(body) {
        Ok(tx) => tx,
        Err(_) => return (400, json!({"message": "Invalid JSON", "status": 400})),
    };
    if !matches!(verify_json(&tx), Ok(true)) {
        return (
            400,
            json!({"message": "Invalid transaction (InvalidSignature)", "status": 400}),
        );
    }

    let id = tx["id"].as_str().unwrap_or_default().to_string();
    node.committed.lock().unwrap().insert(id, tx.clone());
    (202, tx)
}

fn handle_fetch(node: &MockLedger, behavior: &NodeBehavior, id: &str) -> (u16, Value) {
    if matches!(behavior, NodeBehavior::LoseTransactions) {
        return (404, json!({"message": "Not found", "status": 404}));
    }

    match node.committed(id) {
        Some(mut tx) => {
            if matches!(behavior, NodeBehavior::StripAsset) {
                if let Some(map) = tx.as_object_mut() {
                    map.remove("asset");
                }
            }
            (200, tx)
        }
        None => (404, json!({"message": "Not found", "status": 404})),
    }
}

async fn read_request(socket: &mut TcpStream) -> Option<(String, String, Vec<u8>)> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.lines();
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let target = request_line.next()?.to_string();

    let content_length = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let body = buf[header_end..header_end + content_length].to_vec();
    Some((method, target, body))
}

async fn write_response(socket: &mut TcpStream, status: u16, body: &str) {
    let status_text = match status {
        200 => "200 OK",
        202 => "202 Accepted",
        400 => "400 Bad Request",
        404 => "404 Not Found",
        500 => "500 Internal Server Error",
        503 => "503 Service Unavailable",
        _ => "500 Internal Server Error",
    };

    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_text,
        body.len(),
        body
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

/// Write `contents` to `name` inside `dir` and return the path.
pub fn write_input(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}
