//! Shared mock backends for integration tests.
//!
//! Raw TCP servers speaking just enough HTTP/1.1 for the probe client.
//! All helpers bind an ephemeral port and return the bound address.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

fn status_text(status: u16) -> &'static str {
    match status {
        200 => "200 OK",
        202 => "202 Accepted",
        404 => "404 Not Found",
        429 => "429 Too Many Requests",
        500 => "500 Internal Server Error",
        502 => "502 Bad Gateway",
        503 => "503 Service Unavailable",
        _ => "200 OK",
    }
}

async fn respond(mut socket: TcpStream, status: u16, body: &str) {
    // Drain what the client sent before answering; small test requests fit
    // in one read.
    let mut buf = [0u8; 4096];
    let _ = socket.read(&mut buf).await;

    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_text(status),
        body.len(),
        body
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

/// Backend returning a fixed status and body for every request.
pub async fn start_mock_backend(status: u16, body: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    tokio::spawn(respond(socket, status, body));
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Fixed backend that also counts how many requests it served.
pub async fn start_counting_backend(
    status: u16,
    body: &'static str,
) -> (SocketAddr, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_server = hits.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    hits_server.fetch_add(1, Ordering::SeqCst);
                    tokio::spawn(respond(socket, status, body));
                }
                Err(_) => break,
            }
        }
    });

    (addr, hits)
}

/// Backend answering scripted responses in order, repeating the last one
/// once the script is exhausted.
#[allow(dead_code)]
pub async fn start_sequence_backend(responses: Vec<(u16, String)>) -> SocketAddr {
    assert!(!responses.is_empty(), "sequence backend needs responses");

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let script = Arc::new(Mutex::new(responses));

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let (status, body) = {
                        let mut script = script.lock().unwrap();
                        if script.len() > 1 {
                            script.remove(0)
                        } else {
                            script[0].clone()
                        }
                    };
                    tokio::spawn(async move { respond(socket, status, &body).await });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// An address nothing is listening on (bound, then dropped).
#[allow(dead_code)]
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}
