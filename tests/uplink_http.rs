//! Uplink tests against a real local socket.
//!
//! A throwaway HTTP listener on 127.0.0.1 answers each delivery attempt
//! with a scripted status code, so the retry budget and the 200-only
//! success rule are exercised over an actual transport.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use serde_json::json;

use sillguard::adapters::uplink::HttpUplink;
use sillguard::app::ports::{DeliveryOutcome, UplinkPort};
use sillguard::retry::Backoff;

/// Serve one scripted response per incoming connection, collecting the
/// request bodies. Closes each connection so every attempt reconnects.
fn serve(statuses: Vec<u16>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let mut bodies = Vec::new();
        for status in statuses {
            let Ok((mut stream, _)) = listener.accept() else { break };
            bodies.push(read_request_body(&mut stream));
            let reason = match status {
                200 => "OK",
                404 => "Not Found",
                _ => "Internal Server Error",
            };
            let response = format!(
                "HTTP/1.1 {status} {reason}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
            );
            stream.write_all(response.as_bytes()).unwrap();
        }
        bodies
    });

    (base_url, handle)
}

fn read_request_body(stream: &mut std::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(split) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buf[..split]).to_ascii_lowercase();
            let content_length = headers
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= split + 4 + content_length {
                return String::from_utf8_lossy(&buf[split + 4..split + 4 + content_length])
                    .to_string();
            }
        }
    }
    String::new()
}

fn uplink(base_url: &str, attempts: u32) -> HttpUplink {
    HttpUplink::new(
        base_url,
        Duration::from_secs(5),
        Backoff::new(attempts, Duration::ZERO),
    )
}

#[test]
fn a_200_delivers_on_the_first_attempt() {
    let (base_url, server) = serve(vec![200]);
    let mut uplink = uplink(&base_url, 3);

    let payload = json!({"reed_state": true});
    assert_eq!(uplink.deliver("/reed_sensor", &payload), DeliveryOutcome::Delivered);

    let bodies = server.join().unwrap();
    assert_eq!(bodies.len(), 1);
    let sent: serde_json::Value = serde_json::from_str(&bodies[0]).unwrap();
    assert_eq!(sent, payload);
}

#[test]
fn a_500_is_retried_until_a_200_lands() {
    let (base_url, server) = serve(vec![500, 200]);
    let mut uplink = uplink(&base_url, 3);

    assert_eq!(
        uplink.deliver("/temp_sensor", &json!({"temperature": 19.5})),
        DeliveryOutcome::Delivered
    );
    assert_eq!(server.join().unwrap().len(), 2);
}

#[test]
fn persistent_errors_exhaust_exactly_the_budget() {
    let (base_url, server) = serve(vec![500, 500, 500]);
    let mut uplink = uplink(&base_url, 3);

    assert_eq!(
        uplink.deliver("/temp_alert", &json!({"alert": "x", "temperature": 1.0})),
        DeliveryOutcome::Failed
    );
    assert_eq!(server.join().unwrap().len(), 3);
}

#[test]
fn any_non_200_status_counts_as_retryable() {
    let (base_url, server) = serve(vec![404, 200]);
    let mut uplink = uplink(&base_url, 2);

    assert_eq!(
        uplink.deliver("/reed_sensor", &json!({"reed_state": false})),
        DeliveryOutcome::Delivered
    );
    assert_eq!(server.join().unwrap().len(), 2);
}

#[test]
fn transport_errors_fail_after_the_budget() {
    // Bind then drop to get a port with nothing listening on it.
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let mut uplink = uplink(&format!("http://127.0.0.1:{port}"), 2);

    assert_eq!(
        uplink.deliver("/reed_sensor", &json!({"reed_state": true})),
        DeliveryOutcome::Failed
    );
}
