#![cfg(feature = "cli")]

use std::net::TcpListener;
use std::path::PathBuf;
use std::process::{Command, Output};
use std::thread;

use serde_json::Value;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::header::SEC_WEBSOCKET_PROTOCOL;
use tokio_tungstenite::tungstenite::{self, Message};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../navlink-cdr/tests/fixtures")
        .join(name)
}

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "navlink-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn navlink(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_navlink"))
        .args(["--log-level", "off"])
        .args(args)
        .output()
        .expect("navlink should run")
}

fn first_json_line(output: &Output) -> Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let line = stdout.lines().next().expect("stdout should have a line");
    serde_json::from_str(line).expect("stdout line should be JSON")
}

fn frame_bytes(subscription_id: u32, timestamp_nanos: u64, payload: &[u8]) -> Vec<u8> {
    let mut out = vec![0x01];
    out.extend_from_slice(&subscription_id.to_le_bytes());
    out.extend_from_slice(&timestamp_nanos.to_le_bytes());
    out.extend_from_slice(payload);
    out
}

#[test]
fn decode_fix_payload_as_json() {
    let path = fixture("navsat_gps_left_link.cdr");
    let output = navlink(&[
        "decode",
        path.to_str().unwrap(),
        "--topic",
        "/gps/fix_filtered",
        "--format",
        "json",
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let json = first_json_line(&output);
    assert_eq!(json["topic"], "/gps/fix_filtered");
    assert_eq!(json["message"]["header"]["frame_id"], "gps_left_link");
    assert_eq!(json["message"]["status"], 2);
    let latitude = json["message"]["position"]["latitude"].as_f64().unwrap();
    assert!((latitude - 36.11400677266).abs() < 1e-9);
    assert!(json.get("frame").is_none());
}

#[test]
fn decode_full_frame_reports_header() {
    let dir = unique_temp_dir("decode-frame");
    let path = dir.join("heading.bin");
    let payload = std::fs::read(fixture("imu_gps_left_link.cdr")).unwrap();
    std::fs::write(&path, frame_bytes(7, 99, &payload)).unwrap();

    let output = navlink(&[
        "decode",
        path.to_str().unwrap(),
        "--topic",
        "/gps/heading",
        "--frame",
        "--format",
        "json",
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let json = first_json_line(&output);
    assert_eq!(json["frame"]["subscription_id"], 7);
    assert_eq!(json["frame"]["timestamp_nanos"], 99);
    assert_eq!(json["message"]["header"]["stamp"]["sec"], 1744572625);
    let w = json["message"]["quaternion"]["w"].as_f64().unwrap();
    assert!((w - 0.12802904344453836).abs() < 1e-12);

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn decode_rejects_unknown_topic_and_bad_payload() {
    let path = fixture("imu_gps_left_link.cdr");
    let output = navlink(&["decode", path.to_str().unwrap(), "--topic", "/tf"]);
    assert_eq!(output.status.code(), Some(64));

    let fix = fixture("navsat_imu_link.cdr");
    let output = navlink(&["decode", fix.to_str().unwrap(), "--topic", "/sensor_status"]);
    assert_eq!(output.status.code(), Some(60));

    let output = navlink(&["decode", "/nonexistent/navlink.cdr", "--topic", "/gps/heading"]);
    assert_eq!(output.status.code(), Some(66));
}

#[test]
fn watch_prints_events_until_count() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let payload = std::fs::read(fixture("imu_gps_left_link.cdr")).unwrap();

    let server = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut ws = tungstenite::accept_hdr(
            stream,
            |request: &Request, mut response: Response| -> Result<Response, ErrorResponse> {
                if let Some(protocol) = request.headers().get(SEC_WEBSOCKET_PROTOCOL) {
                    response.headers_mut().insert(SEC_WEBSOCKET_PROTOCOL, protocol.clone());
                }
                Ok(response)
            },
        )
        .unwrap();

        ws.send(Message::Text(
            r#"{"op":"advertise","channels":[{"id":11,"topic":"/gps/heading","encoding":"cdr"}]}"#.to_string(),
        ))
        .unwrap();
        let subscribe = loop {
            if let Message::Text(text) = ws.read().unwrap() {
                break text;
            }
        };
        ws.send(Message::Binary(frame_bytes(11, 0, &payload))).unwrap();

        // Keep the socket open until the client goes away.
        while ws.read().is_ok() {}
        subscribe
    });

    let uri = format!("ws://{addr}");
    let output = navlink(&["watch", "--uri", &uri, "--count", "1", "--duration", "20s", "--format", "json"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let json = first_json_line(&output);
    assert_eq!(json["event"], "orientation-updated");
    assert!((json["z"].as_f64().unwrap() - 0.9917704190157501).abs() < 1e-12);
    assert!(json["received_at"].as_u64().is_some());

    let subscribe = server.join().unwrap();
    assert_eq!(subscribe, r#"{"op":"subscribe","subscriptions":[{"id":11,"channelId":11}]}"#);
}

#[test]
fn watch_exits_with_transport_error_when_retries_run_out() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let uri = format!("ws://{addr}");
    let output = navlink(&["watch", "--uri", &uri, "--max-retries", "0", "--duration", "20s", "--format", "json"]);
    assert_eq!(output.status.code(), Some(3));

    let json = first_json_line(&output);
    assert_eq!(json["event"], "connection-failed");
    assert_eq!(json["retries"], 0);
}
