//! End-to-end tests against a simulated Fava instance.
//!
//! Each test starts a one-shot HTTP responder on loopback, points a real
//! `FavaClient` at it, and drives the MCP server through `handle_line`.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use fava_mcp::{
    FavaApi, FavaClient, FavaConfig, JournalQuery, McpError, McpServer, McpSession,
    LEDGER_DATA_ENDPOINT,
};
use serde_json::Value as JsonValue;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

/// Accept one connection on a loopback listener, answer it, and return the
/// request head (request line plus headers).
fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_io()
        .build()
        .unwrap();
    let listener = runtime
        .block_on(TcpListener::bind("127.0.0.1:0"))
        .unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );

    let handle = thread::spawn(move || {
        runtime.block_on(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let (reader, mut writer) = stream.into_split();

            let mut lines = BufReader::new(reader).lines();
            let mut head = String::new();
            while let Some(line) = lines.next_line().await.unwrap() {
                if line.is_empty() {
                    break;
                }
                head.push_str(&line);
                head.push('\n');
            }

            writer.write_all(response.as_bytes()).await.unwrap();
            writer.shutdown().await.unwrap();
            head
        })
    });

    (format!("http://{}/ledger/", addr), handle)
}

fn config(base_url: &str) -> FavaConfig {
    FavaConfig::new(base_url)
        .unwrap()
        .with_timeout(Some(Duration::from_secs(10)))
}

fn server_for(config: FavaConfig) -> McpServer {
    McpServer::new(McpSession::new(FavaClient::new(config).unwrap()))
}

fn call_tool(server: &McpServer, name: &str, arguments: JsonValue) -> JsonValue {
    let request = serde_json::json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "tools/call",
        "params": { "name": name, "arguments": arguments },
    });
    let response = server.handle_line(&request.to_string()).unwrap();
    assert!(response.error.is_none(), "unexpected error: {:?}", response.error);
    response.result.unwrap()
}

fn request_line(head: &str) -> &str {
    head.lines().next().unwrap_or_default()
}

fn header<'a>(head: &'a str, name: &str) -> Option<&'a str> {
    head.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        key.eq_ignore_ascii_case(name).then(|| value.trim())
    })
}

#[test]
fn ledger_data_returns_upstream_json_as_text() {
    let body = r#"{"data":{"accounts":["Assets:Cash","Expenses:Food"],"tags":["trip"]}}"#;
    let (url, upstream) = serve_once("200 OK", body);
    let server = server_for(config(&url));

    let result = call_tool(&server, "get_ledger_data", serde_json::json!({}));
    let head = upstream.join().unwrap();

    assert_eq!(request_line(&head), "GET /ledger/api/ledger_data HTTP/1.1");
    assert_eq!(result["isError"], false);
    let text = result["content"][0]["text"].as_str().unwrap();
    let rendered: JsonValue = serde_json::from_str(text).unwrap();
    assert_eq!(rendered, serde_json::from_str::<JsonValue>(body).unwrap());
}

#[test]
fn server_error_becomes_error_text() {
    let (url, upstream) = serve_once("500 Internal Server Error", r#"{"error":"boom"}"#);
    let server = server_for(config(&url));

    let result = call_tool(&server, "query_journal", serde_json::json!({ "time": "2024" }));
    upstream.join().unwrap();

    assert_eq!(result["isError"], true);
    let text = result["content"][0]["text"].as_str().unwrap();
    assert!(text.starts_with("Error: "), "got {text}");
    assert!(text.contains("500"), "got {text}");
}

#[test]
fn query_parameters_are_encoded() {
    let (url, upstream) = serve_once("200 OK", r#"{"data":[]}"#);
    let server = server_for(config(&url));

    call_tool(
        &server,
        "query_journal",
        serde_json::json!({
            "account": "Assets:Balance",
            "time": "2024",
            "tags": ["vacation"],
            "links": ["^invoice-1"],
        }),
    );
    let head = upstream.join().unwrap();

    assert_eq!(
        request_line(&head),
        "GET /ledger/api/query?query_string=SELECT+*&account=Assets%3ABalance&time=2024\
         &filter=%23vacation+%5Einvoice-1 HTTP/1.1"
    );
}

#[test]
fn basic_auth_sent_when_configured() {
    let (url, upstream) = serve_once("200 OK", "{}");
    let client = FavaClient::new(
        config(&url).with_credentials(Some("alice".into()), Some("secret".into())),
    )
    .unwrap();

    client.get(LEDGER_DATA_ENDPOINT, None).unwrap();
    let head = upstream.join().unwrap();

    assert_eq!(header(&head, "authorization"), Some("Basic YWxpY2U6c2VjcmV0"));
}

#[test]
fn no_auth_without_password() {
    let (url, upstream) = serve_once("200 OK", "{}");
    let client =
        FavaClient::new(config(&url).with_credentials(Some("alice".into()), None)).unwrap();

    client.get(LEDGER_DATA_ENDPOINT, None).unwrap();
    let head = upstream.join().unwrap();

    assert_eq!(header(&head, "authorization"), None);
}

#[test]
fn undecodable_body_is_communication_error() {
    let (url, upstream) = serve_once("200 OK", "<html>login</html>");
    let session = McpSession::new(FavaClient::new(config(&url)).unwrap());

    let err = session.query_journal(&JournalQuery::default()).unwrap_err();
    upstream.join().unwrap();

    assert!(matches!(err, McpError::Communication { .. }), "got {err:?}");
}
