//! OpenAI client tests against a local canned HTTP server.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use isla_core::{
    Completion, GenerationConfig, Llm, LlmError, LlmRequest, Message, ToolDeclaration,
};
use isla_model::{MockLlm, OpenAIClient, OpenAIConfig};
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve `responses` in order, one per connection; the last one repeats.
/// Returns the base URL and a counter of handled requests.
async fn serve(responses: Vec<(u16, String)>) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else { break };
            let n = counter.fetch_add(1, Ordering::SeqCst);
            let (status, body) = responses[n.min(responses.len() - 1)].clone();

            read_request(&mut socket).await;
            let reply = format!(
                "HTTP/1.1 {status} X\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(reply.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    (format!("http://{addr}/v1"), hits)
}

async fn read_request(socket: &mut tokio::net::TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let Ok(n) = socket.read(&mut chunk).await else { return };
        if n == 0 {
            return;
        }
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf);
        if let Some(end) = text.find("\r\n\r\n") {
            let length = text[..end]
                .lines()
                .find_map(|l| {
                    let (name, value) = l.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length").then(|| value.trim().parse().ok())?
                })
                .unwrap_or(0usize);
            if buf.len() >= end + 4 + length {
                return;
            }
        }
    }
}

fn client(base: &str) -> OpenAIClient {
    OpenAIClient::new(
        OpenAIConfig::compatible("test-key", base, "gpt-4o-mini")
            .with_timeout(Duration::from_secs(5))
            .with_max_retries(2)
            .with_initial_backoff(Duration::from_millis(10)),
    )
    .unwrap()
}

fn text_body(text: &str) -> String {
    json!({
        "choices": [{"message": {"role": "assistant", "content": text}, "finish_reason": "stop"}],
        "usage": {"total_tokens": 12}
    })
    .to_string()
}

fn request() -> LlmRequest {
    LlmRequest::new(vec![Message::user("¿Qué ver en La Laguna?")], GenerationConfig::default())
}

#[tokio::test]
async fn text_answer_is_returned() {
    let (base, hits) = serve(vec![(200, text_body("El casco histórico."))]).await;
    let completion = client(&base).complete(request()).await.unwrap();

    assert_eq!(completion, Completion::Text("El casco histórico.".into()));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn tool_calls_are_returned() {
    let body = json!({
        "choices": [{
            "message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": {"name": "get_weather", "arguments": "{\"date\":\"2026-10-20\"}"}
                }]
            },
            "finish_reason": "tool_calls"
        }]
    })
    .to_string();
    let (base, _) = serve(vec![(200, body)]).await;

    let tool = ToolDeclaration {
        name: "get_weather".into(),
        description: "weather".into(),
        parameters: json!({"type": "object"}),
    };
    let completion = client(&base).complete(request().with_tools(vec![tool])).await.unwrap();

    match completion {
        Completion::ToolCalls(calls) => assert_eq!(calls[0].name, "get_weather"),
        other => panic!("expected tool calls, got {other:?}"),
    }
}

#[tokio::test]
async fn server_errors_are_retried() {
    let busy = json!({"error": {"message": "overloaded"}}).to_string();
    let (base, hits) = serve(vec![(503, busy), (200, text_body("OK"))]).await;

    let completion = client(&base).complete(request()).await.unwrap();
    assert_eq!(completion.text(), Some("OK"));
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn retries_are_bounded() {
    let throttled = json!({"error": {"message": "slow down"}}).to_string();
    let (base, hits) = serve(vec![(429, throttled)]).await;

    let err = client(&base).complete(request()).await.unwrap_err();
    assert_eq!(err, LlmError::RateLimited("slow down".into()));
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn unauthorized_is_not_retried() {
    let denied = json!({"error": {"message": "bad key"}}).to_string();
    let (base, hits) = serve(vec![(401, denied)]).await;

    let err = client(&base).complete(request()).await.unwrap_err();
    assert!(matches!(err, LlmError::Unauthorized(_)));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn connection_test_reports_reachability() {
    let (base, _) = serve(vec![(200, text_body("OK"))]).await;
    assert!(client(&base).test_connection().await);

    let (base, _) = serve(vec![(401, "{}".to_string())]).await;
    assert!(!client(&base).test_connection().await);
}

#[tokio::test]
async fn mock_replays_script_and_records_requests() {
    let llm = MockLlm::new("mock")
        .with_tool_call("call_1", "get_weather", "{\"date\":\"hoy\"}")
        .with_text("Hará sol.");

    assert!(matches!(llm.complete(request()).await.unwrap(), Completion::ToolCalls(_)));
    assert_eq!(llm.complete(request()).await.unwrap().text(), Some("Hará sol."));
    assert!(llm.complete(request()).await.is_err());
    assert_eq!(llm.requests().len(), 3);
    assert_eq!(llm.remaining(), 0);
}
