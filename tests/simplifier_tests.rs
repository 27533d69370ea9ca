use async_trait::async_trait;
use calcwand::client_wrapper::{ClientWrapper, Message, Role, TokenUsage};
use calcwand::simplifier::{
    get_simplified_equation, EquationSimplifier, LlmEquationSimplifier, SimplifierError,
    SimplifyEquationInput, SimplifyEquationOutput, EMPTY_EQUATION_MESSAGE, GENERIC_ERROR_MESSAGE,
};
use calcwand::clients::openai::OpenAIClient;
use std::error::Error;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::Mutex;

/// Replies with a canned string and remembers what it was asked.
struct MockClient {
    response: Result<String, String>,
    calls: AtomicUsize,
    last_messages: StdMutex<Vec<Message>>,
    token_usage: Mutex<Option<TokenUsage>>,
}

impl MockClient {
    fn replying(response: &str) -> Self {
        MockClient {
            response: Ok(response.to_string()),
            calls: AtomicUsize::new(0),
            last_messages: StdMutex::new(Vec::new()),
            token_usage: Mutex::new(None),
        }
    }

    fn failing(error: &str) -> Self {
        MockClient {
            response: Err(error.to_string()),
            ..MockClient::replying("")
        }
    }
}

#[async_trait]
impl ClientWrapper for MockClient {
    fn model_name(&self) -> &str {
        "mock"
    }

    async fn send_message(&self, messages: &[Message]) -> Result<Message, Box<dyn Error>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_messages.lock().unwrap() = messages.to_vec();
        *self.token_usage.lock().await = Some(TokenUsage {
            input_tokens: 12,
            output_tokens: 8,
            total_tokens: 20,
        });
        match &self.response {
            Ok(content) => Ok(Message::new(Role::Assistant, content.clone())),
            Err(err) => Err(err.clone().into()),
        }
    }

    fn usage_slot(&self) -> Option<&Mutex<Option<TokenUsage>>> {
        Some(&self.token_usage)
    }
}

/// Simplifier stub that counts invocations.
struct CountingSimplifier {
    calls: AtomicUsize,
    fail: bool,
}

#[async_trait]
impl EquationSimplifier for CountingSimplifier {
    async fn simplify(
        &self,
        input: SimplifyEquationInput,
    ) -> Result<SimplifyEquationOutput, Box<dyn Error + Send + Sync>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err("connection reset by peer".into());
        }
        Ok(SimplifyEquationOutput {
            simplified_equation: format!("simplified({})", input.equation),
            explanation: "stub".to_string(),
        })
    }
}

#[tokio::test]
async fn test_empty_input_rejected_without_calling_service() {
    let simplifier = CountingSimplifier {
        calls: AtomicUsize::new(0),
        fail: false,
    };

    for input in &["", "   ", "\n\t"] {
        let state = get_simplified_equation(&simplifier, input).await;
        assert_eq!(state.result, None);
        assert_eq!(state.error.as_deref(), Some(EMPTY_EQUATION_MESSAGE));
    }
    assert_eq!(simplifier.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_service_failure_surfaces_generic_message() {
    calcwand::init_logger();
    let simplifier = CountingSimplifier {
        calls: AtomicUsize::new(0),
        fail: true,
    };

    let state = get_simplified_equation(&simplifier, "x + x").await;
    assert_eq!(state.result, None);
    assert_eq!(state.error.as_deref(), Some(GENERIC_ERROR_MESSAGE));
    assert!(!state.error.unwrap().contains("connection reset"));
    assert_eq!(simplifier.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_success_returns_result() {
    let simplifier = CountingSimplifier {
        calls: AtomicUsize::new(0),
        fail: false,
    };

    let state = get_simplified_equation(&simplifier, "x + x").await;
    assert_eq!(state.error, None);
    assert_eq!(state.result.unwrap().simplified_equation, "simplified(x + x)");
}

#[tokio::test]
async fn test_llm_simplifier_parses_model_reply() {
    let client = Arc::new(MockClient::replying(
        r#"{"simplifiedEquation": "5x^2 - x - 22", "explanation": "Expand, then combine like terms."}"#,
    ));
    let simplifier = LlmEquationSimplifier::new(client.clone());

    let output = simplifier
        .simplify(SimplifyEquationInput::new("(2x + 5)(x - 3) + 4x^2 - 7"))
        .await
        .unwrap();

    assert_eq!(output.simplified_equation, "5x^2 - x - 22");
    assert_eq!(output.explanation, "Expand, then combine like terms.");
    assert_eq!(client.calls.load(Ordering::SeqCst), 1);

    let sent = client.last_messages.lock().unwrap().clone();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].role, Role::System);
    assert_eq!(sent[1].role, Role::User);
    assert!(sent[1].content.contains("Equation: (2x + 5)(x - 3) + 4x^2 - 7"));

    let usage = client.get_last_usage().await.unwrap();
    assert_eq!(usage.total_tokens, 20);
}

#[tokio::test]
async fn test_llm_simplifier_rejects_malformed_reply() {
    let client = Arc::new(MockClient::replying("Sure! The answer is 2x."));
    let simplifier = LlmEquationSimplifier::new(client);

    let err = simplifier
        .simplify(SimplifyEquationInput::new("x + x"))
        .await
        .unwrap_err();
    let err = err.downcast_ref::<SimplifierError>().unwrap();
    assert!(matches!(err, SimplifierError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_llm_simplifier_wraps_client_errors() {
    let client = Arc::new(MockClient::failing("401 Unauthorized"));
    let simplifier = LlmEquationSimplifier::new(client.clone());

    let err = simplifier
        .simplify(SimplifyEquationInput::new("x + x"))
        .await
        .unwrap_err();
    assert_eq!(
        err.downcast_ref::<SimplifierError>(),
        Some(&SimplifierError::Service("401 Unauthorized".to_string()))
    );

    let state = get_simplified_equation(&simplifier, "x + x").await;
    assert_eq!(state.error.as_deref(), Some(GENERIC_ERROR_MESSAGE));
    assert_eq!(client.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_llm_simplifier_skips_blank_input() {
    let client = Arc::new(MockClient::replying("{}"));
    let simplifier = LlmEquationSimplifier::new(client.clone());

    let err = simplifier
        .simplify(SimplifyEquationInput::new("  "))
        .await
        .unwrap_err();
    assert_eq!(
        err.downcast_ref::<SimplifierError>(),
        Some(&SimplifierError::EmptyEquation)
    );
    assert_eq!(client.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_concurrent_requests_are_independent() {
    let client = Arc::new(MockClient::replying(
        r#"{"simplifiedEquation": "2x", "explanation": "x + x = 2x"}"#,
    ));
    let simplifier = Arc::new(LlmEquationSimplifier::new(client.clone()));

    let mut handles = vec![];
    for _ in 0..8 {
        let s = Arc::clone(&simplifier);
        handles.push(tokio::spawn(async move {
            get_simplified_equation(s.as_ref(), "x + x").await
        }));
    }
    for handle in handles {
        let state = handle.await.unwrap();
        assert_eq!(state.result.unwrap().simplified_equation, "2x");
    }
    assert_eq!(client.calls.load(Ordering::SeqCst), 8);
}

/// Serve `503 Service Unavailable` to every request on a local port and
/// count how many arrive. Returns the base URL and the counter.
fn spawn_unavailable_server() -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let requests = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&requests);

    std::thread::spawn(move || {
        for stream in listener.incoming() {
            let mut stream = match stream {
                Ok(stream) => stream,
                Err(_) => break,
            };
            read_request(&mut stream);
            counter.fetch_add(1, Ordering::SeqCst);
            let body = r#"{"error":{"message":"overloaded"}}"#;
            let _ = write!(
                stream,
                "HTTP/1.1 503 Service Unavailable\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
        }
    });

    (base_url, requests)
}

/// Drain one HTTP request (headers plus `Content-Length` body).
fn read_request(stream: &mut std::net::TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = match stream.read(&mut chunk) {
            Ok(0) | Err(_) => return,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            let content_length = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + content_length {
                return;
            }
        }
    }
}

#[tokio::test]
async fn test_unavailable_service_is_called_once() {
    let (base_url, requests) = spawn_unavailable_server();
    let client = Arc::new(OpenAIClient::new_with_base_url("dummy", "mock-model", &base_url));
    let simplifier = LlmEquationSimplifier::new(client);

    let state = get_simplified_equation(&simplifier, "x + x").await;

    assert_eq!(state.result, None);
    assert_eq!(state.error.as_deref(), Some(GENERIC_ERROR_MESSAGE));
    assert_eq!(requests.load(Ordering::SeqCst), 1);
}
