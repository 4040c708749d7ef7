//! Common test utilities for drillkit-engine tests.

use drillkit_engine::{Card, Deck, Difficulty, Engine};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Start a new mock server for testing.
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Create an Engine connected to the mock server's deck endpoint.
pub fn engine_for_mock(server: &MockServer) -> Engine {
    let client = drillkit_engine::ClientBuilder::new()
        .url(format!("{}/vocabulary", server.uri()))
        .credentials("learner", "secret")
        .build();
    Engine::from_client(client)
}

/// Webhook records for a small deck.
#[allow(dead_code)]
pub fn sample_records() -> serde_json::Value {
    serde_json::json!([
        {
            "row_number": 2,
            "spanish": "Hola",
            "english": "Hello",
            "usage": "¡Hola! ¿Cómo estás?",
            "difficulty": "easy"
        },
        {
            "row_number": 3,
            "spanish": "Gracias",
            "english": "Thank you",
            "usage": "Muchas gracias por tu ayuda.",
            "difficulty": "easy",
            "known": false,
            "times_learned": 1
        },
        {
            "row_number": 4,
            "spanish": "Por favor",
            "english": "Please",
            "usage": "Ayúdame, por favor.",
            "known": true
        }
    ])
}

/// Mount a mock for an endpoint with expected call count.
pub async fn mock_endpoint_times(
    server: &MockServer,
    http_method: &str,
    endpoint: &str,
    response: ResponseTemplate,
    times: u64,
) {
    Mock::given(method(http_method))
        .and(path(endpoint))
        .respond_with(response)
        .expect(times)
        .mount(server)
        .await;
}

/// Mount a mock for an endpoint (expect exactly 1 call).
#[allow(dead_code)]
pub async fn mock_endpoint(
    server: &MockServer,
    http_method: &str,
    endpoint: &str,
    response: ResponseTemplate,
) {
    mock_endpoint_times(server, http_method, endpoint, response, 1).await;
}

/// A deck of `n` easy cards keyed 1..=n.
#[allow(dead_code)]
pub fn numbered_deck(n: i64) -> Deck {
    Deck::new(
        (1..=n)
            .map(|k| {
                Card::new(k, format!("palabra{}", k), format!("word {}", k), "")
                    .with_difficulty(Difficulty::Easy)
            })
            .collect(),
    )
    .unwrap()
}
