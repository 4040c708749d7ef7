//! Common test utilities for webhook tests.

use drillkit::DrillClient;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Start a new mock server for testing.
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Create a client pointed at the mock server's deck endpoint.
pub fn client_for_mock(server: &MockServer) -> DrillClient {
    DrillClient::builder()
        .url(format!("{}/vocabulary", server.uri()))
        .credentials("learner", "secret")
        .build()
}

/// Sample webhook records.
pub fn sample_cards() -> serde_json::Value {
    serde_json::json!([
        {
            "row_number": 2,
            "spanish": "Hola",
            "english": "Hello",
            "usage": "¡Hola! ¿Cómo estás?",
            "difficulty": "easy",
            "known": true
        },
        {
            "row_number": 3,
            "spanish": "Gracias",
            "english": "Thank you",
            "usage": "Muchas gracias por tu ayuda.",
            "times_learned": 4
        }
    ])
}

/// Mount a mock for an endpoint (expect exactly 1 call).
pub async fn mock_endpoint(
    server: &MockServer,
    http_method: &str,
    endpoint: &str,
    response: ResponseTemplate,
) {
    Mock::given(method(http_method))
        .and(path(endpoint))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}
