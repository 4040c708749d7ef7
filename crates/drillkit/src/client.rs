//! The webhook client and builder.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::actions::{CardActions, MasteryActions};
use crate::error::{Error, Result};

/// Default webhook URL.
const DEFAULT_URL: &str = "http://127.0.0.1:5678/webhook/vocabulary/spanish";

/// Default timeout for requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// The main client for the vocabulary webhook.
///
/// # Example
///
/// ```no_run
/// use drillkit::DrillClient;
///
/// # async fn example() -> drillkit::Result<()> {
/// let client = DrillClient::new();
/// let cards = client.cards().list().await?;
/// println!("{} cards", cards.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DrillClient {
    http_client: Client,
    base_url: String,
    credentials: Option<(String, String)>,
}

impl DrillClient {
    /// Create a new client with default settings.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a builder for custom client configuration.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Access deck operations.
    pub fn cards(&self) -> CardActions<'_> {
        CardActions { client: self }
    }

    /// Access mastery update operations.
    pub fn mastery(&self) -> MasteryActions<'_> {
        MasteryActions { client: self }
    }

    /// The configured base URL.
    pub fn url(&self) -> &str {
        &self.base_url
    }

    /// Build the full URL for an endpoint below the base URL.
    fn endpoint(&self, suffix: &str) -> Result<String> {
        let base = self.base_url.trim_end_matches('/');
        if base.is_empty() {
            return Err(Error::Config("webhook URL is not set".to_string()));
        }
        if suffix.is_empty() {
            Ok(base.to_string())
        } else {
            Ok(format!("{}/{}", base, suffix))
        }
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some((username, password)) => request.basic_auth(username, Some(password)),
            None => request,
        }
    }

    /// GET an endpoint and decode the JSON body.
    pub(crate) async fn get_json<R>(&self, action: &'static str, suffix: &str) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let url = self.endpoint(suffix)?;
        debug!(action, url = %url, "Sending request");

        let response = self
            .authorize(self.http_client.get(&url))
            .send()
            .await
            .map_err(map_send_error)?;

        let response = check_status(action, response)?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// POST a JSON body to an endpoint, ignoring whatever the webhook answers.
    pub(crate) async fn post_json<P>(&self, action: &'static str, suffix: &str, body: &P) -> Result<()>
    where
        P: Serialize + ?Sized,
    {
        let url = self.endpoint(suffix)?;
        debug!(action, url = %url, "Sending request");

        let response = self
            .authorize(self.http_client.post(&url))
            .json(body)
            .send()
            .await
            .map_err(map_send_error)?;

        check_status(action, response)?;
        Ok(())
    }
}

impl Default for DrillClient {
    fn default() -> Self {
        Self::new()
    }
}

fn map_send_error(e: reqwest::Error) -> Error {
    if e.is_connect() {
        Error::ConnectionRefused
    } else {
        Error::Http(e)
    }
}

fn check_status(action: &'static str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(Error::Status {
            action,
            status: status.as_u16(),
        })
    }
}

/// Builder for creating a customized [`DrillClient`].
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use drillkit::ClientBuilder;
///
/// let client = ClientBuilder::new()
///     .url("http://localhost:5678/webhook/vocabulary/spanish")
///     .credentials("learner", "secret")
///     .timeout(Duration::from_secs(10))
///     .build();
/// assert_eq!(client.url(), "http://localhost:5678/webhook/vocabulary/spanish");
/// ```
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    base_url: String,
    username: Option<String>,
    password: Option<String>,
    timeout: Duration,
}

impl ClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_URL.to_string(),
            username: None,
            password: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the webhook URL that serves the deck.
    ///
    /// Mastery updates are posted to `{url}/update`.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set HTTP Basic credentials.
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set the username only. Credentials are used when both halves are present.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set the password only. Credentials are used when both halves are present.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set the request timeout.
    ///
    /// Defaults to 30 seconds.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = duration;
        self
    }

    /// Build the client.
    pub fn build(self) -> DrillClient {
        let http_client = Client::builder()
            .timeout(self.timeout)
            .build()
            .expect("Failed to build HTTP client");

        let credentials = match (self.username, self.password) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Some((user, pass)),
            _ => {
                warn!("Webhook credentials not configured, sending unauthenticated requests");
                None
            }
        };

        DrillClient {
            http_client,
            base_url: self.base_url,
            credentials,
        }
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
