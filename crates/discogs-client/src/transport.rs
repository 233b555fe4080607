//! Blocking HTTP transport.
//!
//! The client only needs "GET this URL with these headers and give me the
//! status and body". Keeping that behind a trait lets the retry loop be
//! driven by scripted responses in tests.

use std::time::Duration;
use thiserror::Error;

/// Status line and body of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// The request never produced a complete response (DNS, connect, TLS,
/// timeout, broken body stream)
#[derive(Error, Debug)]
#[error("{message}")]
pub struct TransportError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Performs blocking GET requests
pub trait HttpTransport {
    /// Send a GET request. Any status code, including 4xx/5xx, is a
    /// successful exchange; only transport-level failures are errors.
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, TransportError>;
}

/// `HttpTransport` backed by a shared `ureq::Agent`
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(connect_timeout: Duration, read_timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(connect_timeout)
            .timeout_read(read_timeout)
            .build();
        Self { agent }
    }
}

impl HttpTransport for UreqTransport {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, TransportError> {
        let request = headers
            .iter()
            .fold(self.agent.get(url), |request, (name, value)| {
                request.set(name, value)
            });

        match request.call() {
            Ok(response) => read_response(response),
            // ureq reports 4xx/5xx as errors, the client wants them as responses
            Err(ureq::Error::Status(_, response)) => read_response(response),
            Err(ureq::Error::Transport(transport)) => Err(TransportError::with_source(
                format!("Request failed: {}", transport),
                transport,
            )),
        }
    }
}

fn read_response(response: ureq::Response) -> Result<HttpResponse, TransportError> {
    let status = response.status();
    let body = response
        .into_string()
        .map_err(|e| TransportError::with_source(format!("Failed to read response: {}", e), e))?;
    Ok(HttpResponse { status, body })
}
