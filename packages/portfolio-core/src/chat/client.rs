//! HTTP client for the remote reply endpoint.

use crate::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Status and decoded body of a reply endpoint response.
#[derive(Debug, Clone, PartialEq)]
pub struct RawReply {
    pub status: u16,
    /// `None` when the body was not valid JSON
    pub body: Option<Value>,
}

impl RawReply {
    pub fn new(status: u16, body: Option<Value>) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport that carries one user message to the reply service.
#[async_trait]
pub trait ReplyTransport: Send + Sync {
    /// Deliver `message` and return the raw response. Transport failures
    /// (connection, timeout) are errors; non-success statuses are not.
    async fn post_message(&self, message: &str) -> Result<RawReply>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

/// Reply transport over HTTP.
#[derive(Debug, Clone)]
pub struct HttpReplyClient {
    endpoint: String,
    client: Client,
}

impl HttpReplyClient {
    /// Create a client for `endpoint` with an optional request timeout.
    pub fn new(endpoint: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            endpoint: endpoint.to_string(),
            client: builder.build()?,
        })
    }

    /// Get the endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ReplyTransport for HttpReplyClient {
    async fn post_message(&self, message: &str) -> Result<RawReply> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ChatRequest { message })
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = match response.bytes().await {
            Ok(bytes) => serde_json::from_slice(&bytes).ok(),
            Err(e) => {
                tracing::debug!("Failed to read reply body: {}", e);
                None
            }
        };

        tracing::debug!("Reply endpoint answered {}", status);
        Ok(RawReply { status, body })
    }
}

/// How a finished request should be shown in the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// Success carrying a usable reply
    Reply(String),
    /// Success without a usable reply
    Fallback,
    /// Failure with a server-supplied message
    ServerError(String),
    /// Any other failure
    Failed,
}

impl ReplyOutcome {
    /// Classify the result of a transport call.
    pub fn from_response(response: &Result<RawReply>) -> Self {
        let raw = match response {
            Ok(raw) => raw,
            Err(_) => return ReplyOutcome::Failed,
        };

        let body = raw.body.as_ref();
        if raw.is_success() {
            return match body.and_then(|b| b.get("reply")).and_then(usable) {
                Some(reply) => ReplyOutcome::Reply(reply),
                None => ReplyOutcome::Fallback,
            };
        }

        // A present, non-null `error` decides alone; `details` only stands in
        // for a missing one
        let message = body.and_then(|b| match b.get("error") {
            Some(error) if !error.is_null() => usable(error),
            _ => b.get("details").and_then(usable),
        });
        message
            .map(ReplyOutcome::ServerError)
            .unwrap_or(ReplyOutcome::Failed)
    }
}

/// A string value whose trimmed content is non-empty.
fn usable(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use serde_json::json;

    fn ok(status: u16, body: Value) -> Result<RawReply> {
        Ok(RawReply::new(status, Some(body)))
    }

    #[test]
    fn test_success_with_reply() {
        let outcome = ReplyOutcome::from_response(&ok(200, json!({"reply": "Hello!"})));
        assert_eq!(outcome, ReplyOutcome::Reply("Hello!".to_string()));
    }

    #[test]
    fn test_success_without_reply() {
        assert_eq!(
            ReplyOutcome::from_response(&ok(200, json!({"answer": "x"}))),
            ReplyOutcome::Fallback
        );
        assert_eq!(
            ReplyOutcome::from_response(&ok(200, json!({"reply": 42}))),
            ReplyOutcome::Fallback
        );
        assert_eq!(
            ReplyOutcome::from_response(&ok(201, json!({"reply": "  "}))),
            ReplyOutcome::Fallback
        );
        assert_eq!(
            ReplyOutcome::from_response(&Ok(RawReply::new(200, None))),
            ReplyOutcome::Fallback
        );
    }

    #[test]
    fn test_failure_with_error_message() {
        assert_eq!(
            ReplyOutcome::from_response(&ok(503, json!({"error": "rate limited"}))),
            ReplyOutcome::ServerError("rate limited".to_string())
        );
        assert_eq!(
            ReplyOutcome::from_response(&ok(500, json!({"details": "model offline"}))),
            ReplyOutcome::ServerError("model offline".to_string())
        );
        // error wins over details
        assert_eq!(
            ReplyOutcome::from_response(&ok(400, json!({"error": "bad", "details": "worse"}))),
            ReplyOutcome::ServerError("bad".to_string())
        );
        // null error counts as missing
        assert_eq!(
            ReplyOutcome::from_response(&ok(400, json!({"error": null, "details": "d"}))),
            ReplyOutcome::ServerError("d".to_string())
        );
    }

    #[test]
    fn test_unusable_error_does_not_fall_back_to_details() {
        assert_eq!(
            ReplyOutcome::from_response(&ok(400, json!({"error": "  ", "details": "d"}))),
            ReplyOutcome::Failed
        );
        assert_eq!(
            ReplyOutcome::from_response(&ok(400, json!({"error": {"code": 1}, "details": "d"}))),
            ReplyOutcome::Failed
        );
    }

    #[test]
    fn test_failure_without_message() {
        assert_eq!(
            ReplyOutcome::from_response(&ok(502, json!({"reply": "ignored"}))),
            ReplyOutcome::Failed
        );
        assert_eq!(
            ReplyOutcome::from_response(&Ok(RawReply::new(500, None))),
            ReplyOutcome::Failed
        );
    }

    #[test]
    fn test_transport_error() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert_eq!(
            ReplyOutcome::from_response(&Err(Error::Io(io))),
            ReplyOutcome::Failed
        );
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(ChatRequest { message: "hi there" }).unwrap();
        assert_eq!(body, json!({"message": "hi there"}));
    }

    #[test]
    fn test_client_keeps_endpoint() {
        let client =
            HttpReplyClient::new("http://127.0.0.1:9/api/chat", Some(Duration::from_secs(5)))
                .unwrap();
        assert_eq!(client.endpoint(), "http://127.0.0.1:9/api/chat");
    }
}
