//! Remote window-title classifier.
//!
//! The endpoint is any chat-completion style HTTP API: we POST a single user
//! message and read `choices[0].message.content`. A reply of `X` (after trim
//! and upper-casing) means the title is a distraction; anything else means
//! on task.

use crate::libs::config::ClassifierConfig;
use crate::libs::messages::Message;
use crate::msg_debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("classifier endpoint is not configured")]
    EndpointNotSet,
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("response has no choices")]
    EmptyReply,
}

/// Decides whether a window title is a distraction.
#[allow(async_fn_in_trait)]
pub trait Classifier {
    async fn is_distracting(&self, title: &str) -> Result<bool, ClassifierError>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: String,
}

/// Prompt sent for every title.
pub fn build_prompt(title: &str) -> String {
    format!(
        "A user is trying to stay focused on work or study. \
         Decide whether the window they just switched to is a distraction. \
         Social media, video streaming, games, shopping and entertainment news are distractions; \
         documentation, code editors, terminals, learning material and work tools are not. \
         Reply with a single character: X if it is a distraction, O if it is not.\n\
         Title: \"{}\"",
        title
    )
}

/// `true` when the reply is exactly `X` after trimming, case-insensitively.
pub fn is_distracting_reply(reply: &str) -> bool {
    reply.trim().to_uppercase() == "X"
}

pub struct HttpClassifier {
    client: Client,
    endpoint: Option<String>,
}

impl HttpClassifier {
    pub fn new(config: &ClassifierConfig) -> Result<Self, ClassifierError> {
        let client = Client::builder().timeout(Duration::from_secs(config.timeout_secs)).build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    async fn ask(&self, endpoint: &str, title: &str) -> Result<String, ClassifierError> {
        let request = ChatRequest {
            messages: vec![ChatMessage {
                role: "user",
                content: build_prompt(title),
            }],
        };
        let response: ChatResponse = self
            .client
            .post(endpoint)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(ClassifierError::EmptyReply)
    }
}

impl Classifier for HttpClassifier {
    async fn is_distracting(&self, title: &str) -> Result<bool, ClassifierError> {
        let endpoint = self.endpoint.as_deref().ok_or(ClassifierError::EndpointNotSet)?;
        let reply = self.ask(endpoint, title).await?;
        msg_debug!(Message::ClassifierVerdict(title.to_string(), reply.trim().to_string()));
        Ok(is_distracting_reply(&reply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_must_be_exactly_x() {
        assert!(is_distracting_reply("X"));
        assert!(is_distracting_reply("  x\n"));
        assert!(!is_distracting_reply("O"));
        assert!(!is_distracting_reply("X - this is YouTube"));
        assert!(!is_distracting_reply(""));
    }

    #[test]
    fn prompt_embeds_title() {
        let prompt = build_prompt("Inbox (3) - Gmail");
        assert!(prompt.contains("Title: \"Inbox (3) - Gmail\""));
    }

    #[test]
    fn request_body_shape() {
        let request = ChatRequest {
            messages: vec![ChatMessage {
                role: "user",
                content: "hi".to_string(),
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({"messages": [{"role": "user", "content": "hi"}]}));
    }

    #[test]
    fn response_parsing() {
        let body = r#"{"id":"1","choices":[{"index":0,"message":{"role":"assistant","content":" X "}}]}"#;
        let response: ChatResponse = serde_json::from_str(body).unwrap();
        assert!(is_distracting_reply(&response.choices[0].message.content));
    }

    #[tokio::test]
    async fn missing_endpoint_is_an_error() {
        let classifier = HttpClassifier::new(&ClassifierConfig {
            endpoint: None,
            timeout_secs: 1,
        })
        .unwrap();
        assert!(matches!(
            classifier.is_distracting("anything").await,
            Err(ClassifierError::EndpointNotSet)
        ));
    }
}
