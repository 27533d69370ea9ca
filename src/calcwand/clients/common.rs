//! Helpers shared by the OpenAI-compatible clients.
//!
//! All clients reuse a single `reqwest::Client` so repeated simplification
//! requests keep their connections (and TLS sessions) alive:
//! - `pool_idle_timeout`: keeps idle connections alive for 90 seconds
//! - `pool_max_idle_per_host`: allows up to 10 idle connections per host
//! - `tcp_keepalive`: sends keepalive packets every 60 seconds

use crate::client_wrapper::{Message, TokenUsage};
use lazy_static::lazy_static;
use openai_rust::chat;
use openai_rust2 as openai_rust;
use std::error::Error;
use std::time::Duration;
use tokio::sync::Mutex;

lazy_static! {
    static ref SHARED_HTTP_CLIENT: reqwest::Client = reqwest::ClientBuilder::new()
        .pool_idle_timeout(Some(Duration::from_secs(90)))
        .pool_max_idle_per_host(10)
        .tcp_keepalive(Some(Duration::from_secs(60)))
        .build()
        .unwrap_or_else(|err| {
            log::error!(
                "calcwand::clients::common: failed to build pooled HTTP client ({}), using defaults",
                err
            );
            reqwest::Client::new()
        });
}

/// The process-wide HTTP client every provider client is built on.
pub fn get_shared_http_client() -> &'static reqwest::Client {
    &SHARED_HTTP_CLIENT
}

/// Convert calcwand messages into the wire format expected by `openai_rust`.
pub fn to_chat_messages(messages: &[Message]) -> Vec<chat::Message> {
    messages
        .iter()
        .map(|msg| chat::Message {
            role: msg.role.as_str().to_owned(),
            content: msg.content.clone(),
        })
        .collect()
}

/// Send a chat request, record its usage, and return the assistant’s content.
pub async fn send_and_track(
    api: &openai_rust::Client,
    model: &str,
    formatted_msgs: Vec<chat::Message>,
    url_path: Option<String>,
    usage_slot: &Mutex<Option<TokenUsage>>,
) -> Result<String, Box<dyn Error>> {
    let chat_arguments = chat::ChatArguments::new(model, formatted_msgs);

    let response = api.create_chat(chat_arguments, url_path).await;

    match response {
        Ok(response) => {
            let usage = TokenUsage {
                input_tokens: response.usage.prompt_tokens as usize,
                output_tokens: response.usage.completion_tokens as usize,
                total_tokens: response.usage.total_tokens as usize,
            };

            // Store it for get_last_usage()
            *usage_slot.lock().await = Some(usage);

            match response.choices.first() {
                Some(choice) => Ok(choice.message.content.clone()),
                None => Err("LLM response contained no choices".into()),
            }
        }
        Err(err) => {
            log::error!(
                "calcwand::clients::common::send_and_track(...): API Error: {}",
                err
            );
            Err(err.into())
        }
    }
}
