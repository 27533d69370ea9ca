//! # Equation Simplifier
//!
//! Forwards free-text equations to a language model and returns its simplified
//! form together with an explanation.
//!
//! The remote call sits behind the [`EquationSimplifier`] trait so callers can
//! inject a fake in tests. [`LlmEquationSimplifier`] is the production
//! implementation built on any [`ClientWrapper`]; [`get_simplified_equation`]
//! is the front-end action that validates input and turns failures into a
//! single user-facing message.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use calcwand::clients::openai::{Model, OpenAIClient};
//! use calcwand::simplifier::{get_simplified_equation, LlmEquationSimplifier};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OpenAIClient::new_with_model_enum(&std::env::var("OPEN_AI_SECRET")?, Model::GPT41Nano);
//!     let simplifier = LlmEquationSimplifier::new(Arc::new(client));
//!
//!     let state = get_simplified_equation(&simplifier, "(2x + 5)(x - 3) + 4x^2 - 7").await;
//!     match (state.result, state.error) {
//!         (Some(out), _) => println!("{}\n\n{}", out.simplified_equation, out.explanation),
//!         (_, Some(err)) => eprintln!("{}", err),
//!         _ => {}
//!     }
//!     Ok(())
//! }
//! ```

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client_wrapper::{ClientWrapper, Message, Role};

/// Message shown when the equation field is blank.
pub const EMPTY_EQUATION_MESSAGE: &str = "Equation cannot be empty.";

/// Message shown for every remote failure; the cause is only logged.
pub const GENERIC_ERROR_MESSAGE: &str =
    "An unexpected error occurred while simplifying the equation. Please try again.";

const PROMPT_TEMPLATE: &str = "You are an expert mathematician skilled at simplifying complex equations.

Given the following equation, provide a simplified version and explain the steps taken to simplify it.

Equation: {{equation}}
";

const OUTPUT_INSTRUCTIONS: &str = "Respond only with a JSON object of the form \
{\"simplifiedEquation\": string, \"explanation\": string}. \
\"simplifiedEquation\" is the simplified version of the equation. \
\"explanation\" is an explanation of the simplifications made. \
Do not add any other text.";

/// Input of a simplification request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplifyEquationInput {
    /// The complex equation to simplify.
    pub equation: String,
}

impl SimplifyEquationInput {
    pub fn new(equation: impl Into<String>) -> Self {
        SimplifyEquationInput {
            equation: equation.into(),
        }
    }

    /// The prompt sent to the model for this equation.
    pub fn render_prompt(&self) -> String {
        PROMPT_TEMPLATE.replace("{{equation}}", &self.equation)
    }
}

/// Structured answer of a simplification request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifyEquationOutput {
    /// The simplified version of the equation.
    pub simplified_equation: String,
    /// An explanation of the simplifications made.
    pub explanation: String,
}

/// Errors produced while simplifying an equation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimplifierError {
    /// The equation was blank after trimming.
    EmptyEquation,
    /// The remote service call failed.
    Service(String),
    /// The service answered, but not with the expected schema.
    InvalidResponse(String),
}

impl fmt::Display for SimplifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimplifierError::EmptyEquation => write!(f, "{}", EMPTY_EQUATION_MESSAGE),
            SimplifierError::Service(msg) => write!(f, "Simplifier service error: {}", msg),
            SimplifierError::InvalidResponse(msg) => {
                write!(f, "Simplifier returned an invalid response: {}", msg)
            }
        }
    }
}

impl Error for SimplifierError {}

/// Capability that turns an equation into its simplified form.
#[async_trait]
pub trait EquationSimplifier: Send + Sync {
    async fn simplify(
        &self,
        input: SimplifyEquationInput,
    ) -> Result<SimplifyEquationOutput, Box<dyn Error + Send + Sync>>;
}

/// [`EquationSimplifier`] that asks a language model through a [`ClientWrapper`].
///
/// Each call is a single request with no retry; the reply must be a JSON object
/// matching [`SimplifyEquationOutput`].
pub struct LlmEquationSimplifier {
    client: Arc<dyn ClientWrapper>,
}

impl LlmEquationSimplifier {
    pub fn new(client: Arc<dyn ClientWrapper>) -> Self {
        LlmEquationSimplifier { client }
    }

    pub fn client(&self) -> &Arc<dyn ClientWrapper> {
        &self.client
    }

    fn build_messages(input: &SimplifyEquationInput) -> Vec<Message> {
        vec![
            Message::new(Role::System, OUTPUT_INSTRUCTIONS),
            Message::new(Role::User, input.render_prompt()),
        ]
    }
}

#[async_trait]
impl EquationSimplifier for LlmEquationSimplifier {
    async fn simplify(
        &self,
        input: SimplifyEquationInput,
    ) -> Result<SimplifyEquationOutput, Box<dyn Error + Send + Sync>> {
        if input.equation.trim().is_empty() {
            return Err(Box::new(SimplifierError::EmptyEquation));
        }

        let messages = Self::build_messages(&input);
        log::debug!(
            "LlmEquationSimplifier::simplify(...): sending equation to {}",
            self.client.model_name()
        );

        let reply = match self.client.send_message(&messages).await {
            Ok(reply) => reply,
            Err(err) => return Err(Box::new(SimplifierError::Service(err.to_string()))),
        };

        let output = parse_output(&reply.content)?;
        Ok(output)
    }
}

/// Parse and validate a model reply against the output schema.
///
/// A surrounding Markdown code fence (```` ```json ... ``` ````) is tolerated.
pub fn parse_output(content: &str) -> Result<SimplifyEquationOutput, SimplifierError> {
    let body = strip_code_fence(content);
    let output: SimplifyEquationOutput = serde_json::from_str(body)
        .map_err(|e| SimplifierError::InvalidResponse(e.to_string()))?;

    if output.simplified_equation.trim().is_empty() {
        return Err(SimplifierError::InvalidResponse(
            "simplifiedEquation is empty".to_string(),
        ));
    }
    Ok(output)
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let inner = match trimmed.strip_prefix("```") {
        Some(rest) => rest,
        None => return trimmed,
    };
    // Drop the info string ("json") on the opening fence line.
    let inner = match inner.find('\n') {
        Some(pos) => &inner[pos + 1..],
        None => inner,
    };
    inner.trim_end().trim_end_matches("```").trim()
}

/// Outcome of one simplification attempt, as the front-end renders it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EquationSimplifierState {
    pub result: Option<SimplifyEquationOutput>,
    pub error: Option<String>,
}

impl EquationSimplifierState {
    /// Forget the last outcome, e.g. when the simplifier panel is closed.
    pub fn reset(&mut self) {
        self.result = None;
        self.error = None;
    }
}

/// Validate `equation` and run it through `simplifier`.
///
/// Blank input is rejected with [`EMPTY_EQUATION_MESSAGE`] without touching
/// the service. Any service failure is logged and reported as
/// [`GENERIC_ERROR_MESSAGE`].
pub async fn get_simplified_equation(
    simplifier: &dyn EquationSimplifier,
    equation: &str,
) -> EquationSimplifierState {
    if equation.trim().is_empty() {
        return EquationSimplifierState {
            result: None,
            error: Some(EMPTY_EQUATION_MESSAGE.to_string()),
        };
    }

    match simplifier
        .simplify(SimplifyEquationInput::new(equation))
        .await
    {
        Ok(result) => EquationSimplifierState {
            result: Some(result),
            error: None,
        },
        Err(err) => {
            log::error!("get_simplified_equation(...): {}", err);
            EquationSimplifierState {
                result: None,
                error: Some(GENERIC_ERROR_MESSAGE.to_string()),
            }
        }
    }
}
