//! Example demonstrating the equation simplifier end to end.
//!
//! Run with an API key for the configured provider:
//!
//! ```text
//! OPEN_AI_SECRET=... cargo run --example simplify_equation -- "3(x + 2) - 2(x - 1)"
//! CALCWAND_PROVIDER=gemini GEMINI_API_KEY=... cargo run --example simplify_equation
//! ```

use calcwand::simplifier::get_simplified_equation;
use calcwand::{ClientWrapper, LlmEquationSimplifier, SimplifierConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    calcwand::init_logger();

    let equation = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "(2x + 5)(x - 3) + 4x^2 - 7".to_string());

    let config = SimplifierConfig::from_env()?;
    let client = config.build_client()?;
    let simplifier = LlmEquationSimplifier::new(client.clone());

    println!("=== calcwand Equation Simplifier ({}) ===\n", client.model_name());
    println!("Equation: {}\n", equation);

    let state = get_simplified_equation(&simplifier, &equation).await;
    match (state.result, state.error) {
        (Some(result), _) => {
            println!("Simplified: {}\n", result.simplified_equation);
            println!("Explanation:\n{}", result.explanation);
        }
        (None, Some(error)) => println!("Error: {}", error),
        (None, None) => {}
    }

    if let Some(usage) = client.get_last_usage().await {
        println!(
            "\nTokens: input: {}, output: {}, total: {}",
            usage.input_tokens, usage.output_tokens, usage.total_tokens
        );
    }
    Ok(())
}
