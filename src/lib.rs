//! # calcwand
//!
//! calcwand is a small calculator toolkit: a keystroke-driven arithmetic engine plus an
//! "explain and simplify this equation" helper backed by a remote Large Language Model.
//!
//! The crate provides:
//!
//! * **Calculator Engine**: [`CalculatorEngine`] consumes button actions ([`engine::Key`]) and
//!   keeps the display string, the pending operand/operator and the deferred-evaluation state
//! * **Display Formatting**: [`format`] renders results the way users expect from web
//!   calculators (`"8"`, `"0.30000000000000004"`, `"Infinity"`, `"1e+21"`)
//! * **Equation Simplifier**: [`simplifier::EquationSimplifier`] capability with an LLM-backed
//!   implementation and a validating front-end action
//! * **Provider Flexibility**: [`ClientWrapper`] trait implemented for OpenAI and Google Gemini
//!
//! ## Calculator
//!
//! ```rust
//! use calcwand::CalculatorEngine;
//! use calcwand::engine::Key;
//!
//! let mut calc = CalculatorEngine::new();
//! for label in ["1", "2", "*", "3", "="] {
//!     calc.press(label.parse::<Key>().unwrap());
//! }
//! assert_eq!(calc.display(), "36");
//! ```
//!
//! ## Equation Simplifier
//!
//! The remote model is reached through any [`ClientWrapper`]; the simplifier itself is a
//! trait object so UI code can be tested with a fake.
//!
//! ```rust,no_run
//! use calcwand::config::SimplifierConfig;
//! use calcwand::simplifier::{get_simplified_equation, LlmEquationSimplifier};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     calcwand::init_logger();
//!
//!     let config = SimplifierConfig::from_env()?;
//!     let simplifier = LlmEquationSimplifier::new(config.build_client()?);
//!
//!     let state = get_simplified_equation(&simplifier, "3(x + 2) - 2(x - 1)").await;
//!     if let Some(result) = state.result {
//!         println!("{}", result.simplified_equation);
//!         println!("{}", result.explanation);
//!     } else if let Some(error) = state.error {
//!         eprintln!("{}", error);
//!     }
//!     Ok(())
//! }
//! ```

use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Initialise the global [`env_logger`] subscriber exactly once.
///
/// Applications embedding calcwand can opt-in to simple `RUST_LOG` driven diagnostics
/// without having to choose a specific logging backend upfront.
///
/// ```rust
/// calcwand::init_logger();
/// log::info!("Logger is ready");
/// ```
pub fn init_logger() {
    INIT_LOGGER.call_once(|| {
        env_logger::init();
    });
}

// Import the top-level `calcwand` module.
pub mod calcwand;

// Re-exporting key items for easier external access.
pub use calcwand::client_wrapper;
pub use calcwand::client_wrapper::{ClientWrapper, Message, Role, TokenUsage};
pub use calcwand::clients;
pub use calcwand::config;
pub use calcwand::config::SimplifierConfig;
pub use calcwand::engine;
pub use calcwand::engine::CalculatorEngine;
pub use calcwand::format;
pub use calcwand::simplifier;
pub use calcwand::simplifier::{EquationSimplifier, LlmEquationSimplifier};
