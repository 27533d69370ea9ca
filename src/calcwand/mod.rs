// src/calcwand/mod.rs

pub mod client_wrapper;
pub mod clients;
pub mod config;
pub mod engine;
pub mod format;
pub mod simplifier;

// Let's explicitly export CalculatorEngine so we don't have to access it via calcwand::engine::CalculatorEngine
// and instead as calcwand::CalculatorEngine
pub use engine::CalculatorEngine;
pub use simplifier::LlmEquationSimplifier;
