use std::io::{self, BufRead, Write};

use tokio::sync::watch;
use tokio::time::{sleep, Duration};

use calcwand::engine::Key;
use calcwand::simplifier::get_simplified_equation;
use calcwand::{CalculatorEngine, LlmEquationSimplifier, SimplifierConfig};

// Run from the root folder of the repo as follows:
// OPEN_AI_SECRET=your-open-ai-key-here cargo run --example interactive_calculator
//
// Type button labels separated by spaces, e.g. `5 + 3 = =`, or
// `simplify (2x + 5)(x - 3) + 4x^2 - 7`. An empty line quits.

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    calcwand::init_logger();

    let simplifier = match SimplifierConfig::from_env().and_then(|config| config.build_client()) {
        Ok(client) => Some(LlmEquationSimplifier::new(client)),
        Err(err) => {
            println!("{} (the simplifier is disabled)", err);
            None
        }
    };

    let mut calc = CalculatorEngine::new();
    println!("keys: 0-9 . +/- % sin cos tan / * - + = AC");
    println!("[{}]", calc.display());

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            break;
        }

        if let Some(equation) = line.strip_prefix("simplify") {
            match &simplifier {
                Some(simplifier) => {
                    let (tx, rx) = watch::channel(true);
                    tokio::spawn(display_waiting_dots(rx, 3));
                    let state = get_simplified_equation(simplifier, equation).await;
                    let _ = tx.send(false);

                    if let Some(result) = state.result {
                        println!("\nSimplified: {}\n\n{}\n", result.simplified_equation, result.explanation);
                    } else if let Some(error) = state.error {
                        println!("\nError: {}\n", error);
                    }
                }
                None => println!("The simplifier is not configured."),
            }
            continue;
        }

        for label in line.split_whitespace() {
            match label.parse::<Key>() {
                Ok(key) => calc.press(key),
                Err(err) => println!("{}", err),
            }
        }
        println!("[{}]", calc.display());
    }

    Ok(())
}

async fn display_waiting_dots(rx: watch::Receiver<bool>, num_dots: usize) {
    let mut loading = true;
    while loading {
        for _ in 0..num_dots {
            if !*rx.borrow() {
                break;
            }
            print!(".");
            let _ = io::stdout().flush();
            sleep(Duration::from_millis(500)).await;
        }
        print!("\r{}\r", " ".repeat(num_dots));
        let _ = io::stdout().flush();
        loading = *rx.borrow();
    }
}
