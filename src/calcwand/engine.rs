//! # Calculator Engine
//!
//! A keystroke-driven calculator that evaluates one binary operator at a time.
//!
//! The engine owns a single [`CalculatorState`] and mutates it in response to
//! button actions. Binary operators use deferred evaluation: pressing `+`
//! only records the pending operation, which is computed once the next
//! operator (or `=`) arrives.
//!
//! ## Quick Start
//!
//! ```rust
//! use calcwand::engine::{CalculatorEngine, Key, Operator};
//!
//! let mut calc = CalculatorEngine::new();
//! for label in ["5", "+", "3", "="] {
//!     calc.press(label.parse::<Key>().unwrap());
//! }
//! assert_eq!(calc.display(), "8");
//!
//! // Pressing "=" again repeats the last step (8 + 3).
//! calc.apply_binary_operator(Operator::Equals);
//! assert_eq!(calc.display(), "11");
//! ```
//!
//! ## Trigonometry
//!
//! `sin`, `cos` and `tan` interpret the displayed value in **degrees**:
//!
//! ```rust
//! use calcwand::engine::{CalculatorEngine, Digit, TrigFunction};
//!
//! let mut calc = CalculatorEngine::new();
//! calc.enter_digit(Digit::new(9).unwrap());
//! calc.enter_digit(Digit::new(0).unwrap());
//! calc.apply_unary_function(TrigFunction::Sin);
//! assert_eq!(calc.display(), "1");
//! ```

use std::convert::TryFrom;
use std::error::Error;
use std::fmt;
use std::str::FromStr;

use crate::calcwand::format::{
    format_number, fractional_part, parse_number, truncate_number, MAX_DISPLAY_LEN,
};

/// Error returned when a value outside `0..=9` is used as a digit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitError {
    value: u32,
}

impl fmt::Display for DigitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is not a decimal digit", self.value)
    }
}

impl Error for DigitError {}

/// A single decimal digit, `0` through `9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digit(u8);

impl Digit {
    /// Returns `None` for values above 9.
    pub fn new(value: u8) -> Option<Self> {
        if value <= 9 {
            Some(Digit(value))
        } else {
            None
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn as_char(self) -> char {
        (b'0' + self.0) as char
    }
}

impl TryFrom<char> for Digit {
    type Error = DigitError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        c.to_digit(10)
            .map(|d| Digit(d as u8))
            .ok_or(DigitError { value: c as u32 })
    }
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The closed set of binary operators, including `=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Divide,
    Multiply,
    Add,
    Subtract,
    /// Yields its second operand, so `=` after `=` keeps the displayed value.
    Equals,
}

impl Operator {
    /// Evaluate `first <op> second` in IEEE-754 double precision.
    pub fn apply(self, first: f64, second: f64) -> f64 {
        match self {
            Operator::Divide => first / second,
            Operator::Multiply => first * second,
            Operator::Add => first + second,
            Operator::Subtract => first - second,
            Operator::Equals => second,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Divide => "/",
            Operator::Multiply => "*",
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Equals => "=",
        }
    }
}

/// Unary trigonometric functions; input is in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrigFunction {
    Sin,
    Cos,
    Tan,
}

impl TrigFunction {
    /// Apply the function to an angle given in degrees.
    pub fn apply_degrees(self, degrees: f64) -> f64 {
        let radians = degrees * (std::f64::consts::PI / 180.0);
        match self {
            TrigFunction::Sin => radians.sin(),
            TrigFunction::Cos => radians.cos(),
            TrigFunction::Tan => radians.tan(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TrigFunction::Sin => "sin",
            TrigFunction::Cos => "cos",
            TrigFunction::Tan => "tan",
        }
    }
}

/// One button on the calculator keypad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Digit(Digit),
    DecimalPoint,
    ToggleSign,
    Percent,
    Trig(TrigFunction),
    Operator(Operator),
    Clear,
}

/// Error returned by [`Key::from_str`] for labels that are not on the keypad.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyParseError {
    label: String,
}

impl fmt::Display for KeyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown calculator key: {:?}", self.label)
    }
}

impl Error for KeyParseError {}

impl FromStr for Key {
    type Err = KeyParseError;

    /// Parse a button label such as `"7"`, `"."`, `"+/-"`, `"%"`, `"sin"`,
    /// `"*"` / `"x"`, `"="` or `"AC"`.
    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let label = label.trim();
        let key = match label.to_ascii_lowercase().as_str() {
            "." => Key::DecimalPoint,
            "+/-" | "±" | "neg" => Key::ToggleSign,
            "%" => Key::Percent,
            "sin" => Key::Trig(TrigFunction::Sin),
            "cos" => Key::Trig(TrigFunction::Cos),
            "tan" => Key::Trig(TrigFunction::Tan),
            "/" | "÷" => Key::Operator(Operator::Divide),
            "*" | "x" | "×" => Key::Operator(Operator::Multiply),
            "+" => Key::Operator(Operator::Add),
            "-" => Key::Operator(Operator::Subtract),
            "=" => Key::Operator(Operator::Equals),
            "ac" | "c" | "clear" => Key::Clear,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Digit(Digit::try_from(c).map_err(|_| {
                        KeyParseError {
                            label: label.to_string(),
                        }
                    })?),
                    _ => {
                        return Err(KeyParseError {
                            label: label.to_string(),
                        })
                    }
                }
            }
        };
        Ok(key)
    }
}

/// The mutable record behind the display.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorState {
    /// Current entry or result as shown to the user.
    pub display: String,
    /// Left-hand operand of the pending operation.
    pub first_operand: Option<f64>,
    pub operator: Option<Operator>,
    /// Set right after an operator is chosen, cleared by the next digit or point.
    pub awaiting_second_operand: bool,
}

impl Default for CalculatorState {
    fn default() -> Self {
        CalculatorState {
            display: "0".to_string(),
            first_operand: None,
            operator: None,
            awaiting_second_operand: false,
        }
    }
}

/// Keystroke-driven calculator state machine.
///
/// One engine serves one user session; it is synchronous and not shared.
#[derive(Debug, Clone, Default)]
pub struct CalculatorEngine {
    state: CalculatorState,
    // Last completed arithmetic step, replayed by repeated "=".
    repeat: Option<(Operator, f64)>,
}

impl CalculatorEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn display(&self) -> &str {
        &self.state.display
    }

    pub fn state(&self) -> &CalculatorState {
        &self.state
    }

    pub fn first_operand(&self) -> Option<f64> {
        self.state.first_operand
    }

    pub fn operator(&self) -> Option<Operator> {
        self.state.operator
    }

    pub fn awaiting_second_operand(&self) -> bool {
        self.state.awaiting_second_operand
    }

    /// Numeric value of the display.
    pub fn value(&self) -> f64 {
        parse_number(&self.state.display)
    }

    /// Dispatch a single button press.
    pub fn press(&mut self, key: Key) {
        log::trace!("CalculatorEngine::press({:?})", key);
        match key {
            Key::Digit(d) => self.enter_digit(d),
            Key::DecimalPoint => self.enter_decimal_point(),
            Key::ToggleSign => self.toggle_sign(),
            Key::Percent => self.apply_percent(),
            Key::Trig(f) => self.apply_unary_function(f),
            Key::Operator(op) => self.apply_binary_operator(op),
            Key::Clear => self.clear_all(),
        }
    }

    pub fn enter_digit(&mut self, digit: Digit) {
        if self.state.awaiting_second_operand {
            self.state.display = digit.to_string();
            self.state.awaiting_second_operand = false;
        } else if self.state.display == "0" {
            self.state.display = digit.to_string();
        } else {
            self.state.display.push(digit.as_char());
        }
    }

    /// Append a decimal point unless the display already has one.
    ///
    /// The point extends whatever is displayed, even right after an operator.
    pub fn enter_decimal_point(&mut self) {
        if self.state.display.contains('.') {
            return;
        }
        self.state.display.push('.');
        self.state.awaiting_second_operand = false;
    }

    pub fn toggle_sign(&mut self) {
        self.state.display = format_number(-self.value());
    }

    /// Divide the displayed value by 100, keeping the result within the
    /// display width minus the fractional digits already shown.
    pub fn apply_percent(&mut self) {
        let current = self.value();
        if current == 0.0 {
            return;
        }
        let fixed_digits = fractional_part(&self.state.display).chars().count() as isize;
        let limit = MAX_DISPLAY_LEN as isize - fixed_digits;
        self.state.display = truncate_number(&format_number(current / 100.0), limit);
    }

    pub fn apply_unary_function(&mut self, function: TrigFunction) {
        let result = function.apply_degrees(self.value());
        log::debug!(
            "CalculatorEngine: {}({}) = {}",
            function.name(),
            self.state.display,
            result
        );
        self.state.display = truncate_number(&format_number(result), MAX_DISPLAY_LEN as isize);
    }

    /// Record or evaluate a binary operation.
    ///
    /// The previously pending operator is applied to the stored first operand
    /// and the displayed value; `op` becomes the new pending operator.
    pub fn apply_binary_operator(&mut self, op: Operator) {
        let input = self.value();

        if let Some(pending) = self.state.operator {
            if self.state.awaiting_second_operand {
                if pending == Operator::Equals && op == Operator::Equals {
                    if let Some((previous, second)) = self.repeat {
                        let result = previous.apply(input, second);
                        log::debug!(
                            "CalculatorEngine: repeat {} {} {} = {}",
                            input,
                            previous.symbol(),
                            second,
                            result
                        );
                        self.state.display = format_number(result);
                        self.state.first_operand = Some(result);
                    }
                    return;
                }
                self.state.operator = Some(op);
                if op != Operator::Equals {
                    self.repeat = None;
                }
                return;
            }
        }

        // A first operand is only ever stored together with an operator.
        if let (Some(first), Some(pending)) = (self.state.first_operand, self.state.operator) {
            let result = pending.apply(first, input);
            log::debug!(
                "CalculatorEngine: {} {} {} = {}",
                first,
                pending.symbol(),
                input,
                result
            );
            if pending != Operator::Equals {
                self.repeat = Some((pending, input));
            }
            self.state.display = format_number(result);
            self.state.first_operand = Some(result);
        } else {
            self.state.first_operand = Some(input);
        }

        if op != Operator::Equals {
            self.repeat = None;
        }
        self.state.awaiting_second_operand = true;
        self.state.operator = Some(op);
    }

    pub fn clear_all(&mut self) {
        self.state = CalculatorState::default();
        self.repeat = None;
    }
}
