//! Core types for the CAM trace post-processor
//!
//! This module defines the records the parser emits, the tagged parameter
//! values they carry, the enumerated symbol vocabularies recognized in trace
//! text, and the library error type.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Result type for post-processor operations
pub type Result<T> = std::result::Result<T, PostError>;

/// Errors raised by the builder and parameter accessors
#[derive(Debug, thiserror::Error)]
pub enum PostError {
    #[error("Illegal file context: {0}")]
    IllegalFileContext(String),

    #[error("Unknown file: {0}")]
    UnknownFile(String),

    #[error("Missing parameter '{0}'")]
    MissingParameter(String),

    #[error("Invalid parameter '{key}': expected {expected}, found {found}")]
    InvalidParameter {
        key: String,
        expected: &'static str,
        found: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Key/value parameters of one trace event, ordered by key
pub type Parameters = BTreeMap<String, ParamValue>;

/// One parsed trace block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Canonical event name (`start_of_file` becomes `StartOfFile`)
    pub name: String,
    /// Zero-based position of appearance in the trace
    pub index: usize,
    /// 1-based line of the event marker in the source text
    pub line: usize,
    /// All key/value pairs found inside the block
    pub parameters: Parameters,
}

impl EventRecord {
    /// Look up a parameter by key
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.parameters.get(key)
    }
}

/// Parameter value types recognized in trace text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Boolean literal (`true` / `false`)
    Boolean(bool),
    /// Numeric literal with any unit suffix stripped
    Number(f64),
    /// Bare token from the known symbol table
    Symbol(Symbol),
    /// Quoted string or unrecognized bare token
    Text(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Boolean(v) => write!(f, "{}", v),
            ParamValue::Number(v) => write!(f, "{}", v),
            ParamValue::Symbol(v) => write!(f, "{}", v),
            ParamValue::Text(v) => write!(f, "{}", v),
        }
    }
}

impl ParamValue {
    /// Numeric view of the value, if it is a number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Text view of the value; symbols yield their trace spelling
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Text(v) => Some(v),
            ParamValue::Symbol(v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<Symbol> {
        match self {
            ParamValue::Symbol(v) => Some(*v),
            _ => None,
        }
    }

    /// Short name of the variant, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            ParamValue::Boolean(_) => "boolean",
            ParamValue::Number(_) => "number",
            ParamValue::Symbol(_) => "symbol",
            ParamValue::Text(_) => "text",
        }
    }
}

/// Typed accessors over an event's parameter map
pub trait ParametersExt {
    fn number(&self, key: &str) -> Option<f64>;
    fn text(&self, key: &str) -> Option<&str>;
    fn boolean(&self, key: &str) -> Option<bool>;
    fn symbol(&self, key: &str) -> Option<Symbol>;

    /// Like [`ParametersExt::number`], but a missing or non-numeric value is an error
    fn require_number(&self, key: &str) -> Result<f64>;
}

impl ParametersExt for Parameters {
    fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(ParamValue::as_f64)
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ParamValue::as_str)
    }

    fn boolean(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(ParamValue::as_bool)
    }

    fn symbol(&self, key: &str) -> Option<Symbol> {
        self.get(key).and_then(ParamValue::as_symbol)
    }

    fn require_number(&self, key: &str) -> Result<f64> {
        match self.get(key) {
            Some(ParamValue::Number(v)) => Ok(*v),
            Some(other) => Err(PostError::InvalidParameter {
                key: key.to_string(),
                expected: "number",
                found: other.kind().to_string(),
            }),
            None => Err(PostError::MissingParameter(key.to_string())),
        }
    }
}

/// Spindle rotation spellings used by the CAM tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// `CW`
    Cw,
    /// `CLW`
    Clw,
    /// `CCW`
    Ccw,
    /// `CCLW`
    Cclw,
}

impl Direction {
    /// True for every clockwise-family spelling
    pub fn is_clockwise(self) -> bool {
        matches!(self, Direction::Cw | Direction::Clw)
    }
}

/// On/off switch states (spindle, coolant, compensation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwitchState {
    On,
    Off,
}

/// Working plane spellings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Plane {
    /// `XY` / `XYPLANE`
    Xy,
    /// `ZX` / `XZ` / `ZXPLANE`
    Zx,
    /// `YZ` / `YZPLANE`
    Yz,
}

/// A bare token recognized from the trace symbol table
///
/// Serializes as its trace spelling, so a dumped event reads like the trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Symbol {
    Direction(Direction),
    State(SwitchState),
    Plane(Plane),
}

impl Symbol {
    /// Look up a bare trace token; matching is exact (trace symbols are upper case)
    pub fn from_token(token: &str) -> Option<Self> {
        let symbol = match token {
            "CW" => Symbol::Direction(Direction::Cw),
            "CLW" => Symbol::Direction(Direction::Clw),
            "CCW" => Symbol::Direction(Direction::Ccw),
            "CCLW" => Symbol::Direction(Direction::Cclw),
            "ON" => Symbol::State(SwitchState::On),
            "OFF" => Symbol::State(SwitchState::Off),
            "XY" | "XYPLANE" => Symbol::Plane(Plane::Xy),
            "ZX" | "XZ" | "ZXPLANE" => Symbol::Plane(Plane::Zx),
            "YZ" | "YZPLANE" => Symbol::Plane(Plane::Yz),
            _ => return None,
        };
        Some(symbol)
    }

    /// Canonical trace spelling of the symbol
    pub fn as_str(&self) -> &'static str {
        match self {
            Symbol::Direction(Direction::Cw) => "CW",
            Symbol::Direction(Direction::Clw) => "CLW",
            Symbol::Direction(Direction::Ccw) => "CCW",
            Symbol::Direction(Direction::Cclw) => "CCLW",
            Symbol::State(SwitchState::On) => "ON",
            Symbol::State(SwitchState::Off) => "OFF",
            Symbol::Plane(Plane::Xy) => "XY",
            Symbol::Plane(Plane::Zx) => "ZX",
            Symbol::Plane(Plane::Yz) => "YZ",
        }
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.as_str().to_string()
    }
}

impl TryFrom<String> for Symbol {
    type Error = String;

    fn try_from(token: String) -> std::result::Result<Self, Self::Error> {
        Symbol::from_token(&token).ok_or_else(|| format!("unknown symbol '{}'", token))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
