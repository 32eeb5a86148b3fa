//! Trace text parser
//!
//! Turns the CAM tool's trace log into an ordered list of [`EventRecord`]s.
//!
//! ## Format
//! ```text
//! (0)@start_of_file program_number: '1234'
//! (1)@rapid_move
//!   x: 0mm y: 0mm z: 100mm
//! (2)@spindle_on direction: CLW speed: 12000rpm
//! ```
//! A line starting with `(<n>)@<snake_case>` opens a new event. Every line up
//! to the next marker (the marker line included) contributes `key: value`
//! pairs to that event.
//!
//! The parser never fails: anything it does not recognize is kept as text.

use crate::types::{EventRecord, ParamValue, Parameters, Symbol};
use once_cell::sync::Lazy;
use regex::Regex;

/// `(12)@rapid_move`
static EVENT_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\((\d+)\)@([A-Za-z][A-Za-z0-9_]*)").unwrap());

/// `key: 'quoted value'` or `key: token`
///
/// A quoted value ends at the first quote followed by whitespace or the end
/// of the line, so `'O'Brien'` keeps its inner apostrophe.
static KEY_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Za-z_][A-Za-z0-9_]*):\s*(?:('.*?')(?:\s|$)|(\S+))").unwrap()
});

/// Number with an optional exponent and unit suffix (`12.5`, `-3mm`, `1.5E2mm`)
static NUMBER_WITH_UNIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)[A-Za-z%/°]*$").unwrap()
});

/// Trace parser
pub struct TraceParser;

impl TraceParser {
    /// Parse trace text into event records, indexed in order of appearance
    pub fn parse(text: &str) -> Vec<EventRecord> {
        let mut events = Vec::new();
        let mut current: Option<EventRecord> = None;

        for (line_idx, line) in text.lines().enumerate() {
            if let Some(caps) = EVENT_MARKER.captures(line) {
                if let Some(done) = current.take() {
                    events.push(done);
                }

                let name = to_event_name(&caps[2]);
                log::trace!("Line {}: opening event {} ({})", line_idx + 1, name, &caps[1]);

                current = Some(EventRecord {
                    name,
                    index: events.len(),
                    line: line_idx + 1,
                    parameters: Parameters::new(),
                });
            }

            match current.as_mut() {
                Some(event) => scan_pairs(line, &mut event.parameters),
                None => {
                    if KEY_VALUE.is_match(line) {
                        log::warn!(
                            "Line {}: parameters before the first event marker are ignored",
                            line_idx + 1
                        );
                    }
                }
            }
        }

        if let Some(done) = current.take() {
            events.push(done);
        }

        log::debug!("Parsed {} trace events", events.len());
        events
    }
}

/// Convenience wrapper around [`TraceParser::parse`]
pub fn parse_trace(text: &str) -> Vec<EventRecord> {
    TraceParser::parse(text)
}

/// Collect every `key: value` pair on a line; later keys overwrite earlier ones
fn scan_pairs(line: &str, parameters: &mut Parameters) {
    for caps in KEY_VALUE.captures_iter(line) {
        let key = caps[1].to_string();
        let Some(raw) = caps.get(2).or_else(|| caps.get(3)) else {
            continue;
        };
        let value = parse_value(raw.as_str());
        parameters.insert(key, value);
    }
}

/// Interpret a raw value token
pub fn parse_value(token: &str) -> ParamValue {
    if token.len() >= 2 && token.starts_with('\'') && token.ends_with('\'') {
        return ParamValue::Text(token[1..token.len() - 1].to_string());
    }

    match token {
        "true" => return ParamValue::Boolean(true),
        "false" => return ParamValue::Boolean(false),
        _ => {}
    }

    if let Some(caps) = NUMBER_WITH_UNIT.captures(token) {
        if let Ok(number) = caps[1].parse::<f64>() {
            return ParamValue::Number(number);
        }
    }

    if let Some(symbol) = Symbol::from_token(token) {
        return ParamValue::Symbol(symbol);
    }

    ParamValue::Text(token.to_string())
}

/// `start_of_file` → `StartOfFile`
pub fn to_event_name(identifier: &str) -> String {
    identifier
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect()
}
