//! Change-tracking code word emitter
//!
//! An [`Emitter`] remembers the last value it rendered and only produces a
//! word (`X10`, `S12000`, `G1`) when the value changes or output is forced.

use std::fmt;

/// One tracked machine parameter
#[derive(Clone)]
pub struct Emitter<T> {
    /// Address letter(s) written before the value
    prefix: &'static str,
    /// Last rendered value (None until the first render)
    value: Option<T>,
    /// Value formatter
    transform: fn(&T) -> String,
}

impl<T> Emitter<T>
where
    T: PartialEq + Clone + fmt::Display,
{
    /// Create an emitter that formats values with `Display`
    pub fn new(prefix: &'static str) -> Self {
        Self::with_transform(prefix, |value| value.to_string())
    }
}

impl<T> Emitter<T>
where
    T: PartialEq + Clone,
{
    /// Create an emitter with a custom value formatter
    pub fn with_transform(prefix: &'static str, transform: fn(&T) -> String) -> Self {
        Self {
            prefix,
            value: None,
            transform,
        }
    }

    /// Render `new_value` if it differs from the stored one (or `force` is set)
    ///
    /// Returns an empty string when there is nothing to write. `None` never
    /// touches the stored value.
    pub fn render(&mut self, new_value: Option<T>, force: bool) -> String {
        let Some(new_value) = new_value else {
            return String::new();
        };

        if !force && self.value.as_ref() == Some(&new_value) {
            return String::new();
        }

        let word = format!("{}{}", self.prefix, (self.transform)(&new_value));
        self.value = Some(new_value);
        word
    }

    /// Last rendered value
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn prefix(&self) -> &'static str {
        self.prefix
    }

    /// Forget the stored value so the next render always writes
    pub fn clear(&mut self) {
        self.value = None;
    }
}

impl<T: fmt::Debug> fmt::Debug for Emitter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("prefix", &self.prefix)
            .field("value", &self.value)
            .finish()
    }
}

/// Format a coordinate or rate: at most four decimals, no trailing zeros, no `-0`
pub fn format_number(value: &f64) -> String {
    let rounded = (value * 10_000.0).round() / 10_000.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        rounded.to_string()
    }
}
