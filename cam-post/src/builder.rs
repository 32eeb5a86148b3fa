//! Instruction builder
//!
//! The [`Builder`] collects code words into the line under construction and
//! flushes finished lines, numbered, into the current file. It owns the
//! [`Machine`] so every verb only writes the words that change machine state.
//!
//! Files: there is always a main file; named subprogram files can be opened
//! from the main file and closed back into it (one level, no nesting).

use crate::config::BuilderConfig;
use crate::machine::{join_words, FeedMode, Machine, Motion, Position, Positioning, Units};
use crate::types::{Direction, Plane, PostError, Result};

/// Per-call output options for builder verbs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Emit {
    /// Write words even if the machine is already in that state
    pub force: bool,
    /// Leave the line open so the next verb continues it
    pub skip_flush: bool,
}

impl Emit {
    /// Write changed words and finish the line
    pub fn new() -> Self {
        Self::default()
    }

    /// Write every word, changed or not
    pub fn forced() -> Self {
        Self {
            force: true,
            skip_flush: false,
        }
    }

    /// Keep the line open after writing
    pub fn deferred() -> Self {
        Self {
            force: false,
            skip_flush: true,
        }
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn with_skip_flush(mut self, skip_flush: bool) -> Self {
        self.skip_flush = skip_flush;
        self
    }
}

/// One generated output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// File name (main file name or subprogram name)
    pub name: String,
    /// Lines joined with `\n`
    pub text: String,
}

/// Flushed lines and the pending line of one file
#[derive(Debug, Clone)]
struct LineBuffer {
    name: String,
    lines: Vec<String>,
    pending: Vec<String>,
    next_number: u64,
}

impl LineBuffer {
    fn new(name: impl Into<String>, start: u64) -> Self {
        Self {
            name: name.into(),
            lines: Vec::new(),
            pending: Vec::new(),
            next_number: start,
        }
    }
}

/// Accumulates machine-control instructions for a main file and its subprograms
#[derive(Debug, Clone)]
pub struct Builder {
    config: BuilderConfig,
    machine: Machine,
    /// Index 0 is always the main file
    files: Vec<LineBuffer>,
    current: usize,
}

impl Builder {
    /// Create a builder with a fresh machine and an empty main file
    pub fn new(config: BuilderConfig) -> Self {
        let main = LineBuffer::new(config.main_file_name.clone(), config.numbering.start);
        Self {
            config,
            machine: Machine::new(),
            files: vec![main],
            current: 0,
        }
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    /// Direct machine access, for words a verb does not cover
    pub fn machine_mut(&mut self) -> &mut Machine {
        &mut self.machine
    }

    /// Append a word to the pending line of the current file
    ///
    /// Whitespace is trimmed; empty words are ignored.
    pub fn put(&mut self, word: &str) {
        let word = word.trim();
        if word.is_empty() {
            return;
        }
        self.files[self.current].pending.push(word.to_string());
    }

    /// Append a word and finish the line
    pub fn put_line(&mut self, word: &str) {
        self.put(word);
        self.flush();
    }

    /// Finish the pending line of the current file
    ///
    /// Does nothing (and keeps the line number) when no word is pending.
    /// Line numbers stop at `u64::MAX` instead of wrapping.
    pub fn flush(&mut self) {
        let numbering = self.config.numbering;
        let file = &mut self.files[self.current];

        let words = join_words(file.pending.drain(..));
        if words.is_empty() {
            return;
        }

        let line = if numbering.enabled {
            format!("N{} {}", file.next_number, words)
        } else {
            words
        };
        log::trace!("{}: {}", file.name, line);

        file.lines.push(line);
        file.next_number = match file.next_number.checked_add(numbering.increment) {
            Some(next) => next,
            None => {
                log::warn!("{}: line numbers exhausted, staying at {}", file.name, u64::MAX);
                u64::MAX
            }
        };
    }

    /// Finish the pending line of every file
    pub fn flush_all(&mut self) {
        let current = self.current;
        for idx in 0..self.files.len() {
            self.current = idx;
            self.flush();
        }
        self.current = current;
    }

    /// Put each rendered word, then flush unless the caller keeps the line open
    fn emit_words(&mut self, words: &[String], emit: Emit) {
        for word in words {
            self.put(word);
        }
        if !emit.skip_flush {
            self.flush();
        }
    }

    /// Rapid positioning move: `G0 X.. Y.. Z..`
    pub fn rapid(&mut self, position: Position, emit: Emit) {
        self.motion(Motion::Rapid, position, emit);
    }

    /// Linear feed move: `G1 X.. Y.. Z..`
    pub fn line(&mut self, position: Position, emit: Emit) {
        self.motion(Motion::Linear, position, emit);
    }

    fn motion(&mut self, motion: Motion, position: Position, emit: Emit) {
        let mode = self.machine.set_motion(motion, emit.force);
        let axes = self.machine.set_position(position, emit.force);
        self.emit_words(&[mode, axes], emit);
    }

    /// Linear move that also sets the feed rate on the same line
    pub fn line_with_feed(&mut self, position: Position, feed: f64, emit: Emit) {
        let mode = self.machine.set_motion(Motion::Linear, emit.force);
        let axes = self.machine.set_position(position, emit.force);
        let feed = self.machine.set_feed_rate(feed, emit.force);
        self.emit_words(&[mode, axes, feed], emit);
    }

    pub fn set_spindle_speed(&mut self, speed: f64, emit: Emit) {
        let word = self.machine.set_spindle_speed(speed, emit.force);
        self.emit_words(&[word], emit);
    }

    pub fn set_spindle_direction(&mut self, direction: Direction, emit: Emit) {
        let word = self.machine.set_spindle_direction(direction, emit.force);
        self.emit_words(&[word], emit);
    }

    /// Speed and direction together: `S12000 M3`
    pub fn start_spindle(&mut self, speed: f64, direction: Direction, emit: Emit) {
        let speed = self.machine.set_spindle_speed(speed, emit.force);
        let direction = self.machine.set_spindle_direction(direction, emit.force);
        self.emit_words(&[speed, direction], emit);
    }

    pub fn stop_spindle(&mut self, emit: Emit) {
        let word = self.machine.stop_spindle(emit.force);
        self.emit_words(&[word], emit);
    }

    pub fn set_feed_rate(&mut self, feed: f64, emit: Emit) {
        let word = self.machine.set_feed_rate(feed, emit.force);
        self.emit_words(&[word], emit);
    }

    pub fn set_plane(&mut self, plane: Plane, emit: Emit) {
        let word = self.machine.set_plane(plane, emit.force);
        self.emit_words(&[word], emit);
    }

    pub fn set_units(&mut self, units: Units, emit: Emit) {
        let word = self.machine.set_units(units, emit.force);
        self.emit_words(&[word], emit);
    }

    pub fn set_positioning(&mut self, positioning: Positioning, emit: Emit) {
        let word = self.machine.set_positioning(positioning, emit.force);
        self.emit_words(&[word], emit);
    }

    pub fn set_feed_mode(&mut self, mode: FeedMode, emit: Emit) {
        let word = self.machine.set_feed_mode(mode, emit.force);
        self.emit_words(&[word], emit);
    }

    /// Preselect a tool: `T4`
    pub fn select_tool(&mut self, tool: u32, emit: Emit) {
        let word = self.machine.set_tool(tool, emit.force);
        self.emit_words(&[word], emit);
    }

    /// Tool change: `T4 M6`; `M6` is written even if `T4` is already selected
    pub fn change_tool(&mut self, tool: u32, emit: Emit) {
        let word = self.machine.set_tool(tool, emit.force);
        self.emit_words(&[word, "M6".to_string()], emit);
    }

    /// Subprogram call: `M98 P<name>`
    pub fn call_subprogram(&mut self, name: &str, emit: Emit) {
        self.emit_words(&["M98".to_string(), format!("P{}", name)], emit);
    }

    /// Program end: `M30`
    pub fn end_program(&mut self, emit: Emit) {
        self.emit_words(&["M30".to_string()], emit);
    }

    /// Comment on a line of its own: `(text)`
    pub fn comment(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        self.flush();
        self.put_line(&format!("({})", text));
    }

    /// Open a subprogram file and make it current
    ///
    /// Only legal from the main file. Reopening an existing subprogram appends
    /// to it.
    pub fn new_subprogram(&mut self, name: &str) -> Result<()> {
        if !self.is_main() {
            return Err(PostError::IllegalFileContext(format!(
                "cannot open subprogram '{}' inside subprogram '{}'",
                name,
                self.current_file_name()
            )));
        }
        if name == self.files[0].name {
            return Err(PostError::IllegalFileContext(format!(
                "subprogram name '{}' is the main file name",
                name
            )));
        }

        self.current = match self.files.iter().position(|f| f.name == name) {
            Some(idx) => idx,
            None => {
                self.files
                    .push(LineBuffer::new(name, self.config.numbering.start));
                self.files.len() - 1
            }
        };

        log::debug!("Switched to subprogram '{}'", name);
        Ok(())
    }

    /// Close the current subprogram with `M99` and return to the main file
    pub fn end_subprogram(&mut self) -> Result<()> {
        if self.is_main() {
            return Err(PostError::IllegalFileContext(
                "cannot end a subprogram while in the main file".to_string(),
            ));
        }

        self.flush();
        self.put_line("M99");

        log::debug!("Left subprogram '{}'", self.current_file_name());
        self.current = 0;
        Ok(())
    }

    /// True while the main file is current
    pub fn is_main(&self) -> bool {
        self.current == 0
    }

    pub fn current_file_name(&self) -> &str {
        &self.files[self.current].name
    }

    /// Line number the next flush of the current file will use
    pub fn next_line_number(&self) -> u64 {
        self.files[self.current].next_number
    }

    /// Words waiting on the current file's open line
    pub fn pending_words(&self) -> &[String] {
        &self.files[self.current].pending
    }

    /// Flushed lines of a file
    pub fn lines(&self, name: &str) -> Result<&[String]> {
        self.files
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.lines.as_slice())
            .ok_or_else(|| PostError::UnknownFile(name.to_string()))
    }

    /// File names in creation order (main first)
    pub fn file_names(&self) -> Vec<&str> {
        self.files.iter().map(|f| f.name.as_str()).collect()
    }

    /// Text of every file, main first, subprograms in creation order
    ///
    /// Pending (unflushed) words are not included.
    pub fn build(&self) -> Vec<GeneratedFile> {
        self.files
            .iter()
            .map(|f| GeneratedFile {
                name: f.name.clone(),
                text: f.lines.join("\n"),
            })
            .collect()
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new(BuilderConfig::default())
    }
}
