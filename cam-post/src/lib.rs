//! CAM Trace Post-Processor Library
//!
//! Turns the textual trace log of a CAM tool into a numbered machine-control
//! program (G-code style), in three stages:
//! - [`TraceParser`] reads trace text into ordered [`EventRecord`]s
//! - [`Program`] dispatches each event to the listeners registered for it
//! - listeners write through a [`Builder`], whose [`Machine`] model drops
//!   every word that would not change machine state
//!
//! The library does NOT:
//! - Read or write files
//! - Know which events a given CAM tool emits (listeners decide that)
//! - Check machine limits
//!
//! File handling and a standard set of listeners live in the application
//! layer (cam-post-cli).
//!
//! # Example Usage
//!
//! ```
//! use cam_post::{BuilderConfig, Emit, Position, Program};
//!
//! let mut program = Program::new(BuilderConfig::new());
//! program.load_trace("(0)@rapid_move x: 0 y: 0 z: 100mm\n");
//!
//! program.on("RapidMove", |ctx, params, _meta| {
//!     ctx.rapid(Position::from_parameters(params), Emit::new());
//!     Ok(())
//! });
//!
//! program.process().unwrap();
//! let files = program.generate();
//! assert_eq!(files[0].text, "N10 G0 X0 Y0 Z100");
//! ```

// Public modules
pub mod builder;
pub mod config;
pub mod machine;
pub mod parser;
pub mod program;
pub mod types;

// Re-export main types for convenience
pub use builder::{Builder, Emit, GeneratedFile};
pub use config::{BuilderConfig, NumberingConfig};
pub use machine::{FeedMode, Machine, Motion, Position, Positioning, Units};
pub use parser::{parse_trace, TraceParser};
pub use program::{Dispatch, Event, EventMetadata, ListenerId, Program};
pub use types::{
    Direction, EventRecord, ParamValue, Parameters, ParametersExt, Plane, PostError, Result,
    SwitchState, Symbol,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: a fresh program has nothing loaded and nothing to write
        let mut program = Program::default();
        assert!(program.list_events().is_empty());

        let files = program.generate();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "main");
        assert!(files[0].text.is_empty());
    }
}
