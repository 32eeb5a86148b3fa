//! Machine model
//!
//! Tracks the modal state of the controlled machine so redundant words are
//! never written twice.

pub mod emitter;
pub mod state;

// Re-export key types for convenience
pub use emitter::{format_number, Emitter};
pub use state::{
    join_words, plane_code, spindle_code, FeedMode, Machine, Motion, Position, Positioning,
    Units, SPINDLE_CCW, SPINDLE_CW, SPINDLE_STOP,
};
