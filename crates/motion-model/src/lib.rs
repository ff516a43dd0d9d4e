//! StrideSense Motion Model
//!
//! Defines the core data contracts for StrideSense:
//! - **Samples:** Timestamped 3-axis acceleration readings and the JSONL
//!   stream format used for recording and replay
//! - **Activity:** Discrete activity labels, confidence-scored transition
//!   records, and the bounded transition history
//!
//! All acceleration values are expressed in units of g so streams survive
//! hardware scale changes across sessions.

pub mod activity;
pub mod sample;

pub use activity::*;
pub use sample::*;
