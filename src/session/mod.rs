//! # Session
//!
//! The view state machine behind the five screens:
//! `welcome -> camera -> review -> transforming -> result`.
//!
//! [`SessionMachine`] owns the [`Session`] and is the only code that changes
//! it. Gateway calls are never made here; the [`Studio`](crate::studio::Studio)
//! awaits them between a `begin_*` and a `complete_*` handler.

pub mod machine;
pub mod progress;
pub mod state;

pub use machine::{SessionMachine, Ticket, ANIMATE_FAILED, CUSTOM_STYLE_NAME, TRANSFORM_FAILED};
pub use progress::{ProgressKind, ProgressTicker, IMAGE_MESSAGES, VIDEO_MESSAGES};
pub use state::{Drafts, Job, Session, Step, StepKind};
