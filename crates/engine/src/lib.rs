//! Reflex engine: a minimal event-driven execution engine.
//!
//! A registry of named [`Cell`] handlers is driven by a single bounded,
//! priority-ordered queue of [`Activation`] messages. Executing an
//! activation may emit follow-on signals, forming an implicit,
//! dynamically discovered execution graph. The engine is an embeddable
//! control loop for small rule/flow systems, not a general job system:
//! dispatch is single-threaded and cooperative, there is no persistence,
//! no per-activation timeout, and no isolation between cells.

pub mod activation;
pub mod brain;
pub mod cell;
pub mod config;
pub mod error;
pub mod queue;

pub use activation::{Activation, Args, DEFAULT_PRIORITY};
pub use brain::{Brain, Emitter, RunOutcome};
pub use cell::{Cell, EndCell, Reaction, Signal};
pub use config::BrainConfig;
pub use error::ReflexError;
pub use queue::ActivationQueue;
