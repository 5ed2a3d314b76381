//! Cell trait and the follow-on signal model.
//!
//! A cell is a named, polymorphic handler. The engine drives cells through
//! the single [`Cell::activate`] operation: consume an argument mapping,
//! return either follow-on [`Signal`]s to enqueue or [`Reaction::Halt`] to
//! stop the loop. Concrete cells are enumerated by the embedding
//! application; the engine itself ships only [`EndCell`].

use async_trait::async_trait;

use crate::activation::{Activation, Args};

/// A follow-on emitted by an executing cell.
///
/// A bare cell name inherits the priority of the activation currently
/// being executed, so a chain of same-priority work stays co-prioritized.
/// Emitting a full [`Activation`] overrides priority and arguments.
#[derive(Debug, Clone)]
pub enum Signal {
    /// Bare target name; wrapped into an activation by the dispatch loop.
    Name(String),
    /// Fully specified activation, enqueued as-is.
    Activation(Activation),
}

impl From<&str> for Signal {
    fn from(name: &str) -> Self {
        Signal::Name(name.to_string())
    }
}

impl From<String> for Signal {
    fn from(name: String) -> Self {
        Signal::Name(name)
    }
}

impl From<Activation> for Signal {
    fn from(activation: Activation) -> Self {
        Signal::Activation(activation)
    }
}

/// What a cell produced when activated.
#[derive(Debug)]
pub enum Reaction {
    /// Zero or more follow-on signals, enqueued in the order given.
    Emit(Vec<Signal>),
    /// Terminal interrupt: stop the dispatch loop cleanly. Not an error.
    Halt,
}

impl Reaction {
    /// A reaction with no follow-ons.
    pub fn none() -> Self {
        Reaction::Emit(Vec::new())
    }
}

/// A named, pluggable unit of behavior driven by the dispatch loop.
///
/// Implementations must not touch the registry that holds them; they only
/// see their arguments and return signals. Errors returned from
/// [`activate`](Cell::activate) propagate out of the run loop unhandled.
#[async_trait]
pub trait Cell: Send + Sync {
    /// Identifies the concrete kind of handler (e.g. `"print"`). Used to
    /// derive default registry names of the form `"<type_tag>/<ordinal>"`.
    fn type_tag(&self) -> &str;

    /// Explicit registry name. `None` lets the registry derive one from
    /// the type tag at `add` time.
    fn name(&self) -> Option<&str> {
        None
    }

    /// Consume the arguments and produce follow-on signals, request a
    /// halt, or fail.
    async fn activate(&self, args: &Args) -> anyhow::Result<Reaction>;
}

impl std::fmt::Debug for dyn Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cell").field("type_tag", &self.type_tag()).finish()
    }
}

/// The built-in terminal cell, registered as `"end"` in every brain.
///
/// Always halts, regardless of arguments. Dispatching an activation to it
/// is the clean-shutdown primitive.
pub struct EndCell;

#[async_trait]
impl Cell for EndCell {
    fn type_tag(&self) -> &str {
        "end"
    }

    fn name(&self) -> Option<&str> {
        Some("end")
    }

    async fn activate(&self, _args: &Args) -> anyhow::Result<Reaction> {
        Ok(Reaction::Halt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn end_cell_always_halts() {
        let cell = EndCell;
        let empty = Args::new();
        assert!(matches!(cell.activate(&empty).await.unwrap(), Reaction::Halt));

        let mut args = Args::new();
        args.insert("ignored".into(), serde_json::json!({"x": 1}));
        assert!(matches!(cell.activate(&args).await.unwrap(), Reaction::Halt));
    }

    #[test]
    fn end_cell_identity() {
        assert_eq!(EndCell.type_tag(), "end");
        assert_eq!(EndCell.name(), Some("end"));
    }

    #[test]
    fn signal_conversions() {
        assert!(matches!(Signal::from("end"), Signal::Name(n) if n == "end"));
        let a = Activation::new("print").with_priority(2);
        assert!(matches!(Signal::from(a), Signal::Activation(act) if act.priority == 2));
    }
}
