use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Priority assigned to activations that do not set one explicitly.
///
/// Lower values are serviced sooner, so the default marks low-urgency
/// work that yields to anything scheduled deliberately.
pub const DEFAULT_PRIORITY: u32 = 999;

/// Argument mapping passed to a cell on activation.
///
/// String keys, arbitrary JSON values. Insertion order carries no meaning.
pub type Args = serde_json::Map<String, Value>;

/// A prioritized message naming a target cell and its arguments.
///
/// Activations are the unit of work queued and dispatched by the
/// [`Brain`](crate::brain::Brain). They are immutable once constructed:
/// produced by an external caller or an executing cell, consumed exactly
/// once by the dispatch loop, then dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activation {
    /// Scheduling priority. Lower value = serviced sooner.
    /// Accepts the short field name `p` when deserialized.
    #[serde(default = "default_priority", alias = "p")]
    pub priority: u32,

    /// Name of the target cell in the registry.
    pub cell: String,

    /// Arguments handed to the cell's `activate`.
    #[serde(default)]
    pub args: Args,
}

fn default_priority() -> u32 {
    DEFAULT_PRIORITY
}

impl Activation {
    /// Create an activation for the named cell at the default priority
    /// with no arguments.
    pub fn new(cell: impl Into<String>) -> Self {
        Self {
            priority: DEFAULT_PRIORITY,
            cell: cell.into(),
            args: Args::new(),
        }
    }

    /// Set the scheduling priority.
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    /// Add a single argument.
    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }

    /// Replace the whole argument mapping.
    pub fn with_args(mut self, args: Args) -> Self {
        self.args = args;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let a = Activation::new("print");
        assert_eq!(a.priority, DEFAULT_PRIORITY);
        assert_eq!(a.cell, "print");
        assert!(a.args.is_empty());
    }

    #[test]
    fn builder_sets_priority_and_args() {
        let a = Activation::new("print")
            .with_priority(0)
            .with_arg("data", "Boom");
        assert_eq!(a.priority, 0);
        assert_eq!(a.args.get("data").unwrap(), "Boom");
    }

    #[test]
    fn deserialize_accepts_p_alias() {
        let a: Activation = serde_json::from_str(r#"{"p": 0, "cell": "print"}"#).unwrap();
        assert_eq!(a.priority, 0);
        assert_eq!(a.cell, "print");
        assert!(a.args.is_empty());
    }

    #[test]
    fn deserialize_defaults_priority() {
        let a: Activation =
            serde_json::from_str(r#"{"cell": "print", "args": {"data": 1}}"#).unwrap();
        assert_eq!(a.priority, DEFAULT_PRIORITY);
        assert_eq!(a.args.get("data").unwrap(), 1);
    }

    #[test]
    fn serialize_roundtrip() {
        let a = Activation::new("relay").with_priority(3).with_arg("n", 7);
        let json = serde_json::to_string(&a).unwrap();
        let back: Activation = serde_json::from_str(&json).unwrap();
        assert_eq!(back.priority, 3);
        assert_eq!(back.cell, "relay");
        assert_eq!(back.args.get("n").unwrap(), 7);
    }
}
