use anyhow::anyhow;
use async_trait::async_trait;
use serde_json::Value;

use reflex_engine::{Args, Cell, Reaction};

/// Prints its `data` argument to stdout, then chains to the terminal
/// cell.
///
/// A missing `data` argument is an ordinary cell failure and ends the
/// run.
pub struct PrintCell {
    name: Option<String>,
}

impl PrintCell {
    /// Unnamed instance; the registry derives `"print/<ordinal>"`.
    pub fn new() -> Self {
        Self { name: None }
    }

    /// Instance with an explicit registry name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

impl Default for PrintCell {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cell for PrintCell {
    fn type_tag(&self) -> &str {
        "print"
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    async fn activate(&self, args: &Args) -> anyhow::Result<Reaction> {
        let data = args
            .get("data")
            .ok_or_else(|| anyhow!("missing 'data' argument"))?;

        // Strings print bare; everything else prints as JSON.
        match data {
            Value::String(text) => println!("{text}"),
            other => println!("{other}"),
        }

        Ok(Reaction::Emit(vec!["end".into()]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reflex_engine::Signal;

    #[tokio::test]
    async fn emits_a_single_end_follow_on() {
        let cell = PrintCell::new();
        let mut args = Args::new();
        args.insert("data".into(), Value::String("Boom".into()));

        match cell.activate(&args).await.unwrap() {
            Reaction::Emit(signals) => {
                assert_eq!(signals.len(), 1);
                assert!(matches!(&signals[0], Signal::Name(n) if n == "end"));
            }
            Reaction::Halt => panic!("print cell must not halt"),
        }
    }

    #[tokio::test]
    async fn missing_data_argument_is_an_error() {
        let cell = PrintCell::new();
        let err = cell.activate(&Args::new()).await.unwrap_err();
        assert!(err.to_string().contains("data"));
    }

    #[test]
    fn naming() {
        assert_eq!(PrintCell::new().name(), None);
        assert_eq!(PrintCell::named("printer").name(), Some("printer"));
        assert_eq!(PrintCell::new().type_tag(), "print");
    }
}
