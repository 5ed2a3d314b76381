//! reflex-demo — wires a printing cell into a brain and runs the loop.
//!
//! # Usage
//!
//! ```bash
//! # Print the default message and exit once the flow reaches "end"
//! reflex-demo
//!
//! # Custom message, tighter idle budget
//! reflex-demo --message "hello" --timeout-secs 5
//!
//! # Via environment variables
//! REFLEX_MESSAGE=hello reflex-demo
//! ```

use std::time::Duration;

use clap::Parser;
use reflex_cells::PrintCell;
use reflex_engine::{Activation, Brain, BrainConfig};

/// Minimal demonstration of the reflex dispatch loop.
#[derive(Parser, Debug)]
#[command(name = "reflex-demo", version, about)]
struct Cli {
    /// Message handed to the print cell as its `data` argument.
    #[arg(long, env = "REFLEX_MESSAGE", default_value = "Boom")]
    message: String,

    /// Idle timeout in seconds (0 = disabled).
    #[arg(long, env = "REFLEX_TIMEOUT_SECS", default_value_t = 60)]
    timeout_secs: u64,

    /// Queue capacity bound.
    #[arg(long, env = "REFLEX_CAPACITY", default_value_t = 100)]
    capacity: usize,

    /// Strict cell name resolution (no `"<name>/0"` fallback).
    #[arg(long, env = "REFLEX_STRICT", default_value_t = false)]
    strict: bool,
}

impl Cli {
    fn into_brain_config(self) -> BrainConfig {
        let mut config = BrainConfig::new().capacity(self.capacity);
        config = match self.timeout_secs {
            0 => config.no_idle_timeout(),
            secs => config.idle_timeout(Duration::from_secs(secs)),
        };
        if self.strict {
            config = config.strict();
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    tracing::info!(?cli, "starting reflex-demo");

    let message = cli.message.clone();
    let mut brain = Brain::new(cli.into_brain_config());
    brain.add(PrintCell::new())?;

    let start = Activation::new("print")
        .with_priority(0)
        .with_arg("data", message);

    let outcome = brain.run(Some(start)).await?;
    tracing::info!(?outcome, "reflex-demo exited cleanly");
    Ok(())
}
