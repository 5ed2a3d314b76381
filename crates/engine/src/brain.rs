//! Registry plus scheduler: the brain owns the named cells and the
//! bounded priority queue, and runs the single dispatch loop.
//!
//! Exactly one activation is ever executing at a time. The loop pops the
//! pending activation with the lowest priority value, resolves its target
//! cell, invokes it, and re-enqueues any follow-on signals. It ends in
//! one of two clean states: a cell requested a halt
//! ([`RunOutcome::Interrupted`]) or the queue stayed empty past the idle
//! budget ([`RunOutcome::TimedOut`]). Everything else a cell raises
//! propagates out unhandled.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::activation::Activation;
use crate::cell::{Cell, EndCell, Reaction, Signal};
use crate::config::BrainConfig;
use crate::error::ReflexError;
use crate::queue::ActivationQueue;

/// How a completed run ended. Both variants are successful terminations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The queue stayed empty past the configured idle budget.
    TimedOut,
    /// A cell returned [`Reaction::Halt`].
    Interrupted,
}

/// Cheap cloneable handle for enqueueing activations from outside the
/// loop, e.g. from another task while [`Brain::run`] is executing.
#[derive(Clone)]
pub struct Emitter {
    queue: Arc<ActivationQueue>,
}

impl Emitter {
    /// Enqueue an activation. Suspends while the queue is at capacity.
    pub async fn emit(&self, activation: Activation) {
        self.queue.push(activation).await;
    }
}

/// The registry-plus-scheduler driving a set of named cells.
///
/// The terminal cell `"end"` is registered at construction and is never
/// removed; there is no removal or rename operation at all. Cells are
/// added before the run starts and persist for the brain's lifetime.
pub struct Brain {
    cells: HashMap<String, Arc<dyn Cell>>,
    /// Per-type-tag counters backing default names of the form
    /// `"<type_tag>/<ordinal>"`.
    ordinals: HashMap<String, u64>,
    queue: Arc<ActivationQueue>,
    idle_timeout: Option<Duration>,
    idle_poll: Duration,
    strict: bool,
}

impl Brain {
    /// Construct a brain from its configuration.
    ///
    /// Registers the terminal cell and seeds the queue with the
    /// configured start signal, if any. Without one, construction only
    /// logs a warning; the hard failure point is [`run`](Brain::run).
    pub fn new(config: BrainConfig) -> Self {
        let mut brain = Self {
            cells: HashMap::new(),
            ordinals: HashMap::new(),
            queue: Arc::new(ActivationQueue::new(config.capacity)),
            idle_timeout: config.idle_timeout,
            idle_poll: config.idle_poll,
            strict: config.strict,
        };

        brain
            .add_arc(Arc::new(EndCell))
            .expect("terminal cell registers into an empty registry");

        match config.start_signal {
            Some(start) => {
                brain
                    .queue
                    .try_push(start)
                    .expect("start signal fits an empty queue");
            }
            None => {
                tracing::warn!(
                    "brain constructed without a start signal; \
                     pass one to run() or emit() before running"
                );
            }
        }

        brain
    }

    /// Register a cell under its effective name.
    ///
    /// Cells without an explicit name get `"<type_tag>/<ordinal>"`, where
    /// the ordinal is the count of cells of that tag registered so far.
    /// Returns the effective name, or [`ReflexError::DuplicateCell`] if
    /// it is already taken.
    pub fn add(&mut self, cell: impl Cell + 'static) -> Result<String, ReflexError> {
        self.add_arc(Arc::new(cell))
    }

    fn add_arc(&mut self, cell: Arc<dyn Cell>) -> Result<String, ReflexError> {
        let tag = cell.type_tag().to_string();
        let name = match cell.name() {
            Some(explicit) => explicit.to_string(),
            None => format!("{tag}/{}", self.ordinals.get(&tag).copied().unwrap_or(0)),
        };

        if self.cells.contains_key(&name) {
            return Err(ReflexError::DuplicateCell(name));
        }

        *self.ordinals.entry(tag).or_insert(0) += 1;
        tracing::debug!(cell = %name, "cell registered");
        self.cells.insert(name.clone(), cell);
        Ok(name)
    }

    /// Look up a cell by exact name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Cell>> {
        self.cells.get(name)
    }

    /// Whether a cell is registered under the exact name.
    pub fn contains(&self, name: &str) -> bool {
        self.cells.contains_key(name)
    }

    /// Number of registered cells (the terminal cell included).
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// A brain always holds at least the terminal cell.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Names of all registered cells, in no particular order.
    pub fn cell_names(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    /// Resolve a target name under the configured lookup policy.
    ///
    /// Strict mode fails on a miss. Lenient mode (the default) logs a
    /// warning and retries `"<name>/0"`, the default name of the first
    /// unnamed instance of a type, so callers can address a cell by its
    /// type tag alone.
    pub fn resolve(&self, name: &str) -> Result<&Arc<dyn Cell>, ReflexError> {
        if let Some(cell) = self.cells.get(name) {
            return Ok(cell);
        }

        if self.strict {
            return Err(ReflexError::CellNotFound(name.to_string()));
        }

        let fallback = format!("{name}/0");
        tracing::warn!(
            cell = %name,
            fallback = %fallback,
            "cell not found, lenient mode retrying the default instance name"
        );
        match self.cells.get(&fallback) {
            Some(cell) => Ok(cell),
            None => Err(ReflexError::CellNotFound(fallback)),
        }
    }

    /// Enqueue an activation. Suspends while the queue is at capacity.
    pub async fn emit(&self, activation: Activation) {
        self.queue.push(activation).await;
    }

    /// Handle for enqueueing activations from outside the brain, safe to
    /// use concurrently with the running loop.
    pub fn emitter(&self) -> Emitter {
        Emitter {
            queue: self.queue.clone(),
        }
    }

    /// Number of pending activations.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Run the dispatch loop until a terminal condition.
    ///
    /// A start signal supplied here must carry priority 0. After any
    /// seeding the queue must be non-empty, otherwise the run fails with
    /// [`ReflexError::MissingStartSignal`].
    ///
    /// A brain is single-use: behavior of calling `run` again after it
    /// has returned is unspecified.
    pub async fn run(
        &mut self,
        start_signal: Option<Activation>,
    ) -> Result<RunOutcome, ReflexError> {
        if let Some(start) = start_signal {
            if start.priority != 0 {
                return Err(ReflexError::StartSignalPriority(start.priority));
            }
            self.queue.push(start).await;
        }

        if self.queue.is_empty() {
            return Err(ReflexError::MissingStartSignal);
        }

        let mut idle_since: Option<Instant> = None;

        loop {
            let activation = match self.queue.try_pop() {
                Some(activation) => {
                    idle_since = None;
                    activation
                }
                None => {
                    if let Some(budget) = self.idle_timeout {
                        let since = *idle_since.get_or_insert_with(Instant::now);
                        if since.elapsed() >= budget {
                            tracing::warn!(
                                timeout = ?budget,
                                "no activations within the idle budget, stopping"
                            );
                            return Ok(RunOutcome::TimedOut);
                        }
                    }
                    tokio::time::sleep(self.idle_poll).await;
                    continue;
                }
            };

            tracing::info!(
                cell = %activation.cell,
                priority = activation.priority,
                args = ?activation.args,
                "dispatching activation"
            );

            let cell = self.resolve(&activation.cell)?.clone();
            match cell.activate(&activation.args).await {
                Ok(Reaction::Emit(signals)) => {
                    for signal in signals {
                        // A bare name inherits the priority of the
                        // activation being executed.
                        let follow_on = match signal {
                            Signal::Activation(full) => full,
                            Signal::Name(name) => {
                                Activation::new(name).with_priority(activation.priority)
                            }
                        };
                        self.queue.push(follow_on).await;
                    }
                }
                Ok(Reaction::Halt) => {
                    tracing::info!(cell = %activation.cell, "terminal interrupt, stopping");
                    return Ok(RunOutcome::Interrupted);
                }
                Err(source) => {
                    return Err(ReflexError::Cell {
                        cell: activation.cell,
                        source,
                    });
                }
            }
        }
    }
}
