//! Concrete cells for the reflex engine.
//!
//! The engine core ships only the terminal cell; everything else a flow
//! needs lives here or in the embedding application.

pub mod print;

pub use print::PrintCell;
