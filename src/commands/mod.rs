//! Command handlers for lastthird.
//!
//! Each top-level action of the binary lives in its own submodule: the
//! one-shot computation, the interactive watch loop, and the city listing.

pub mod cities;
pub mod run;
pub mod watch;
