//! Service layer for the observability engine.
//!
//! Each module is a set of pure functions over explicit inputs; the only
//! state that crosses a call is the injected ephemeris provider and random
//! source.

pub mod astronomical_night;
pub mod export;
pub mod magnitude_limit;
pub mod search;
pub mod selection;
pub mod visibility_computer;

pub use astronomical_night::solve_darkness_window;
pub use export::to_delimited;
pub use magnitude_limit::limiting_magnitude;
pub use search::{run_search, search};
pub use selection::select;
pub use visibility_computer::{evaluate, trace_custom_target};
