//! # DSO Finder
//!
//! Observability engine for deep-sky objects.
//!
//! Given an observer location and a night, this crate works out which objects
//! of a fixed catalog rise above a minimum altitude during astronomical
//! darkness, subject to magnitude and object-type filters, and picks the ones
//! to display.
//!
//! ## Features
//!
//! - **Darkness Window**: Astronomical night (Sun below -18°) around local
//!   midnight, with a fixed local-clock fallback that never fails
//! - **Time Handling**: Modified Julian Date (MJD) instants and sampling grids
//! - **Visibility Computation**: Altitude/azimuth tracks, peak and longest
//!   continuous visibility per object
//! - **Selection**: Brightness ranking, seeded random sampling or name order
//! - **Export**: `;`-delimited rows written with the csv crate
//!
//! ## Architecture
//!
//! - [`api`]: Data Transfer Objects shared with callers
//! - [`models`]: Time types and the static catalog
//! - [`ephemeris`]: Position provider trait and the siderust-backed almanac
//! - [`services`]: Window solver, evaluator, selection and search pipeline
//! - [`config`]: TOML search configuration
//!
//! ## Example
//!
//! ```no_run
//! use chrono::Utc;
//! use dso_finder::{search, ObserverLocation, SearchMode, SearchRequest};
//!
//! let request = SearchRequest::new(ObserverLocation::default(), Utc::now(), SearchMode::Now);
//! let outcome = search(&request)?;
//! for record in &outcome.records {
//!     println!("{} peaks at {:.1}°", record.name, record.peak_altitude);
//! }
//! # Ok::<(), dso_finder::DsoError>(())
//! ```

pub mod api;
pub mod config;
pub mod ephemeris;
pub mod error;
pub mod models;
pub mod services;

pub use api::{
    CardinalDirection, DarknessWindow, MagnitudeFilter, ObjectWarning, ObservabilityRecord,
    ObserverLocation, Period, SearchMode, SearchOutcome, SearchRequest, SearchStatus, TargetTrace,
    WindowStatus,
};
pub use config::SearchConfig;
pub use error::{DsoError, Result};
pub use services::{run_search, search};
