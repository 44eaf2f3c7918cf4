//! Facecursor Gesture Core
//!
//! Turns a stream of face observations into cursor decisions:
//! - **Calibration:** Collect a baseline window of mouth positions and derive
//!   the neutral reference point and dead-zone ratios
//! - **Cursor Mapping:** Convert a live mouth position into a bounded cursor move
//! - **Debouncing:** Turn held smile/blink flags into discrete clicks
//! - **Tracking:** Pick the one face per frame that drives the cursor
//!
//! This crate is pure computation: no I/O, no clocks, no platform
//! dependencies. Timestamps are passed in by the caller.

pub mod calibration;
pub mod cursor_map;
pub mod debounce;
pub mod tracking;

pub use calibration::{CalibrationProgress, CalibrationResult, Calibrator, SampleWindow};
pub use cursor_map::{CursorMapper, MappingParams};
pub use debounce::GestureDebouncer;
pub use tracking::TrackingSelector;
