//! Facecursor Face Model
//!
//! Defines the data contracts shared by the tracking pipeline:
//! - **Observations:** Per-face detector output for one frame
//! - **Geometry:** Points and the display rectangle the cursor lives in
//! - **Gestures:** Gesture kinds and the click-driving gesture selection
//! - **Records:** JSONL frame recordings and emitted cursor actions
//!
//! Mouth positions are in detector image coordinates; cursor positions are
//! in display points. The two spaces are related only through calibration.

pub mod geometry;
pub mod gesture;
pub mod observation;
pub mod record;

pub use geometry::*;
pub use gesture::*;
pub use observation::*;
pub use record::*;
