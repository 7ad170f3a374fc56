//! Calibration artefacts for qlinear
//!
//! Writes the per-tensor ranges collected during calibration as JSON, a
//! binary key/value table and a plain-text cache, and provides the histogram
//! smoothing used before comparing distributions.

pub mod smooth;
pub mod table;

pub use smooth::{DEFAULT_SMOOTHING_EPS, smooth_distribution};
pub use table::{
    CalibrationCache, CalibrationTablePaths, KeyValue, read_calibration_binary,
    read_calibration_json, write_calibration_table, write_calibration_table_with_config,
};
