//! Apexline - motorsport lap telemetry analysis
//!
//! This library aligns per-lap telemetry onto a shared distance grid, splits
//! each driver's race into tyre stints, estimates tyre degradation per stint
//! and explains where one lap gains time on another (corner minimum speed,
//! braking point, throttle application, top speed).
//!
//! Everything here is a pure function of in-memory records; fetching the
//! session data is left to the caller.

pub mod cli;
pub mod compare;
pub mod config;
pub mod degradation;
pub mod error;
pub mod records;
pub mod report;
pub mod resample;
pub mod session;
pub mod stint;

pub use error::{AnalysisError, Result};
