//! Live readout of a motion or orientation sensor.
//!
//! One sensor handle is started once; each reading it delivers is rendered
//! as a snapshot or as a running sum and written to a single output surface.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod readout;
pub mod sensors;
pub mod service;
