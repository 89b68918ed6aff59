//! Core library for comparing shallow water simulation runs.
//!
//! The pipeline scans configured run folders for structured-grid result
//! files, reconciles their time indices into a render plan, assembles
//! per-index frames with water-mass conservation tracking, and compares
//! run timing logs. Collection manifests get the same treatment along
//! their own listing.

pub mod common;
pub mod domain;
pub mod modules;
pub mod numerics;
