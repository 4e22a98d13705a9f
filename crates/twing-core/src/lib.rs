//! twing core: mirror the images referenced by an xlsx workbook into a local folder tree.
//!
//! [`workbook`] reads records, [`plan`] maps each record to a URL and a path,
//! [`fetch`] downloads one URL to one file, and [`mirror`] drives the run.

pub mod config;
pub mod fetch;
pub mod logging;
pub mod mirror;
pub mod plan;
pub mod workbook;
