//! tracehound
//!
//! Log analysis and correlation: scans application logs for level and
//! hourly histograms, error tokens, and stack traces, correlates traces
//! with code context, and assembles markdown reports. A polling watcher
//! mirrors error/warning lines from a remote log into a local artifact.

pub mod config;
pub mod run;
pub mod watcher;

pub use run::{run_analysis, AnalyzeOptions};
pub use watcher::LogWatcher;
