//! Timers, cancellation and logging shared by every page component

pub mod stop;
pub mod time_source;
pub mod tracing_setup;
pub mod warning_log;
