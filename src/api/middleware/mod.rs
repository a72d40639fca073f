//! API middleware stack.

pub mod access_log;
