//! HTTP front end for live table sessions.
//!
//! Exposes the session store over a small JSON API that viewers poll and a
//! handful of privileged callers mutate. See [`api`] for the route table.

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
