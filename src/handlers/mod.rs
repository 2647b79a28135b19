//! HTTP handlers, one module per resource.

pub mod auth;
pub mod devotees;
pub mod reports;
pub mod visits;

use chrono::{Local, NaiveDateTime};

/// Wall-clock time in the server's local zone; visits and reports use it.
pub(crate) fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}
