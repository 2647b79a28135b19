//! Domain services sitting between the HTTP handlers and `TempleStorage`.

pub mod accounts;
pub mod devotees;
pub mod label;
pub mod reports;
pub mod visits;

pub use label::{LabelData, render_prn, validate_label_data};
pub use reports::{Report, ReportKind};
pub use visits::{PrintData, VisitRecorder};
