pub mod config;
pub mod error;
pub mod service;
pub mod router;
pub mod middleware;
pub mod db;
pub mod handlers;

pub use db::TempleStorage;
pub use error::TempleError;
pub use service::VisitRecorder;
