pub mod commands;
pub mod download;
pub mod error;
pub mod flow;
pub mod history;
pub mod http;
pub mod platform;
pub mod release;
pub mod runtime;

pub use error::FlowError;
pub use flow::DownloadFlow;
pub use release::ReleaseCatalog;
