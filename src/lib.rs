pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

#[cfg(feature = "browser")]
pub use adapters::BrowserBoardSource;
pub use adapters::{open_source, AnyBoardSource, FileBoardSource, HttpBoardSource, LocalStorage};
pub use config::ExportConfig;
pub use self::core::{etl::ExportEngine, naming::OutputNamer, pipeline::BoardPipeline};
pub use domain::model::{Board, Card, Column, ExportDocument, QuoteEscaping, VotePolicy};
pub use utils::error::{ExportError, Result};
