pub mod etl;
pub mod naming;
pub mod pipeline;
pub mod transform;

pub use crate::domain::model::{Board, Card, Column, ExportDocument, OutputRow};
pub use crate::domain::ports::{BoardSource, Pipeline, Storage};
pub use crate::utils::error::Result;
