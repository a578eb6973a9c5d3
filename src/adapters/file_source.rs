use crate::adapters::html_source::parse_board_html;
use crate::config::toml_config::{ExportConfig, SelectorConfig};
use crate::domain::model::{Board, VotePolicy};
use crate::domain::ports::BoardSource;
use crate::utils::error::Result;
use std::path::PathBuf;

/// Reads a saved board page, or a `.json` board snapshot, from disk.
#[derive(Debug, Clone)]
pub struct FileBoardSource {
    path: PathBuf,
    selectors: SelectorConfig,
    policy: VotePolicy,
}

impl FileBoardSource {
    pub fn new(path: impl Into<PathBuf>, config: &ExportConfig) -> Self {
        Self {
            path: path.into(),
            selectors: config.selectors.clone(),
            policy: config.format.on_invalid_votes,
        }
    }

    fn is_snapshot(&self) -> bool {
        self.path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
    }
}

impl BoardSource for FileBoardSource {
    async fn fetch_board(&self) -> Result<Board> {
        tracing::debug!("Reading board from: {}", self.path.display());
        let content = tokio::fs::read_to_string(&self.path).await?;

        if self.is_snapshot() {
            Ok(serde_json::from_str(&content)?)
        } else {
            parse_board_html(&content, &self.selectors, self.policy)
        }
    }
}
