use crate::core::etl::{trace_stage, Stage};
use crate::core::naming::OutputNamer;
use crate::core::transform::transform_board;
use crate::domain::model::{Board, ExportDocument, QuoteEscaping};
use crate::domain::ports::{BoardSource, Pipeline, Storage};
use crate::utils::error::Result;
use std::path::PathBuf;

pub struct BoardPipeline<B: BoardSource, S: Storage> {
    source: B,
    storage: S,
    namer: OutputNamer,
    output_override: Option<String>,
    escaping: QuoteEscaping,
}

impl<B: BoardSource, S: Storage> BoardPipeline<B, S> {
    pub fn new(source: B, storage: S, namer: OutputNamer) -> Self {
        Self {
            source,
            storage,
            namer,
            output_override: None,
            escaping: QuoteEscaping::default(),
        }
    }

    pub fn with_output(mut self, output: Option<String>) -> Self {
        self.output_override = output;
        self
    }

    pub fn with_escaping(mut self, escaping: QuoteEscaping) -> Self {
        self.escaping = escaping;
        self
    }
}

#[async_trait::async_trait]
impl<B: BoardSource, S: Storage> Pipeline for BoardPipeline<B, S> {
    async fn extract(&self) -> Result<Board> {
        let board = self.source.fetch_board().await?;
        tracing::debug!(
            "Board '{}' has {} columns and {} cards",
            board.title,
            board.columns.len(),
            board.card_count()
        );
        Ok(board)
    }

    async fn transform(&self, board: Board) -> Result<ExportDocument> {
        transform_board(&board, self.escaping)
    }

    async fn load(&self, document: ExportDocument) -> Result<PathBuf> {
        let path = self
            .namer
            .resolve(self.output_override.as_deref(), &document.title);
        trace_stage(Stage::Named);

        tracing::debug!(
            "Writing {} bytes to {}",
            document.text.len(),
            path.display()
        );
        self.storage.write_file(&path, document.text.as_bytes()).await?;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Card, Column};
    use crate::utils::error::ExportError;
    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct StaticSource(Board);

    impl BoardSource for StaticSource {
        async fn fetch_board(&self) -> Result<Board> {
            Ok(self.0.clone())
        }
    }

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<PathBuf, Vec<u8>>>>,
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                ExportError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path.display()),
                ))
            })
        }

        async fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_path_buf(), data.to_vec());
            Ok(())
        }
    }

    fn sample_board() -> Board {
        Board {
            title: "Sprint42".to_string(),
            columns: vec![
                Column::new("ToImprove", vec![Card::new("Faster CI", 3)]),
                Column::new("Kudos", vec![]),
            ],
        }
    }

    #[tokio::test]
    async fn test_load_writes_to_default_path() {
        let storage = MockStorage::default();
        let pipeline = BoardPipeline::new(
            StaticSource(sample_board()),
            storage.clone(),
            OutputNamer::new("/work/tools"),
        );

        let board = pipeline.extract().await.unwrap();
        let document = pipeline.transform(board).await.unwrap();
        let path = pipeline.load(document).await.unwrap();

        assert_eq!(path, PathBuf::from("/work/Sprint42.txt"));
        assert_eq!(
            storage.read_file(&path).await.unwrap(),
            b"ToImprove,Kudos\n\"Faster CI\",\n"
        );
    }

    #[tokio::test]
    async fn test_output_override() {
        let storage = MockStorage::default();
        let pipeline = BoardPipeline::new(
            StaticSource(sample_board()),
            storage.clone(),
            OutputNamer::new("/work/tools"),
        )
        .with_output(Some("retro.csv".to_string()));

        let board = pipeline.extract().await.unwrap();
        let document = pipeline.transform(board).await.unwrap();
        let path = pipeline.load(document).await.unwrap();

        assert_eq!(path, PathBuf::from("/work/tools/retro.csv"));
    }
}
