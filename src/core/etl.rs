use crate::core::Pipeline;
use crate::domain::model::ExportDocument;
use crate::utils::error::Result;
use crate::utils::monitor::PhaseMonitor;
use std::fmt;
use std::path::PathBuf;

/// Steps of a run, in the order they are reached. A failure ends the run at
/// whichever step detected it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    Extracted,
    HeaderBuilt,
    RowsBuilt,
    Assembled,
    Named,
    Written,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Start => "start",
            Stage::Extracted => "extracted",
            Stage::HeaderBuilt => "header_built",
            Stage::RowsBuilt => "rows_built",
            Stage::Assembled => "assembled",
            Stage::Named => "named",
            Stage::Written => "written",
        };
        f.write_str(name)
    }
}

pub(crate) fn trace_stage(stage: Stage) {
    tracing::debug!("Stage reached: {}", stage);
}

pub struct ExportEngine<P: Pipeline> {
    pipeline: P,
    monitor: PhaseMonitor,
}

impl<P: Pipeline> ExportEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        let monitor = PhaseMonitor::new(monitor_enabled);
        if monitor.is_enabled() {
            tracing::info!("🔍 Stage monitoring enabled");
        }

        Self { pipeline, monitor }
    }

    fn enter(&self, stage: Stage) {
        trace_stage(stage);
        self.monitor.log_stats(&stage.to_string());
    }

    /// Extract and transform only; nothing is written.
    pub async fn preview(&self) -> Result<ExportDocument> {
        self.enter(Stage::Start);

        tracing::info!("📥 Extracting board...");
        let board = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted board '{}' ({} columns, {} cards)",
            board.title,
            board.columns.len(),
            board.card_count()
        );
        self.enter(Stage::Extracted);

        tracing::info!("🔄 Transforming board...");
        let document = self.pipeline.transform(board).await?;
        tracing::info!(
            "Assembled {} rows across {} columns",
            document.row_count,
            document.column_count
        );
        self.enter(Stage::Assembled);

        Ok(document)
    }

    /// Runs every stage in order and returns the written path. The first
    /// failure stops the run, and nothing is written unless the text was
    /// fully assembled.
    pub async fn run(&self) -> Result<PathBuf> {
        let document = self.preview().await?;

        tracing::info!("💾 Writing export...");
        let output_path = self.pipeline.load(document).await?;
        self.enter(Stage::Written);

        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Board;
    use crate::utils::error::ExportError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingPipeline {
        title: &'static str,
        loads: AtomicUsize,
    }

    #[async_trait]
    impl Pipeline for CountingPipeline {
        async fn extract(&self) -> Result<Board> {
            Ok(Board {
                title: self.title.to_string(),
                columns: vec![],
            })
        }

        async fn transform(&self, board: Board) -> Result<ExportDocument> {
            crate::core::transform::transform_board(&board, Default::default())
        }

        async fn load(&self, document: ExportDocument) -> Result<PathBuf> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(PathBuf::from(format!("/out/{}.txt", document.title)))
        }
    }

    #[tokio::test]
    async fn test_run_reaches_load() {
        let engine = ExportEngine::new(CountingPipeline {
            title: "Retro",
            loads: AtomicUsize::new(0),
        });

        let path = engine.run().await.unwrap();
        assert_eq!(path, PathBuf::from("/out/Retro.txt"));
        assert_eq!(engine.pipeline.loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_transform_never_loads() {
        let engine = ExportEngine::new(CountingPipeline {
            title: "",
            loads: AtomicUsize::new(0),
        });

        assert!(matches!(engine.run().await, Err(ExportError::MissingTitle)));
        assert_eq!(engine.pipeline.loads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_preview_does_not_load() {
        let engine = ExportEngine::new(CountingPipeline {
            title: "Retro",
            loads: AtomicUsize::new(0),
        });

        let document = engine.preview().await.unwrap();
        assert_eq!(document.text, "\n");
        assert_eq!(engine.pipeline.loads.load(Ordering::SeqCst), 0);
    }

    #[cfg(feature = "cli")]
    #[tokio::test]
    async fn test_monitored_run() {
        let engine = ExportEngine::new_with_monitoring(
            CountingPipeline {
                title: "Retro",
                loads: AtomicUsize::new(0),
            },
            true,
        );
        assert!(engine.monitor.is_enabled());

        engine.run().await.unwrap();
        assert_eq!(engine.pipeline.loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_stage_display() {
        let names: Vec<String> = [
            Stage::Start,
            Stage::Extracted,
            Stage::HeaderBuilt,
            Stage::RowsBuilt,
            Stage::Assembled,
            Stage::Named,
            Stage::Written,
        ]
        .iter()
        .map(|stage| stage.to_string())
        .collect();

        assert_eq!(
            names,
            vec![
                "start",
                "extracted",
                "header_built",
                "rows_built",
                "assembled",
                "named",
                "written"
            ]
        );
    }
}
