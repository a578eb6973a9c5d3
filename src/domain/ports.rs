use crate::domain::model::{Board, ExportDocument};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// 提供看板資料的來源 (網頁、本機檔案或快照)
pub trait BoardSource: Send + Sync {
    fn fetch_board(&self) -> impl std::future::Future<Output = Result<Board>> + Send;
}

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &Path) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &Path,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Board>;
    async fn transform(&self, board: Board) -> Result<ExportDocument>;
    async fn load(&self, document: ExportDocument) -> Result<PathBuf>;
}
