// Adapters layer: board sources and storage backends.

#[cfg(feature = "browser")]
pub mod browser_source;
pub mod file_source;
pub mod html_source;
pub mod storage;

use crate::config::ExportConfig;
use crate::domain::model::Board;
use crate::domain::ports::BoardSource;
use crate::utils::error::{ExportError, Result};
use url::Url;

#[cfg(feature = "browser")]
pub use browser_source::BrowserBoardSource;
pub use file_source::FileBoardSource;
pub use html_source::{parse_board_html, HttpBoardSource};
pub use storage::LocalStorage;

/// Board source picked from the command line argument.
#[derive(Debug, Clone)]
pub enum AnyBoardSource {
    Http(HttpBoardSource),
    #[cfg(feature = "browser")]
    Browser(BrowserBoardSource),
    File(FileBoardSource),
}

#[cfg(feature = "browser")]
fn web_source(source: &str, config: &ExportConfig) -> Result<AnyBoardSource> {
    Ok(AnyBoardSource::Browser(BrowserBoardSource::new(source, config)))
}

#[cfg(not(feature = "browser"))]
fn web_source(source: &str, config: &ExportConfig) -> Result<AnyBoardSource> {
    Ok(AnyBoardSource::Http(HttpBoardSource::new(source, config)?))
}

/// `http(s)://` is rendered in headless Chrome with the `browser` feature and
/// fetched as plain HTML without it. `file://` and plain paths are read from disk.
pub fn open_source(source: &str, config: &ExportConfig) -> Result<AnyBoardSource> {
    if !source.contains("://") {
        return Ok(AnyBoardSource::File(FileBoardSource::new(source, config)));
    }

    let url = Url::parse(source).map_err(|e| ExportError::InvalidConfigValue {
        field: "source".to_string(),
        value: source.to_string(),
        reason: format!("Invalid URL format: {}", e),
    })?;

    match url.scheme() {
        "http" | "https" => web_source(source, config),
        "file" => {
            let path = url.to_file_path().map_err(|_| ExportError::InvalidConfigValue {
                field: "source".to_string(),
                value: source.to_string(),
                reason: "file URL does not name a local path".to_string(),
            })?;
            Ok(AnyBoardSource::File(FileBoardSource::new(path, config)))
        }
        scheme => Err(ExportError::InvalidConfigValue {
            field: "source".to_string(),
            value: source.to_string(),
            reason: format!("Unsupported URL scheme: {}", scheme),
        }),
    }
}

impl BoardSource for AnyBoardSource {
    async fn fetch_board(&self) -> Result<Board> {
        match self {
            Self::Http(source) => source.fetch_board().await,
            #[cfg(feature = "browser")]
            Self::Browser(source) => source.fetch_board().await,
            Self::File(source) => source.fetch_board().await,
        }
    }
}
