use crate::adapters::html_source::parse_board_html;
use crate::config::toml_config::{ExportConfig, SelectorConfig};
use crate::domain::model::{Board, VotePolicy};
use crate::domain::ports::BoardSource;
use crate::utils::error::{ExportError, Result};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::error::CdpError;
use futures::StreamExt;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_RENDER_WAIT: Duration = Duration::from_secs(30);
const POLL_INTERVAL: Duration = Duration::from_millis(250);

fn browser_error(e: CdpError) -> ExportError {
    ExportError::extraction(format!("Headless browser error: {e}"))
}

/// Loads the board page in headless Chrome and parses the DOM once the board
/// script has inserted its columns. The served markup of a public board is an
/// empty shell, so plain HTTP only works for pre-rendered pages.
#[derive(Debug, Clone)]
pub struct BrowserBoardSource {
    url: String,
    selectors: SelectorConfig,
    policy: VotePolicy,
    wait: Duration,
    chrome_executable: Option<PathBuf>,
    user_agent: Option<String>,
}

impl BrowserBoardSource {
    pub fn new(url: impl Into<String>, config: &ExportConfig) -> Self {
        Self {
            url: url.into(),
            selectors: config.selectors.clone(),
            policy: config.format.on_invalid_votes,
            wait: config
                .source
                .timeout_seconds
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_RENDER_WAIT),
            chrome_executable: config.source.chrome_executable.as_ref().map(PathBuf::from),
            user_agent: config.source.user_agent.clone(),
        }
    }

    fn browser_config(&self) -> Result<BrowserConfig> {
        let mut args = vec![
            "--no-sandbox".to_string(),
            "--disable-dev-shm-usage".to_string(),
            "--no-first-run".to_string(),
        ];
        if let Some(agent) = &self.user_agent {
            args.push(format!("--user-agent={agent}"));
        }

        let mut builder = BrowserConfig::builder().args(args);
        if let Some(chrome) = &self.chrome_executable {
            builder = builder.chrome_executable(chrome);
        }

        builder
            .build()
            .map_err(|e| ExportError::extraction(format!("Failed to build browser config: {e}")))
    }

    async fn render(&self, browser: &Browser) -> Result<String> {
        let page = browser
            .new_page(self.url.as_str())
            .await
            .map_err(browser_error)?;

        // 等待前端腳本把欄位畫出來
        let column = self.selectors.column.as_str();
        let appeared = tokio::time::timeout(self.wait, async {
            while page.find_element(column).await.is_err() {
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        })
        .await;

        if appeared.is_err() {
            return Err(ExportError::extraction(format!(
                "no '{}' element appeared within {:?}; the page is not a rendered board",
                column, self.wait
            )));
        }

        page.content().await.map_err(browser_error)
    }
}

impl BoardSource for BrowserBoardSource {
    async fn fetch_board(&self) -> Result<Board> {
        tracing::debug!("Rendering {} in headless browser", self.url);

        let (mut browser, mut handler) = Browser::launch(self.browser_config()?)
            .await
            .map_err(browser_error)?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("CDP message error (continuing): {}", e);
                }
            }
        });

        let rendered = self.render(&browser).await;

        if let Err(e) = browser.close().await {
            tracing::debug!("Browser close error (ignored): {}", e);
        }
        handler_task.abort();

        let html = rendered?;
        tracing::debug!("Rendered page has {} characters", html.len());
        parse_board_html(&html, &self.selectors, self.policy)
    }
}
