use crate::domain::model::{QuoteEscaping, VotePolicy};
use crate::utils::error::{ExportError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub source: SourceConfig,
    pub selectors: SelectorConfig,
    pub format: FormatConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
    /// Chrome/Chromium binary for the `browser` feature; auto-detected when unset.
    pub chrome_executable: Option<String>,
}

/// CSS selectors used to pull the board out of a rendered page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub board_title: String,
    pub column: String,
    pub column_title: String,
    pub card: String,
    pub card_message: String,
    pub card_votes: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            board_title: ".board-name".to_string(),
            column: ".easy-card-list".to_string(),
            column_title: ".column-header".to_string(),
            card: ".easy-board-front".to_string(),
            card_message: ".easy-card-main .easy-card-main-content .text".to_string(),
            card_votes: ".easy-card-votes-container .easy-badge-votes".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    pub escaping: QuoteEscaping,
    pub on_invalid_votes: VotePolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: Option<String>,
    pub extension: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: None,
            extension: crate::core::naming::DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl ExportConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ExportError::ConfigValidation {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${RETRO_OUTPUT_DIR})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        let re = env_var_pattern();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }
}

fn env_var_pattern() -> &'static regex::Regex {
    static PATTERN: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
    PATTERN.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("static pattern is valid")
    })
}

impl Validate for SelectorConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_selector("selectors.board_title", &self.board_title)?;
        validation::validate_selector("selectors.column", &self.column)?;
        validation::validate_selector("selectors.column_title", &self.column_title)?;
        validation::validate_selector("selectors.card", &self.card)?;
        validation::validate_selector("selectors.card_message", &self.card_message)?;
        validation::validate_selector("selectors.card_votes", &self.card_votes)?;
        Ok(())
    }
}

impl Validate for ExportConfig {
    fn validate(&self) -> Result<()> {
        if let Some(timeout) = self.source.timeout_seconds {
            validation::validate_positive_number("source.timeout_seconds", timeout, 1)?;
        }
        if let Some(agent) = &self.source.user_agent {
            validation::validate_non_empty_string("source.user_agent", agent)?;
        }
        if let Some(chrome) = &self.source.chrome_executable {
            validation::validate_path("source.chrome_executable", chrome)?;
        }

        self.selectors.validate()?;

        validation::validate_extension("output.extension", &self.output.extension)?;
        if let Some(directory) = &self.output.directory {
            validation::validate_path("output.directory", directory)?;
        }

        Ok(())
    }
}
