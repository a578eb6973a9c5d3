use crate::utils::error::{ExportError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub message: String,
    pub votes: i64,
}

impl Card {
    pub fn new(message: impl Into<String>, votes: i64) -> Self {
        Self {
            message: message.into(),
            votes,
        }
    }

    /// 只有得票數大於零的卡片會輸出內容
    pub fn qualifies(&self) -> bool {
        self.votes > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub title: String,
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl Column {
    pub fn new(title: impl Into<String>, cards: Vec<Card>) -> Self {
        Self {
            title: title.into(),
            cards,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub columns: Vec<Column>,
}

impl Board {
    pub fn column_titles(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.title.as_str())
    }

    pub fn card_count(&self) -> usize {
        self.columns.iter().map(|c| c.cards.len()).sum()
    }
}

/// One aligned body line: a cell per column, empty when the slot has no qualifying card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    pub title: String,
    pub text: String,
    pub column_count: usize,
    pub row_count: usize,
}

/// How a non-numeric vote badge is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VotePolicy {
    #[default]
    Zero,
    Reject,
}

/// How quotes embedded in a card message are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteEscaping {
    /// Message copied verbatim between the quotes.
    Legacy,
    /// Embedded `"` doubled, as standard CSV readers expect.
    #[default]
    Double,
}

pub fn parse_votes(raw: &str, message: &str, policy: VotePolicy) -> Result<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }

    if let Ok(votes) = trimmed.parse::<i64>() {
        return Ok(votes);
    }

    // 小數票數向上取整，使 > 0 的判斷不變 (0.5 仍算有票)
    match trimmed.parse::<f64>() {
        Ok(votes) if votes.is_finite() => Ok(votes.ceil() as i64),
        _ => match policy {
            VotePolicy::Zero => {
                tracing::warn!(
                    "⚠️ Unreadable vote count '{}' on card '{}', counting as 0",
                    trimmed,
                    message
                );
                Ok(0)
            }
            VotePolicy::Reject => Err(ExportError::InvalidVotes {
                value: trimmed.to_string(),
                message: message.to_string(),
            }),
        },
    }
}
