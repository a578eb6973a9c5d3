use crate::config::toml_config::{ExportConfig, SelectorConfig};
use crate::domain::model::{parse_votes, Board, Card, Column, VotePolicy};
use crate::domain::ports::BoardSource;
use crate::utils::error::{ExportError, Result};
use reqwest::Client;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;

struct CompiledSelectors {
    board_title: Selector,
    column: Selector,
    column_title: Selector,
    card: Selector,
    card_message: Selector,
    card_votes: Selector,
}

fn compile(field: &str, selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ExportError::InvalidConfigValue {
        field: format!("selectors.{}", field),
        value: selector.to_string(),
        reason: format!("Invalid CSS selector: {}", e),
    })
}

impl CompiledSelectors {
    fn compile(config: &SelectorConfig) -> Result<Self> {
        Ok(Self {
            board_title: compile("board_title", &config.board_title)?,
            column: compile("column", &config.column)?,
            column_title: compile("column_title", &config.column_title)?,
            card: compile("card", &config.card)?,
            card_message: compile("card_message", &config.card_message)?,
            card_votes: compile("card_votes", &config.card_votes)?,
        })
    }
}

const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr",
    "li", "main", "nav", "ol", "p", "pre", "section", "table", "tr", "ul",
];

fn trim_trailing_spaces(out: &mut String) {
    while out.ends_with(' ') {
        out.pop();
    }
}

fn break_line(out: &mut String) {
    trim_trailing_spaces(out);
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

/// 連續空白縮成一個空格
fn push_collapsed(text: &str, out: &mut String) {
    for c in text.chars() {
        if c.is_whitespace() {
            if !out.is_empty() && !out.ends_with([' ', '\n']) {
                out.push(' ');
            }
        } else {
            out.push(c);
        }
    }
}

fn push_rendered_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => push_collapsed(text, out),
            Node::Element(el) => {
                let Some(child_element) = ElementRef::wrap(child) else {
                    continue;
                };
                match el.name() {
                    "br" => {
                        trim_trailing_spaces(out);
                        out.push('\n');
                    }
                    "script" | "style" | "template" => {}
                    name if BLOCK_ELEMENTS.contains(&name) => {
                        break_line(out);
                        push_rendered_text(child_element, out);
                        break_line(out);
                    }
                    _ => push_rendered_text(child_element, out),
                }
            }
            _ => {}
        }
    }
}

/// Text as a browser would render it: `<br>` and block boundaries become
/// line breaks, other whitespace runs collapse to one space.
fn element_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    push_rendered_text(element, &mut out);
    out.trim().to_string()
}

fn required_text(
    parent: ElementRef<'_>,
    selector: &Selector,
    selector_str: &str,
    location: impl FnOnce() -> String,
) -> Result<String> {
    parent
        .select(selector)
        .next()
        .map(element_text)
        .ok_or_else(|| {
            ExportError::extraction(format!("{} has no '{}' element", location(), selector_str))
        })
}

/// Extracts a board from a rendered board page.
///
/// The title has all whitespace removed, so it can double as a file name.
/// A missing title element yields an empty title, which the transform step
/// rejects. A page without any column, or a column/card missing one of its
/// required parts, is an extraction error.
pub fn parse_board_html(html: &str, selectors: &SelectorConfig, policy: VotePolicy) -> Result<Board> {
    let compiled = CompiledSelectors::compile(selectors)?;

    tracing::debug!("Parsing board page of {} characters", html.len());
    let document = Html::parse_document(html);

    let title = document
        .select(&compiled.board_title)
        .next()
        .map(|node| element_text(node).split_whitespace().collect::<String>())
        .unwrap_or_default();

    let column_elements: Vec<_> = document.select(&compiled.column).collect();
    if column_elements.is_empty() {
        return Err(ExportError::extraction(format!(
            "no '{}' element found; the page is not a rendered board",
            selectors.column
        )));
    }

    let mut columns = Vec::with_capacity(column_elements.len());
    for (column_index, column_element) in column_elements.into_iter().enumerate() {
        let column_title = required_text(
            column_element,
            &compiled.column_title,
            &selectors.column_title,
            || format!("column {}", column_index + 1),
        )?;

        let mut cards = Vec::new();
        for (card_index, card_element) in column_element.select(&compiled.card).enumerate() {
            let location = || format!("card {} of column '{}'", card_index + 1, column_title);

            let message = required_text(
                card_element,
                &compiled.card_message,
                &selectors.card_message,
                location,
            )?;
            let raw_votes = required_text(
                card_element,
                &compiled.card_votes,
                &selectors.card_votes,
                location,
            )?;

            let votes = parse_votes(&raw_votes, &message, policy)?;
            cards.push(Card { message, votes });
        }

        tracing::debug!("Column '{}' has {} cards", column_title, cards.len());
        columns.push(Column {
            title: column_title,
            cards,
        });
    }

    Ok(Board { title, columns })
}

/// Fetches the board page over HTTP and parses the markup as served. Boards
/// built by scripts need the `browser` feature.
#[derive(Debug, Clone)]
pub struct HttpBoardSource {
    url: String,
    client: Client,
    selectors: SelectorConfig,
    policy: VotePolicy,
}

impl HttpBoardSource {
    pub fn new(url: impl Into<String>, config: &ExportConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.source.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(timeout));
        }
        if let Some(agent) = &config.source.user_agent {
            builder = builder.user_agent(agent.clone());
        }

        Ok(Self {
            url: url.into(),
            client: builder.build()?,
            selectors: config.selectors.clone(),
            policy: config.format.on_invalid_votes,
        })
    }
}

impl BoardSource for HttpBoardSource {
    async fn fetch_board(&self) -> Result<Board> {
        tracing::debug!("Making request to: {}", self.url);
        let response = self.client.get(&self.url).send().await?;
        tracing::debug!("Board response status: {}", response.status());

        let body = response.error_for_status()?.text().await?;
        parse_board_html(&body, &self.selectors, self.policy)
    }
}
