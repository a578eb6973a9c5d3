use crate::core::etl::{trace_stage, Stage};
use crate::domain::model::{Board, Column, ExportDocument, OutputRow, QuoteEscaping};
use crate::utils::error::{ExportError, Result};

const DELIMITER: &str = ",";

/// Column titles joined with `,`, newline terminated. Titles are written as-is.
pub fn build_header<'a, I>(titles: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut header = titles.into_iter().collect::<Vec<_>>().join(DELIMITER);
    header.push('\n');
    header
}

fn quote_cell(message: &str, escaping: QuoteEscaping) -> String {
    match escaping {
        QuoteEscaping::Legacy => format!("\"{}\"", message),
        QuoteEscaping::Double => format!("\"{}\"", message.replace('"', "\"\"")),
    }
}

/// Aligns the ragged card lists into rows.
///
/// Row `i` holds the `i`-th card of every column. Slots past the end of a
/// column, and cards without a positive vote count, become empty cells so
/// every row has exactly one cell per column.
pub fn align_rows(columns: &[Column], escaping: QuoteEscaping) -> Vec<OutputRow> {
    let max_len = columns.iter().map(|c| c.cards.len()).max().unwrap_or(0);

    (0..max_len)
        .map(|i| OutputRow {
            cells: columns
                .iter()
                .map(|column| match column.cards.get(i) {
                    Some(card) if card.qualifies() => quote_cell(&card.message, escaping),
                    _ => String::new(),
                })
                .collect(),
        })
        .collect()
}

pub fn render_row(row: &OutputRow) -> String {
    let mut line = row.cells.join(DELIMITER);
    line.push('\n');
    line
}

pub fn assemble(header: &str, rows: &[OutputRow]) -> String {
    rows.iter().fold(header.to_string(), |mut text, row| {
        text.push_str(&render_row(row));
        text
    })
}

pub fn transform_board(board: &Board, escaping: QuoteEscaping) -> Result<ExportDocument> {
    if board.title.trim().is_empty() {
        return Err(ExportError::MissingTitle);
    }

    let header = build_header(board.column_titles());
    trace_stage(Stage::HeaderBuilt);

    let rows = align_rows(&board.columns, escaping);
    tracing::debug!("Aligned {} rows", rows.len());
    trace_stage(Stage::RowsBuilt);

    Ok(ExportDocument {
        title: board.title.clone(),
        text: assemble(&header, &rows),
        column_count: board.columns.len(),
        row_count: rows.len(),
    })
}
