use retro_etl::core::transform::{align_rows, build_header, render_row, transform_board};
use retro_etl::{Board, Card, Column, ExportError, QuoteEscaping};

/// Boards of varying shape: zero to four columns, ragged card lists and a mix
/// of positive, zero and negative votes.
fn sample_boards() -> Vec<Board> {
    let mut boards = Vec::new();
    for column_count in 0..=4usize {
        for seed in 0..6i64 {
            let columns = (0..column_count)
                .map(|c| {
                    let card_count = ((seed + c as i64 * 2) % 5) as usize;
                    let cards = (0..card_count)
                        .map(|k| {
                            let votes = (seed + c as i64 + k as i64) % 4 - 1;
                            Card::new(format!("c{c}-k{k}"), votes)
                        })
                        .collect();
                    Column::new(format!("Col{c}"), cards)
                })
                .collect();
            boards.push(Board {
                title: format!("Board{column_count}x{seed}"),
                columns,
            });
        }
    }
    boards
}

#[test]
fn test_header_has_one_title_per_column() {
    for board in sample_boards() {
        let header = build_header(board.column_titles());
        let line = header.strip_suffix('\n').unwrap();

        assert!(!line.ends_with(','));
        if board.columns.is_empty() {
            assert!(line.is_empty());
        } else {
            assert_eq!(line.split(',').count(), board.columns.len());
        }
    }
}

#[test]
fn test_rows_are_aligned_to_the_longest_column() {
    for board in sample_boards() {
        let rows = align_rows(&board.columns, QuoteEscaping::Double);
        let longest = board.columns.iter().map(|c| c.cards.len()).max().unwrap_or(0);

        assert_eq!(rows.len(), longest);
        for row in &rows {
            assert_eq!(row.cells.len(), board.columns.len());
            let line = render_row(row);
            assert_eq!(line.matches(',').count(), board.columns.len() - 1);
            assert!(line.ends_with('\n'));
        }
    }
}

#[test]
fn test_message_present_iff_card_has_votes() {
    for board in sample_boards() {
        let rows = align_rows(&board.columns, QuoteEscaping::Double);

        for (j, column) in board.columns.iter().enumerate() {
            for (i, row) in rows.iter().enumerate() {
                let cell = &row.cells[j];
                match column.cards.get(i) {
                    Some(card) if card.votes > 0 => {
                        assert_eq!(cell, &format!("\"{}\"", card.message))
                    }
                    _ => assert!(cell.is_empty()),
                }
            }
        }
    }
}

#[test]
fn test_text_is_header_then_rows() {
    for board in sample_boards() {
        let document = transform_board(&board, QuoteEscaping::Double).unwrap();
        let rows = align_rows(&board.columns, QuoteEscaping::Double);

        let expected: String = std::iter::once(build_header(board.column_titles()))
            .chain(rows.iter().map(render_row))
            .collect();
        assert_eq!(document.text, expected);
        assert_eq!(document.text.lines().count(), rows.len() + 1);
        assert!(!document.text.starts_with('\n') || board.columns.is_empty());
    }
}

#[test]
fn test_transform_is_deterministic() {
    for board in sample_boards() {
        let first = transform_board(&board, QuoteEscaping::Double).unwrap();
        let second = transform_board(&board.clone(), QuoteEscaping::Double).unwrap();
        assert_eq!(first.text.as_bytes(), second.text.as_bytes());
    }
}

#[test]
fn test_documented_examples() {
    let board = Board {
        title: "Retro".to_string(),
        columns: vec![
            Column::new("ToImprove", vec![Card::new("Faster CI", 3)]),
            Column::new("Kudos", vec![]),
        ],
    };
    let document = transform_board(&board, QuoteEscaping::Double).unwrap();
    assert_eq!(document.text, "ToImprove,Kudos\n\"Faster CI\",\n");

    let board = Board {
        title: "Retro".to_string(),
        columns: vec![
            Column::new("A", vec![Card::new("x", 0)]),
            Column::new("B", vec![]),
        ],
    };
    let document = transform_board(&board, QuoteEscaping::Double).unwrap();
    assert_eq!(document.text, "A,B\n,\n");

    let board = Board {
        title: "Retro".to_string(),
        columns: vec![],
    };
    assert_eq!(
        transform_board(&board, QuoteEscaping::Double).unwrap().text,
        "\n"
    );

    let board = Board {
        title: String::new(),
        columns: vec![Column::new("A", vec![Card::new("x", 1)])],
    };
    assert!(matches!(
        transform_board(&board, QuoteEscaping::Double),
        Err(ExportError::MissingTitle)
    ));
}
