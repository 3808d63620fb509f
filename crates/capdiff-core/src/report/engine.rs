//! Report computation.
//!
//! Runs the line diff primitive over two loaded artifacts and folds its hunks
//! into side-by-side rows. A run of removed lines directly followed by a run
//! of added lines is paired row by row as `Changed`.

use crate::content::LoadedContent;
use crate::report::model::{DiffHunk, DiffReport, DiffRow, NumberedLine, RenderMode, RowKind};
use diffy::{DiffOptions, Hunk, Line};

/// Compute the structured report for two artifacts
///
/// Identical inputs produce a report without hunks.
pub fn compute_report(
    content_a: &LoadedContent,
    content_b: &LoadedContent,
    label_a: &str,
    label_b: &str,
    mode: RenderMode,
) -> DiffReport {
    let old_text: String = content_a.lines().concat();
    let new_text: String = content_b.lines().concat();

    let mut options = DiffOptions::new();
    options.set_context_len(mode.context_len());
    let patch = options.create_patch(&old_text, &new_text);

    DiffReport {
        label_a: label_a.to_string(),
        label_b: label_b.to_string(),
        mode,
        hunks: patch.hunks().iter().map(convert_hunk).collect(),
    }
}

fn convert_hunk(hunk: &Hunk<'_, str>) -> DiffHunk {
    let old_range = hunk.old_range();
    let new_range = hunk.new_range();
    let mut old_no = old_range.start();
    let mut new_no = new_range.start();

    let mut rows = Vec::new();
    let mut removed: Vec<NumberedLine> = Vec::new();
    let mut added: Vec<NumberedLine> = Vec::new();

    for line in hunk.lines() {
        match line {
            Line::Context(text) => {
                flush_change_block(&mut rows, &mut removed, &mut added);
                rows.push(DiffRow {
                    kind: RowKind::Unchanged,
                    left: Some(numbered(old_no, text)),
                    right: Some(numbered(new_no, text)),
                });
                old_no += 1;
                new_no += 1;
            }
            Line::Delete(text) => {
                // a delete after inserts starts a new block
                if !added.is_empty() {
                    flush_change_block(&mut rows, &mut removed, &mut added);
                }
                removed.push(numbered(old_no, text));
                old_no += 1;
            }
            Line::Insert(text) => {
                added.push(numbered(new_no, text));
                new_no += 1;
            }
        }
    }
    flush_change_block(&mut rows, &mut removed, &mut added);

    DiffHunk {
        old_start: old_range.start(),
        old_len: old_range.len(),
        new_start: new_range.start(),
        new_len: new_range.len(),
        rows,
    }
}

fn flush_change_block(
    rows: &mut Vec<DiffRow>,
    removed: &mut Vec<NumberedLine>,
    added: &mut Vec<NumberedLine>,
) {
    let mut left = removed.drain(..);
    let mut right = added.drain(..);
    loop {
        let row = match (left.next(), right.next()) {
            (Some(l), Some(r)) => DiffRow {
                kind: RowKind::Changed,
                left: Some(l),
                right: Some(r),
            },
            (Some(l), None) => DiffRow {
                kind: RowKind::Removed,
                left: Some(l),
                right: None,
            },
            (None, Some(r)) => DiffRow {
                kind: RowKind::Added,
                left: None,
                right: Some(r),
            },
            (None, None) => break,
        };
        rows.push(row);
    }
}

fn numbered(number: usize, text: &str) -> NumberedLine {
    NumberedLine {
        number,
        text: text.trim_end_matches(|c| c == '\n' || c == '\r').to_string(),
        missing_newline: !text.ends_with('\n'),
    }
}
