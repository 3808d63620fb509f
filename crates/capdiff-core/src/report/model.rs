//! Diff report row model.
//!
//! The HTML writer only consumes this model, so tests can assert on counts
//! and row kinds without parsing markup.

/// How much unchanged text surrounds each change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Show up to `lines` unchanged lines around every change
    FullContext { lines: usize },
    /// Show changed regions only
    ChangesOnly,
}

impl RenderMode {
    /// Context used by the inventory-driven diff flow
    pub const DEFAULT_CONTEXT_LINES: usize = 500;

    pub fn full_context() -> Self {
        RenderMode::FullContext {
            lines: Self::DEFAULT_CONTEXT_LINES,
        }
    }

    pub fn context_len(&self) -> usize {
        match self {
            RenderMode::FullContext { lines } => *lines,
            RenderMode::ChangesOnly => 0,
        }
    }
}

/// Classification of one side-by-side row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Unchanged,
    /// Only on the right side
    Added,
    /// Only on the left side
    Removed,
    /// Left line replaced by right line
    Changed,
}

impl RowKind {
    /// CSS class used by the HTML writer
    pub fn css_class(&self) -> &'static str {
        match self {
            RowKind::Unchanged => "ctx",
            RowKind::Added => "add",
            RowKind::Removed => "del",
            RowKind::Changed => "chg",
        }
    }
}

/// A line with its 1-based number on its side
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedLine {
    pub number: usize,
    /// Line text without its terminator
    pub text: String,
    /// Last line of its side and not newline-terminated
    pub missing_newline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffRow {
    pub kind: RowKind,
    pub left: Option<NumberedLine>,
    pub right: Option<NumberedLine>,
}

/// One contiguous changed region plus its context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffHunk {
    pub old_start: usize,
    pub old_len: usize,
    pub new_start: usize,
    pub new_len: usize,
    pub rows: Vec<DiffRow>,
}

/// Row counts per kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffCounts {
    pub unchanged: usize,
    pub added: usize,
    pub removed: usize,
    pub changed: usize,
}

impl DiffCounts {
    pub fn total_changes(&self) -> usize {
        self.added + self.removed + self.changed
    }
}

/// A complete comparison between two artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffReport {
    /// Left side label (the earlier window)
    pub label_a: String,
    /// Right side label (the later window)
    pub label_b: String,
    pub mode: RenderMode,
    pub hunks: Vec<DiffHunk>,
}

impl DiffReport {
    pub fn counts(&self) -> DiffCounts {
        let mut counts = DiffCounts::default();
        for row in self.hunks.iter().flat_map(|h| h.rows.iter()) {
            match row.kind {
                RowKind::Unchanged => counts.unchanged += 1,
                RowKind::Added => counts.added += 1,
                RowKind::Removed => counts.removed += 1,
                RowKind::Changed => counts.changed += 1,
            }
        }
        counts
    }

    pub fn is_identical(&self) -> bool {
        self.counts().total_changes() == 0
    }
}
