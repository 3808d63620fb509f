//! Standalone HTML renderer for diff reports.

use crate::report::model::{DiffReport, DiffRow, NumberedLine, RenderMode};

const STYLE: &str = "\
body { font-family: sans-serif; margin: 1.5em; }
table.diff { border-collapse: collapse; font-family: monospace; width: 100%; }
table.diff th { background: #e0e0e0; text-align: left; padding: 2px 6px; }
table.diff td { padding: 0 6px; white-space: pre-wrap; vertical-align: top; }
td.num { color: #888; text-align: right; width: 3em; border-right: 1px solid #ccc; }
tr.add td.right { background: #aaffaa; }
tr.del td.left { background: #ffaaaa; }
tr.chg td.left, tr.chg td.right { background: #ffff77; }
tr.hunk td { background: #f0f0ff; color: #555; }
p.identical { color: #2a7a2a; font-weight: bold; }
table.legend td { padding: 2px 8px; }
span.eol { color: #888; font-style: italic; }
";

/// Render a report as a self-contained HTML document
///
/// Output depends only on the report, so rendering the same inputs twice
/// yields identical bytes.
pub fn render_html(report: &DiffReport) -> String {
    let counts = report.counts();
    let label_a = escape(&report.label_a);
    let label_b = escape(&report.label_b);

    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>{} vs {}</title>\n", label_a, label_b));
    out.push_str("<style>\n");
    out.push_str(STYLE);
    out.push_str("</style>\n</head>\n<body>\n");

    let mode = match report.mode {
        RenderMode::FullContext { lines } => format!("full context ({} lines)", lines),
        RenderMode::ChangesOnly => "changes only".to_string(),
    };
    out.push_str(&format!(
        "<p class=\"summary\">{} added, {} removed, {} changed &middot; {}</p>\n",
        counts.added, counts.removed, counts.changed, mode
    ));

    out.push_str("<table class=\"diff\">\n");
    out.push_str(&format!(
        "<thead><tr><th colspan=\"2\" class=\"label-a\">{}</th>\
         <th colspan=\"2\" class=\"label-b\">{}</th></tr></thead>\n",
        label_a, label_b
    ));
    out.push_str("<tbody>\n");
    for hunk in &report.hunks {
        out.push_str(&format!(
            "<tr class=\"hunk\"><td colspan=\"4\">@@ -{},{} +{},{} @@</td></tr>\n",
            hunk.old_start, hunk.old_len, hunk.new_start, hunk.new_len
        ));
        for row in &hunk.rows {
            push_row(&mut out, row);
        }
    }
    out.push_str("</tbody>\n</table>\n");

    if report.is_identical() {
        out.push_str("<p class=\"identical\">No differences</p>\n");
    }

    out.push_str(concat!(
        "<table class=\"legend\"><tr>",
        "<td style=\"background:#aaffaa\">Added</td>",
        "<td style=\"background:#ffff77\">Changed</td>",
        "<td style=\"background:#ffaaaa\">Deleted</td>",
        "</tr></table>\n"
    ));
    out.push_str("</body>\n</html>\n");
    out
}

fn push_row(out: &mut String, row: &DiffRow) {
    out.push_str(&format!("<tr class=\"{}\">", row.kind.css_class()));
    push_cells(out, row.left.as_ref(), "left");
    push_cells(out, row.right.as_ref(), "right");
    out.push_str("</tr>\n");
}

const NO_NEWLINE_MARKER: &str = "<span class=\"eol\">\\ No newline at end of file</span>";

fn push_cells(out: &mut String, line: Option<&NumberedLine>, side: &str) {
    match line {
        Some(line) => out.push_str(&format!(
            "<td class=\"num\">{}</td><td class=\"{}\">{}{}</td>",
            line.number,
            side,
            escape(&line.text),
            if line.missing_newline {
                NO_NEWLINE_MARKER
            } else {
                ""
            }
        )),
        None => out.push_str(&format!(
            "<td class=\"num\"></td><td class=\"{}\"></td>",
            side
        )),
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
