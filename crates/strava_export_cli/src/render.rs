//! Plain-text rendering of the preview screen.

use strava_export_client::projector::{ActivityRow, Cell, ExportProfile};

/// Rows shown in the preview table.
pub const PREVIEW_ROWS: usize = 10;

const MAX_CELL_WIDTH: usize = 24;

/// `name  type` lines describing the export columns.
pub fn column_list(profile: ExportProfile) -> String {
    let columns = profile.columns();
    let width = columns.iter().map(|c| c.name.len()).max().unwrap_or(0);
    columns
        .iter()
        .map(|c| format!("  {:<width$}  {}\n", c.name, c.kind.label()))
        .collect()
}

fn clip(cell: &Cell) -> String {
    let text = cell.to_string();
    if text.chars().count() <= MAX_CELL_WIDTH {
        return text;
    }
    let mut clipped: String = text.chars().take(MAX_CELL_WIDTH - 1).collect();
    clipped.push('…');
    clipped
}

fn render_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let joined = cells
        .zip(widths)
        .map(|(c, &w)| format!("{c:<w$}"))
        .collect::<Vec<_>>()
        .join("  ");
    format!("{}\n", joined.trim_end())
}

/// The first `limit` rows as an aligned table with a header and a rule.
pub fn preview_table(rows: &[ActivityRow], profile: ExportProfile, limit: usize) -> String {
    let header = profile.header();
    let body: Vec<Vec<String>> = rows
        .iter()
        .take(limit)
        .map(|row| row.cells().iter().map(clip).collect())
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for cells in &body {
        for (w, cell) in widths.iter_mut().zip(cells) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let mut out = render_line(header.iter().copied(), &widths);
    out.push_str(&render_line(rule.iter().map(String::as_str), &widths));
    for cells in &body {
        out.push_str(&render_line(cells.iter().map(String::as_str), &widths));
    }
    if rows.len() > limit {
        out.push_str(&format!("… and {} more\n", rows.len() - limit));
    }
    out
}
