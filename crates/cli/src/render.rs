//! Plain-text rendering of tables, the attendance sheet and site summaries.

use sitebook_client::services::SiteDetails;
use sitebook_core::attendance_grid::AttendanceGrid;
use sitebook_core::format::{format_amount, format_currency, format_date, format_percentage};
use sitebook_core::models::{SiteAttendance, TransactionCategory};
use sitebook_core::table::{Page, SortValue, Tabular};

/// Currency symbol used for money columns.
pub const CURRENCY: &str = "₹";

const EMPTY_CELL: &str = "-";

pub fn cell_text(value: &SortValue) -> String {
    match value {
        SortValue::Text(s) => s.clone(),
        SortValue::Number(n) => format_amount(*n),
        SortValue::Date(d) => format_date(Some(*d)),
        SortValue::Missing => EMPTY_CELL.to_string(),
    }
}

/// Left-aligned columns separated by two spaces.
fn columns(header: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for line in std::iter::once(header).chain(rows.iter().map(Vec::as_slice)) {
        let padded: Vec<String> = line
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        out.push_str(padded.join("  ").trim_end());
        out.push('\n');
    }
    out
}

/// One page of records with a paging footer.
pub fn render_page<T: Tabular>(page: &Page<&T>) -> String {
    let header: Vec<String> = T::COLUMNS.iter().map(|c| c.to_string()).collect();
    let rows: Vec<Vec<String>> = page
        .items
        .iter()
        .map(|row| T::COLUMNS.iter().map(|c| cell_text(&row.sort_value(c))).collect())
        .collect();

    let mut out = columns(&header, &rows);
    out.push_str(&format!(
        "Page {} of {} ({} rows)\n",
        page.page, page.total_pages, page.total_items
    ));
    out
}

/// Every record, no paging.
pub fn render_rows<T: Tabular>(records: &[T]) -> String {
    let header: Vec<String> = T::COLUMNS.iter().map(|c| c.to_string()).collect();
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|row| T::COLUMNS.iter().map(|c| cell_text(&row.sort_value(c))).collect())
        .collect();
    columns(&header, &rows)
}

/// The month sheet: grid codes per day, then the month totals.
pub fn render_grid(grid: &AttendanceGrid) -> String {
    let mut header = vec!["Name".to_string()];
    header.extend((1..=grid.days_in_month).map(|d| d.to_string()));
    header.extend(["Payable".to_string(), "OT".to_string()]);

    let rows: Vec<Vec<String>> = grid
        .rows
        .iter()
        .map(|row| {
            let mut cells = vec![row.name.clone()];
            cells.extend(row.days.iter().map(|day| {
                day.as_ref()
                    .map_or(EMPTY_CELL.to_string(), |cell| cell.status.code().to_string())
            }));
            cells.push(format!("{}", row.summary.payable_days));
            cells.push(format!("{}", row.summary.overtime_hours));
            cells
        })
        .collect();

    let mut out = format!("Attendance {:04}-{:02}\n", grid.year, grid.month);
    out.push_str(&columns(&header, &rows));
    if grid.unmatched_records > 0 {
        out.push_str(&format!(
            "{} record(s) skipped: labourer not found\n",
            grid.unmatched_records
        ));
    }
    out
}

pub fn render_site_percentages(sites: &[SiteAttendance]) -> String {
    let header = vec!["Site".to_string(), "Attendance".to_string(), "Present".to_string()];
    let rows: Vec<Vec<String>> = sites
        .iter()
        .map(|s| {
            let counts = match (s.present_count, s.total_count) {
                (Some(p), Some(t)) => format!("{p}/{t}"),
                _ => EMPTY_CELL.to_string(),
            };
            vec![s.name.clone(), format_percentage(Some(s.percentage)), counts]
        })
        .collect();
    columns(&header, &rows)
}

/// Project header, money summary and per-category expense breakdown.
pub fn render_site(details: &SiteDetails) -> String {
    let project = &details.project;
    let summary = &details.summary;
    let money = |v: f64| format_currency(v, CURRENCY);

    let mut lines = vec![project.name.clone()];
    if let Some(location) = &project.location {
        lines.push(format!("Location:    {location}"));
    }
    lines.extend([
        format!(
            "Schedule:    {} to {}",
            format_date(project.start_date),
            format_date(project.end_date)
        ),
        format!("Budget:      {}", money(summary.budget)),
        format!("Income:      {}", money(summary.total_income)),
        format!("Expenses:    {}", money(summary.total_expenses)),
        format!("Profit:      {}", money(summary.profit)),
        format!("Margin:      {}", format_percentage(summary.profit_margin)),
        format!("Budget used: {}", format_percentage(summary.budget_utilization)),
    ]);
    let mut out = lines.join("\n");
    out.push_str("\n\n");

    let header = vec!["Category".to_string(), "Spent".to_string()];
    let rows: Vec<Vec<String>> = TransactionCategory::ALL
        .iter()
        .map(|c| vec![c.label().to_string(), money(summary.expense(*c))])
        .collect();
    out.push_str(&columns(&header, &rows));
    out.push_str(&format!("{} entries\n", summary.transaction_count));
    out
}
