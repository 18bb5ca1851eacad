//! In-memory table operations: search filter, column sort and pagination.
//!
//! List screens fetch the whole collection once and then slice it locally;
//! these helpers are the shared implementation behind every such table.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Maximum number of rows per page.
pub const MAX_PAGE_SIZE: usize = 100;

// ---------------------------------------------------------------------------
// Tabular
// ---------------------------------------------------------------------------

/// A value a row exposes for sorting.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Missing,
}

impl SortValue {
    pub fn text(value: &str) -> Self {
        Self::Text(value.to_string())
    }

    pub fn opt_text(value: Option<&str>) -> Self {
        value.map_or(Self::Missing, Self::text)
    }

    pub fn opt_date(value: Option<NaiveDate>) -> Self {
        value.map_or(Self::Missing, Self::Date)
    }

    /// Compare two present values; text ignores case. Mismatched kinds
    /// compare equal so the stable sort keeps their input order.
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
            (Self::Number(a), Self::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Self::Date(a), Self::Date(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

/// A record that can be displayed in a searchable, sortable table.
pub trait Tabular {
    /// Column keys accepted by [`sort_rows`].
    const COLUMNS: &'static [&'static str];

    /// Text fields matched by the search box.
    fn search_fields(&self) -> Vec<&str>;

    fn sort_value(&self, column: &str) -> SortValue;

    /// Case-insensitive substring match against any search field. An empty
    /// needle matches everything.
    fn matches(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        needle.is_empty()
            || self
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
    }
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub column: String,
    pub direction: SortDirection,
}

/// Everything a table view needs to pick the rows it shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQuery {
    pub search: Option<String>,
    pub sort: Option<SortSpec>,
    /// 1-based page number.
    pub page: usize,
    pub page_size: usize,
}

impl Default for TableQuery {
    fn default() -> Self {
        Self {
            search: None,
            sort: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page actually shown (after clamping).
    pub page: usize,
    pub page_size: usize,
    /// Rows matching the search, across all pages.
    pub total_items: usize,
    /// Always at least 1, even for an empty table.
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Rows matching the search needle, in input order.
pub fn filter_rows<'a, T: Tabular>(rows: &'a [T], needle: &str) -> Vec<&'a T> {
    rows.iter().filter(|row| row.matches(needle)).collect()
}

/// Stable sort by a column. Rows without a value for the column always
/// sort last, whichever the direction.
pub fn sort_rows<T: Tabular>(
    rows: &mut [&T],
    column: &str,
    direction: SortDirection,
) -> Result<(), CoreError> {
    if !T::COLUMNS.contains(&column) {
        return Err(CoreError::Validation(format!(
            "unknown sort column '{column}', expected one of: {}",
            T::COLUMNS.join(", ")
        )));
    }

    rows.sort_by(|a, b| {
        let (a, b) = (a.sort_value(column), b.sort_value(column));
        match (&a, &b) {
            (SortValue::Missing, SortValue::Missing) => Ordering::Equal,
            (SortValue::Missing, _) => Ordering::Greater,
            (_, SortValue::Missing) => Ordering::Less,
            _ => match direction {
                SortDirection::Ascending => a.compare(&b),
                SortDirection::Descending => b.compare(&a),
            },
        }
    });
    Ok(())
}

/// Slice out one page. The page size is clamped to `1..=MAX_PAGE_SIZE` and
/// the page number to `1..=total_pages`.
pub fn paginate<T>(rows: Vec<T>, page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
    let total_items = rows.len();
    let total_pages = total_items.div_ceil(page_size).max(1);
    let page = page.clamp(1, total_pages);

    let items = rows
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .collect();

    Page {
        items,
        page,
        page_size,
        total_items,
        total_pages,
    }
}

/// Filter, sort and paginate in one pass.
pub fn apply<'a, T: Tabular>(rows: &'a [T], query: &TableQuery) -> Result<Page<&'a T>, CoreError> {
    let mut visible = filter_rows(rows, query.search.as_deref().unwrap_or(""));
    if let Some(sort) = &query.sort {
        sort_rows(&mut visible, &sort.column, sort.direction)?;
    }
    Ok(paginate(visible, query.page, query.page_size))
}
