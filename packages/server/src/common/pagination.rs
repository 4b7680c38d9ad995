//! Page-number pagination for the listing pages.
//!
//! Listing pages show a fixed number of records per page. Page numbers come
//! in as raw query-string values and are forgiving: anything that does not
//! parse as an integer falls back to the first page, while an out-of-range
//! number (including zero and negatives) clamps to the last page.

use serde::Serialize;

/// A single page of records plus the numbers the page chrome renders.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: usize,
    pub num_pages: usize,
    pub total: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

/// Number of pages needed for `total` records; an empty listing still has
/// one (empty) page.
pub fn num_pages(total: usize, page_size: usize) -> usize {
    if total == 0 {
        1
    } else {
        total.div_ceil(page_size)
    }
}

/// Resolve a raw `page` query value to a valid page number.
pub fn resolve_page(raw: Option<&str>, num_pages: usize) -> usize {
    let number = match raw {
        None => return 1,
        Some(value) => match value.trim().parse::<i64>() {
            Ok(n) => n,
            Err(_) => return 1,
        },
    };
    if number < 1 || number as usize > num_pages {
        num_pages
    } else {
        number as usize
    }
}

/// Slice one page out of the full record list.
pub fn paginate<T>(items: Vec<T>, raw_page: Option<&str>, page_size: usize) -> Page<T> {
    let total = items.len();
    let num_pages = num_pages(total, page_size);
    let number = resolve_page(raw_page, num_pages);

    let start = (number - 1) * page_size;
    let items: Vec<T> = items.into_iter().skip(start).take(page_size).collect();

    Page {
        items,
        number,
        num_pages,
        total,
        has_previous: number > 1,
        has_next: number < num_pages,
    }
}
