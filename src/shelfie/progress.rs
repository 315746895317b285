//! Reading progress, derived in one place.
//!
//! The backend reports a `Progress` percentage next to `CurrentPage`, and the
//! two are known to disagree: a book can come back with `Progress = 100` and
//! `CurrentPage = 0` while still being read. Every view asks this module
//! instead of reading `Progress` directly.

use crate::model::{ReadingStatus, UserBook};

/// Progress percentage in `0..=100`.
///
/// Rules, first match wins:
/// 1. a finished book is at 100;
/// 2. with both a page count and a current page, the ratio of the two;
/// 3. a reported 100 with page 0 on an unfinished book is bogus, so 0;
/// 4. otherwise the reported value, clamped.
pub fn reading_progress(
    status: ReadingStatus,
    current_page: u32,
    page_count: u32,
    reported: f64,
) -> u8 {
    if status == ReadingStatus::Read {
        return 100;
    }
    if page_count > 0 && current_page > 0 {
        let ratio = f64::from(current_page) / f64::from(page_count) * 100.0;
        return ratio.round().clamp(0.0, 100.0) as u8;
    }
    if current_page == 0 && reported >= 100.0 {
        return 0;
    }
    if reported.is_nan() {
        return 0;
    }
    reported.round().clamp(0.0, 100.0) as u8
}

/// [`reading_progress`] for a library record.
pub fn for_user_book(entry: &UserBook) -> u8 {
    reading_progress(
        entry.status_id,
        entry.current_page,
        entry.page_count(),
        entry.progress,
    )
}

/// Text bar for terminals, e.g. `[#####-----]` at 50%.
pub fn bar(percent: u8, width: usize) -> String {
    let filled = (usize::from(percent.min(100)) * width + 50) / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}
