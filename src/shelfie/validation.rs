//! Form checks that run before any request is sent.
//!
//! Each form returns every failing field at once so the caller can show them
//! side by side. Messages are the ones readers see, verbatim.

use crate::error::{FieldError, Result, ShelfieError};
use crate::model::{BookInput, CommentInput, GenreInput, ReviewInput, ShelfInput};
use chrono::Datelike;

pub const SHELF_NAME_MAX: usize = 100;

pub const SHELF_NAME_REQUIRED: &str = "Tên kệ sách không được để trống";
pub const SHELF_NAME_TOO_LONG: &str = "Tên kệ sách không được vượt quá 100 ký tự";
pub const PAGE_INVALID: &str = "Số trang hiện tại không hợp lệ";
pub const RATING_RANGE: &str = "Vui lòng chọn số sao từ 1 đến 5";
pub const REVIEW_REQUIRED: &str = "Nội dung đánh giá không được để trống";
pub const COMMENT_REQUIRED: &str = "Nội dung bình luận không được để trống";
pub const BOOK_TITLE_REQUIRED: &str = "Tên sách không được để trống";
pub const BOOK_PAGES_REQUIRED: &str = "Số trang phải lớn hơn 0";
pub const BOOK_YEAR_FUTURE: &str = "Năm xuất bản không được lớn hơn năm hiện tại";
pub const BOOK_ISBN_INVALID: &str = "ISBN-13 phải gồm đúng 13 chữ số";
pub const GENRE_NAME_REQUIRED: &str = "Tên thể loại không được để trống";

/// Message for a current page past the end of the book.
pub fn page_too_large(page_count: u32) -> String {
    format!("Số trang hiện tại không được vượt quá {} trang", page_count)
}

fn finish(errors: Vec<FieldError>) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ShelfieError::Validation(errors))
    }
}

pub fn shelf(input: &ShelfInput) -> Result<()> {
    let mut errors = Vec::new();
    let name = input.name.trim();
    if name.is_empty() {
        errors.push(FieldError::new("name", SHELF_NAME_REQUIRED));
    } else if name.chars().count() > SHELF_NAME_MAX {
        errors.push(FieldError::new("name", SHELF_NAME_TOO_LONG));
    }
    finish(errors)
}

/// `current_page` is signed because it comes straight from user input.
/// A `page_count` of 0 means the book's length is unknown and is not checked.
pub fn progress(current_page: i64, page_count: u32) -> Result<u32> {
    if current_page < 0 {
        return Err(ShelfieError::Validation(vec![FieldError::new(
            "current_page",
            PAGE_INVALID,
        )]));
    }
    if page_count > 0 && current_page > i64::from(page_count) {
        return Err(ShelfieError::Validation(vec![FieldError::new(
            "current_page",
            page_too_large(page_count),
        )]));
    }
    u32::try_from(current_page).map_err(|_| {
        ShelfieError::Validation(vec![FieldError::new("current_page", PAGE_INVALID)])
    })
}

pub fn review(input: &ReviewInput) -> Result<()> {
    let mut errors = Vec::new();
    if !(1..=5).contains(&input.rating) {
        errors.push(FieldError::new("rating", RATING_RANGE));
    }
    if input.content.trim().is_empty() {
        errors.push(FieldError::new("content", REVIEW_REQUIRED));
    }
    finish(errors)
}

pub fn comment(input: &CommentInput) -> Result<()> {
    if input.content.trim().is_empty() {
        return finish(vec![FieldError::new("content", COMMENT_REQUIRED)]);
    }
    Ok(())
}

pub fn book(input: &BookInput) -> Result<()> {
    let mut errors = Vec::new();
    if input.title.trim().is_empty() {
        errors.push(FieldError::new("title", BOOK_TITLE_REQUIRED));
    }
    if input.page_count == 0 {
        errors.push(FieldError::new("page_count", BOOK_PAGES_REQUIRED));
    }
    if let Some(year) = input.publication_year {
        if year > chrono::Utc::now().year() {
            errors.push(FieldError::new("publication_year", BOOK_YEAR_FUTURE));
        }
    }
    if let Some(isbn) = &input.isbn13 {
        let digits: String = isbn.chars().filter(|c| *c != '-').collect();
        if digits.len() != 13 || !digits.chars().all(|c| c.is_ascii_digit()) {
            errors.push(FieldError::new("isbn13", BOOK_ISBN_INVALID));
        }
    }
    finish(errors)
}

pub fn genre(input: &GenreInput) -> Result<()> {
    if input.name.trim().is_empty() {
        return finish(vec![FieldError::new("name", GENRE_NAME_REQUIRED)]);
    }
    Ok(())
}
