//! Records mirrored from API responses.
//!
//! The backend speaks PascalCase JSON and omits fields freely depending on the
//! endpoint, so everything that is not an identifier defaults when absent. These
//! types are cache entries, never the source of truth: the backend owns every
//! entity and its invariants.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub type BookId = i64;
pub type AuthorId = i64;
pub type GenreId = i64;
pub type ShelfId = i64;
pub type ReviewId = i64;
pub type CommentId = i64;
pub type UserId = i64;

/// Role identifier the backend assigns to administrators.
pub const ADMIN_ROLE_ID: i64 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Book {
    pub book_id: BookId,
    pub title: String,
    #[serde(default)]
    pub isbn13: Option<String>,
    #[serde(default)]
    pub author_id: Option<AuthorId>,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub genre_id: Option<GenreId>,
    #[serde(default)]
    pub genre_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub page_count: u32,
    #[serde(default)]
    pub publication_year: Option<i32>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub average_rating: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub review_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Author {
    pub author_id: AuthorId,
    pub name: String,
    #[serde(default)]
    pub biography: Option<String>,
    /// Filled in client-side from the full book list; only a placeholder.
    #[serde(default, deserialize_with = "null_as_default")]
    pub book_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Genre {
    pub genre_id: GenreId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub book_count: u32,
}

/// Reading status attached to a library membership record.
///
/// Travels as the integer `StatusId` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ReadingStatus {
    WantToRead,
    CurrentlyReading,
    Read,
}

impl ReadingStatus {
    pub const ALL: [ReadingStatus; 3] = [
        ReadingStatus::WantToRead,
        ReadingStatus::CurrentlyReading,
        ReadingStatus::Read,
    ];

    pub fn id(self) -> u8 {
        match self {
            ReadingStatus::WantToRead => 1,
            ReadingStatus::CurrentlyReading => 2,
            ReadingStatus::Read => 3,
        }
    }

    /// Label shown to readers.
    pub fn label(self) -> &'static str {
        match self {
            ReadingStatus::WantToRead => "Muốn đọc",
            ReadingStatus::CurrentlyReading => "Đang đọc",
            ReadingStatus::Read => "Đã đọc",
        }
    }

    /// Parses the CLI spelling (`want`, `reading`, `read`) or the numeric id.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "1" | "want" | "want-to-read" | "wanttoread" => Some(ReadingStatus::WantToRead),
            "2" | "reading" | "currently-reading" | "current" => {
                Some(ReadingStatus::CurrentlyReading)
            }
            "3" | "read" | "done" | "finished" => Some(ReadingStatus::Read),
            _ => None,
        }
    }
}

impl TryFrom<u8> for ReadingStatus {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(ReadingStatus::WantToRead),
            2 => Ok(ReadingStatus::CurrentlyReading),
            3 => Ok(ReadingStatus::Read),
            other => Err(format!("unknown reading status id {}", other)),
        }
    }
}

impl From<ReadingStatus> for u8 {
    fn from(status: ReadingStatus) -> u8 {
        status.id()
    }
}

impl fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A user's library membership record for one book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserBook {
    #[serde(default)]
    pub user_book_id: Option<i64>,
    pub book_id: BookId,
    #[serde(default)]
    pub book: Option<Book>,
    pub status_id: ReadingStatus,
    #[serde(default)]
    pub shelf_id: Option<ShelfId>,
    #[serde(default)]
    pub shelf_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub current_page: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub progress: f64,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, with = "flexible_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, with = "flexible_date")]
    pub finish_date: Option<NaiveDate>,
}

impl UserBook {
    pub fn title(&self) -> String {
        self.book
            .as_ref()
            .map(|b| b.title.clone())
            .unwrap_or_else(|| format!("Book #{}", self.book_id))
    }

    pub fn page_count(&self) -> u32 {
        self.book.as_ref().map(|b| b.page_count).unwrap_or(0)
    }
}

/// Answer of the membership check endpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LibraryCheck {
    pub exists: bool,
    #[serde(default)]
    pub status_id: Option<ReadingStatus>,
    #[serde(default)]
    pub shelf_id: Option<ShelfId>,
    #[serde(default)]
    pub user_book: Option<UserBook>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Shelf {
    pub shelf_id: ShelfId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_default: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub book_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Review {
    pub review_id: ReviewId,
    pub book_id: BookId,
    #[serde(default)]
    pub book_title: Option<String>,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub user_name: Option<String>,
    pub rating: u8,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default = "default_true", deserialize_with = "null_as_true")]
    pub is_public: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub comment_count: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub can_edit: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub can_delete: bool,
    #[serde(default, with = "flexible_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Comment {
    pub comment_id: CommentId,
    pub review_id: ReviewId,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_edited: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub can_edit: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub can_delete: bool,
    #[serde(default, with = "flexible_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    pub user_id: UserId,
    pub user_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub role_id: i64,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role_id == ADMIN_ROLE_ID
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Whether the backend lets the current user review a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanReview {
    pub allowed: bool,
    pub reason: Option<String>,
}

/// The endpoint answers either a bare boolean or an object.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum CanReviewWire {
    Flag(bool),
    Object {
        #[serde(rename = "CanReview")]
        can_review: bool,
        #[serde(rename = "Reason", default)]
        reason: Option<String>,
    },
}

impl From<CanReviewWire> for CanReview {
    fn from(wire: CanReviewWire) -> Self {
        match wire {
            CanReviewWire::Flag(allowed) => CanReview {
                allowed,
                reason: None,
            },
            CanReviewWire::Object { can_review, reason } => CanReview {
                allowed: can_review,
                reason,
            },
        }
    }
}

// --- Write payloads ---

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BookInput {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn13: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<AuthorId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre_id: Option<GenreId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub page_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GenreInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ShelfInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReviewInput {
    pub book_id: BookId,
    pub rating: u8,
    pub content: String,
    pub is_public: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CommentInput {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AddToLibraryInput {
    pub book_id: BookId,
    pub status_id: ReadingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shelf_id: Option<ShelfId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatusInput {
    pub status_id: ReadingStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProgressInput {
    pub current_page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MoveInput {
    pub shelf_id: Option<ShelfId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoginInput {
    pub user_name: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegisterInput {
    pub user_name: String,
    pub email: String,
    pub password: String,
}

fn default_true() -> bool {
    true
}

/// `#[serde(default)]` only covers a missing key; the backend also sends
/// `null` for numbers and flags it has no value for.
fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

fn null_as_true<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(d)?.unwrap_or(true))
}

/// Parses the date shapes the backend is known to emit: RFC 3339, a naive
/// date-time without offset, or a bare date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.date_naive())
        .ok()
        .or_else(|| {
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|d| d.date())
        })
        .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
}

/// Like [`parse_date`] but keeps the time; naive values are taken as UTC.
pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|d| d.and_utc())
        })
}

mod flexible_date {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_some(&d.format("%Y-%m-%d").to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        match raw {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => super::parse_date(&s)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid date: {}", s))),
        }
    }
}

mod flexible_datetime {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        s: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_some(&d.to_rfc3339()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        match raw {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => super::parse_datetime(&s)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {}", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn book_tolerates_missing_fields() {
        let book: Book = serde_json::from_value(json!({
            "BookId": 7,
            "Title": "Dune"
        }))
        .unwrap();
        assert_eq!(book.book_id, 7);
        assert_eq!(book.page_count, 0);
        assert!(book.isbn13.is_none());
    }

    #[test]
    fn explicit_nulls_fall_back_to_defaults() {
        let book: Book = serde_json::from_value(json!({
            "BookId": 1,
            "Title": "A",
            "PageCount": null,
            "AverageRating": null,
            "ReviewCount": null
        }))
        .unwrap();
        assert_eq!(book.page_count, 0);
        assert_eq!(book.average_rating, 0.0);
        assert_eq!(book.review_count, 0);

        let entry: UserBook = serde_json::from_value(json!({
            "BookId": 1,
            "StatusId": 2,
            "CurrentPage": null,
            "Progress": null
        }))
        .unwrap();
        assert_eq!(entry.current_page, 0);
        assert_eq!(entry.progress, 0.0);

        let review: Review = serde_json::from_value(json!({
            "ReviewId": 9,
            "BookId": 1,
            "Rating": 4,
            "Content": null,
            "IsPublic": null,
            "CommentCount": null
        }))
        .unwrap();
        assert!(review.is_public);
        assert_eq!(review.content, "");
        assert_eq!(review.comment_count, 0);
    }

    #[test]
    fn one_null_count_does_not_sink_the_catalog() {
        let books: Vec<Book> = serde_json::from_str(
            r#"[{"BookId":1,"Title":"A","PageCount":null},{"BookId":2,"Title":"B","PageCount":90}]"#,
        )
        .unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[1].page_count, 90);
    }

    #[test]
    fn user_book_reads_status_id_and_dates() {
        let ub: UserBook = serde_json::from_value(json!({
            "BookId": 3,
            "StatusId": 2,
            "CurrentPage": 40,
            "Progress": 20.0,
            "StartDate": "2024-03-01T00:00:00",
            "FinishDate": null
        }))
        .unwrap();
        assert_eq!(ub.status_id, ReadingStatus::CurrentlyReading);
        assert_eq!(ub.start_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert!(ub.finish_date.is_none());
    }

    #[test]
    fn unknown_status_id_is_rejected() {
        let parsed: std::result::Result<UserBook, _> =
            serde_json::from_value(json!({ "BookId": 3, "StatusId": 9 }));
        assert!(parsed.is_err());
    }

    #[test]
    fn status_serializes_as_integer() {
        let body = serde_json::to_value(StatusInput {
            status_id: ReadingStatus::Read,
        })
        .unwrap();
        assert_eq!(body, json!({ "StatusId": 3 }));
    }

    #[test]
    fn parse_date_accepts_known_shapes() {
        let expected = NaiveDate::from_ymd_opt(2023, 12, 31);
        assert_eq!(parse_date("2023-12-31"), expected);
        assert_eq!(parse_date("2023-12-31T10:20:30"), expected);
        assert_eq!(parse_date("2023-12-31T10:20:30.123"), expected);
        assert_eq!(parse_date("2023-12-31T10:20:30Z"), expected);
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn can_review_accepts_bool_or_object() {
        let flag: CanReviewWire = serde_json::from_value(json!(true)).unwrap();
        assert!(CanReview::from(flag).allowed);

        let obj: CanReviewWire =
            serde_json::from_value(json!({ "CanReview": false, "Reason": "not read" })).unwrap();
        let can = CanReview::from(obj);
        assert!(!can.allowed);
        assert_eq!(can.reason.as_deref(), Some("not read"));
    }

    #[test]
    fn reading_status_parses_cli_spellings() {
        assert_eq!(ReadingStatus::parse("want"), Some(ReadingStatus::WantToRead));
        assert_eq!(
            ReadingStatus::parse("Reading"),
            Some(ReadingStatus::CurrentlyReading)
        );
        assert_eq!(ReadingStatus::parse("3"), Some(ReadingStatus::Read));
        assert_eq!(ReadingStatus::parse("maybe"), None);
    }

    #[test]
    fn admin_role_gates_admin() {
        let user = User {
            user_id: 1,
            user_name: "root".into(),
            email: None,
            full_name: None,
            role_id: ADMIN_ROLE_ID,
        };
        assert!(user.is_admin());
    }
}
