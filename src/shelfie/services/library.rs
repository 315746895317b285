//! Library membership (`/api/UserBook`) and shelves (`/api/Bookshelf`).
//!
//! Nothing outside [`crate::query::mutations`] should call the write
//! functions here directly: those writes change what several cached reads
//! return, and the mutation layer is where that is tracked.

use crate::client::ApiClient;
use crate::error::Result;
use crate::model::{
    AddToLibraryInput, BookId, LibraryCheck, MoveInput, ProgressInput, Shelf, ShelfId,
    ShelfInput, StatusInput, UserBook,
};
use crate::session::SessionStore;
use crate::transport::Transport;

pub fn get_library<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
) -> Result<Vec<UserBook>> {
    client.get("/api/UserBook")
}

pub fn check_book<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    book_id: BookId,
) -> Result<LibraryCheck> {
    client.get(&format!("/api/UserBook/check/{}", book_id))
}

pub fn add_book<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    input: &AddToLibraryInput,
) -> Result<()> {
    client.post_unit("/api/UserBook", input)
}

pub fn remove_book<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    book_id: BookId,
) -> Result<()> {
    client.delete(&format!("/api/UserBook/{}", book_id))
}

pub fn update_status<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    book_id: BookId,
    input: &StatusInput,
) -> Result<()> {
    client.put_unit(&format!("/api/UserBook/{}/status", book_id), input)
}

pub fn update_progress<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    book_id: BookId,
    input: &ProgressInput,
) -> Result<()> {
    client.put_unit(&format!("/api/UserBook/{}/progress", book_id), input)
}

pub fn move_book<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    book_id: BookId,
    input: &MoveInput,
) -> Result<()> {
    client.put_unit(&format!("/api/UserBook/{}/shelf", book_id), input)
}

pub fn get_shelves<T: Transport, S: SessionStore>(client: &ApiClient<T, S>) -> Result<Vec<Shelf>> {
    client.get("/api/Bookshelf")
}

pub fn create_shelf<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    input: &ShelfInput,
) -> Result<Shelf> {
    client.post("/api/Bookshelf", input)
}

pub fn update_shelf<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    id: ShelfId,
    input: &ShelfInput,
) -> Result<()> {
    client.put_unit(&format!("/api/Bookshelf/{}", id), input)
}

pub fn delete_shelf<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    id: ShelfId,
) -> Result<()> {
    client.delete(&format!("/api/Bookshelf/{}", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fixtures::logged_in_client;
    use crate::model::ReadingStatus;
    use crate::transport::Method;
    use serde_json::json;

    #[test]
    fn check_reports_absent_books() {
        let client = logged_in_client();
        client.transport().on(
            Method::Get,
            "/api/UserBook/check/4",
            200,
            json!({ "Exists": false }),
        );
        let check = check_book(&client, 4).unwrap();
        assert!(!check.exists);
        assert!(check.status_id.is_none());
    }

    #[test]
    fn add_sends_status_id_and_optional_shelf() {
        let client = logged_in_client();
        client
            .transport()
            .on_text(Method::Post, "/api/UserBook", 201, "");
        add_book(
            &client,
            &AddToLibraryInput {
                book_id: 4,
                status_id: ReadingStatus::WantToRead,
                shelf_id: None,
            },
        )
        .unwrap();
        let body = client.transport().last_request().unwrap().body.unwrap();
        assert_eq!(body, json!({ "BookId": 4, "StatusId": 1 }));
    }

    #[test]
    fn move_to_no_shelf_sends_null() {
        let client = logged_in_client();
        client
            .transport()
            .on_text(Method::Put, "/api/UserBook/4/shelf", 204, "");
        move_book(&client, 4, &MoveInput { shelf_id: None }).unwrap();
        let body = client.transport().last_request().unwrap().body.unwrap();
        assert_eq!(body, json!({ "ShelfId": null }));
    }

    #[test]
    fn library_lists_records_with_books() {
        let client = logged_in_client();
        client.transport().on(
            Method::Get,
            "/api/UserBook",
            200,
            json!([{
                "BookId": 1,
                "StatusId": 3,
                "Book": { "BookId": 1, "Title": "Số đỏ", "PageCount": 220 }
            }]),
        );
        let library = get_library(&client).unwrap();
        assert_eq!(library[0].title(), "Số đỏ");
        assert_eq!(library[0].page_count(), 220);
    }
}
