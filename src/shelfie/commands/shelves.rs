use crate::client::ApiClient;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, ShelfieError};
use crate::model::{ShelfId, ShelfInput};
use crate::query::{mutations, queries, QueryCache};
use crate::route::Route;
use crate::session::SessionStore;
use crate::transport::Transport;

pub fn list<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
) -> Result<CmdResult> {
    let mut shelves = queries::shelves(client, cache)?;
    // Default shelves first, then by name.
    shelves.sort_by(|a, b| {
        b.is_default
            .cmp(&a.is_default)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    Ok(CmdResult::default().with_shelves(shelves))
}

/// One shelf and the library entries on it.
pub fn show<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    id: ShelfId,
) -> Result<CmdResult> {
    let shelf = queries::shelves(client, cache)?
        .into_iter()
        .find(|s| s.shelf_id == id)
        .ok_or_else(|| ShelfieError::NotFound(format!("shelf {}", id)))?;
    let entries: Vec<_> = queries::library(client, cache)?
        .into_iter()
        .filter(|e| e.shelf_id == Some(id))
        .collect();
    client.location().navigate(Route::Shelf(id));

    let mut result = CmdResult::default().with_location(Route::Shelf(id));
    if entries.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "Kệ \"{}\" chưa có sách nào",
            shelf.name
        )));
    }
    Ok(result.with_shelves(vec![shelf]).with_library(entries))
}

pub fn create<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    name: &str,
    description: Option<String>,
) -> Result<CmdResult> {
    let input = ShelfInput {
        name: name.to_string(),
        description,
    };
    let shelf = mutations::create_shelf(client, cache, &input)?;
    Ok(CmdResult::default()
        .with_message(CmdMessage::success(format!(
            "Đã tạo kệ \"{}\"",
            shelf.name
        )))
        .with_shelves(vec![shelf]))
}

pub fn update<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    id: ShelfId,
    name: &str,
    description: Option<String>,
) -> Result<CmdResult> {
    let input = ShelfInput {
        name: name.to_string(),
        description,
    };
    mutations::update_shelf(client, cache, id, &input)?;
    Ok(CmdResult::default().with_message(CmdMessage::success(format!(
        "Đã cập nhật kệ #{}",
        id
    ))))
}

pub fn delete<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    id: ShelfId,
) -> Result<CmdResult> {
    let shelves = queries::shelves(client, cache)?;
    if shelves.iter().any(|s| s.shelf_id == id && s.is_default) {
        return Ok(CmdResult::default().with_message(CmdMessage::warning(
            "Không thể xóa kệ mặc định",
        )));
    }
    mutations::delete_shelf(client, cache, id)?;
    Ok(CmdResult::default().with_message(CmdMessage::success(format!("Đã xóa kệ #{}", id))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fixtures::logged_in_client;
    use crate::commands::fixtures::cache;
    use crate::commands::MessageLevel;
    use crate::transport::Method;
    use serde_json::json;

    fn shelves_json() -> serde_json::Value {
        json!([
            { "ShelfId": 2, "Name": "Yêu thích" },
            { "ShelfId": 1, "Name": "Mặc định", "IsDefault": true },
            { "ShelfId": 3, "Name": "Kinh điển" }
        ])
    }

    #[test]
    fn empty_name_fails_before_any_request() {
        let client = logged_in_client();
        let err = create(&client, &mut cache(), "", None).unwrap_err();
        assert!(err.to_string().contains("Tên kệ sách không được để trống"));
        assert_eq!(client.transport().total(), 0);
    }

    #[test]
    fn default_shelf_is_listed_first() {
        let client = logged_in_client();
        client
            .transport()
            .on(Method::Get, "/api/Bookshelf", 200, shelves_json());
        let result = list(&client, &mut cache()).unwrap();
        let ids: Vec<i64> = result.shelves.iter().map(|s| s.shelf_id).collect();
        assert_eq!(ids, vec![1, 3, 2]);
    }

    #[test]
    fn default_shelf_is_not_deleted() {
        let client = logged_in_client();
        client
            .transport()
            .on(Method::Get, "/api/Bookshelf", 200, shelves_json());
        let result = delete(&client, &mut cache(), 1).unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Warning);
        assert_eq!(client.transport().writes(), 0);
    }

    #[test]
    fn show_lists_books_on_the_shelf() {
        let client = logged_in_client();
        let t = client.transport();
        t.on(Method::Get, "/api/Bookshelf", 200, shelves_json());
        t.on(
            Method::Get,
            "/api/UserBook",
            200,
            json!([
                { "BookId": 1, "StatusId": 1, "ShelfId": 2 },
                { "BookId": 2, "StatusId": 3, "ShelfId": 3 }
            ]),
        );
        let result = show(&client, &mut cache(), 2).unwrap();
        assert_eq!(result.library.len(), 1);
        assert_eq!(result.location, Some(Route::Shelf(2)));
    }
}
