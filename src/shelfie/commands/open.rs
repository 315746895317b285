//! Path-based navigation: `shelfie open /books/12` renders whatever page
//! lives at that path, applying the same guards a link would.
//!
//! - Pages that need a session send an anonymous reader to `/login`.
//! - `/admin` sends a non-admin back to `/`.
//! - Unknown paths render a not-found message.

use crate::client::ApiClient;
use crate::commands::browse::BookFilter;
use crate::commands::library::LibraryFilter;
use crate::commands::{admin, book, browse, library, overview, shelves, CmdMessage, CmdResult};
use crate::error::Result;
use crate::query::QueryCache;
use crate::route::Route;
use crate::session::{self, SessionStore};
use crate::transport::Transport;

pub fn run<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    path: &str,
) -> Result<CmdResult> {
    let route: Route = match path.parse() {
        Ok(route) => route,
        Err(never) => match never {},
    };
    tracing::debug!(path, route = %route, "open");

    if route.requires_auth() && !session::is_authenticated(client.session()) {
        client.location().navigate(Route::Login);
        return Ok(CmdResult::default()
            .with_message(CmdMessage::warning(
                "Vui lòng đăng nhập để tiếp tục (shelfie login)",
            ))
            .with_location(Route::Login));
    }
    if route.requires_admin() && !session::is_admin(client.session()) {
        let mut result = overview::home(client, cache)?;
        result
            .messages
            .insert(0, CmdMessage::warning(admin::ADMIN_ONLY));
        return Ok(result);
    }

    match route {
        Route::Home => overview::home(client, cache),
        Route::Login | Route::Register => {
            client.location().navigate(route.clone());
            let hint = if route == Route::Login {
                "Dùng `shelfie login <tên đăng nhập>` để đăng nhập"
            } else {
                "Dùng `shelfie register <tên đăng nhập> <email>` để tạo tài khoản"
            };
            Ok(CmdResult::default()
                .with_message(CmdMessage::info(hint))
                .with_location(route))
        }
        Route::Books => browse::books(client, cache, &BookFilter::default()),
        Route::BookDetail(id) => book::show(client, cache, id),
        Route::Authors => browse::authors(client, cache, None),
        Route::AuthorDetail(id) => browse::author(client, cache, id),
        Route::Genres => browse::genres(client, cache),
        Route::GenreDetail(id) => browse::genre(client, cache, id),
        Route::Library => library::list(client, cache, LibraryFilter::default()),
        Route::Shelf(id) => shelves::show(client, cache, id),
        Route::Profile => overview::profile(client, cache),
        Route::Admin => admin::dashboard(client, cache),
        Route::NotFound(raw) => {
            client.location().navigate(Route::NotFound(raw.clone()));
            Ok(CmdResult::default()
                .with_message(CmdMessage::error(format!(
                    "Không tìm thấy trang: {}",
                    raw
                )))
                .with_location(Route::NotFound(raw)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fixtures::{anonymous_client, logged_in_client};
    use crate::commands::fixtures::cache;
    use crate::commands::{MessageLevel, PageView};
    use crate::transport::Method;
    use serde_json::json;

    #[test]
    fn library_redirects_anonymous_readers_to_login() {
        let client = anonymous_client();
        let result = run(&client, &mut cache(), "/library").unwrap();
        assert_eq!(result.location, Some(Route::Login));
        assert!(client.location().is_at(&Route::Login));
        assert_eq!(client.transport().total(), 0);
    }

    #[test]
    fn admin_redirects_readers_home() {
        let client = logged_in_client();
        client.transport().on(Method::Get, "/api/Book", 200, json!([]));
        let result = run(&client, &mut cache(), "/admin").unwrap();
        assert_eq!(result.location, Some(Route::Home));
        assert_eq!(result.messages[0].level, MessageLevel::Warning);
    }

    #[test]
    fn book_path_renders_the_book_page() {
        let client = anonymous_client();
        client.transport().on(
            Method::Get,
            "/api/Book/12",
            200,
            json!({ "BookId": 12, "Title": "Nhà giả kim" }),
        );
        let result = run(&client, &mut cache(), "/books/12?tab=reviews").unwrap();
        assert!(matches!(result.page, Some(PageView::Book(_))));
        assert_eq!(result.location, Some(Route::BookDetail(12)));
    }

    #[test]
    fn unknown_path_is_not_found() {
        let client = anonymous_client();
        let result = run(&client, &mut cache(), "/nowhere").unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Error);
        assert_eq!(client.transport().total(), 0);
    }
}
