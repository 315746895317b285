use crate::client::ApiClient;
use crate::commands::{CmdResult, PageView};
use crate::derived;
use crate::error::Result;
use crate::query::QueryCache;
use crate::route::Route;
use crate::session::SessionStore;
use crate::transport::Transport;

pub fn home<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
) -> Result<CmdResult> {
    let data = derived::home_page(client, cache)?;
    client.location().navigate(Route::Home);
    Ok(CmdResult::default()
        .with_page(PageView::Home(data))
        .with_location(Route::Home))
}

pub fn profile<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
) -> Result<CmdResult> {
    let data = derived::profile(client, cache)?;
    client.location().navigate(Route::Profile);
    Ok(CmdResult::default()
        .with_user(data.user.clone())
        .with_page(PageView::Profile(data))
        .with_location(Route::Profile))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fixtures::logged_in_client;
    use crate::commands::fixtures::cache;
    use crate::transport::Method;
    use serde_json::json;

    #[test]
    fn profile_combines_user_stats_and_shelves() {
        let client = logged_in_client();
        let t = client.transport();
        t.on(
            Method::Get,
            "/api/Auth/me",
            200,
            json!({ "UserId": 42, "UserName": "minh", "RoleId": 2 }),
        );
        t.on(
            Method::Get,
            "/api/UserBook",
            200,
            json!([{ "BookId": 1, "StatusId": 3 }, { "BookId": 2, "StatusId": 1 }]),
        );
        t.on(
            Method::Get,
            "/api/Bookshelf",
            200,
            json!([{ "ShelfId": 1, "Name": "Mặc định", "IsDefault": true }]),
        );

        let result = profile(&client, &mut cache()).unwrap();
        match result.page {
            Some(PageView::Profile(data)) => {
                assert_eq!(data.stats.total, 2);
                assert_eq!(data.stats.read, 1);
                assert_eq!(data.shelves.len(), 1);
            }
            other => panic!("unexpected page {:?}", other),
        }
        assert!(client.location().is_at(&Route::Profile));
    }
}
