use crate::client::ApiClient;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{LoginInput, RegisterInput};
use crate::query::{mutations, queries, QueryCache};
use crate::route::Route;
use crate::session::{self, SessionStore};
use crate::transport::Transport;

pub fn login<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    user_name: &str,
    password: &str,
) -> Result<CmdResult> {
    let input = LoginInput {
        user_name: user_name.trim().to_string(),
        password: password.to_string(),
    };
    let user = mutations::login(client, cache, &input)?;
    client.location().navigate(Route::Home);
    Ok(CmdResult::default()
        .with_message(CmdMessage::success(format!(
            "Logged in as {}",
            user.user_name
        )))
        .with_user(user)
        .with_location(Route::Home))
}

pub fn register<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    user_name: &str,
    email: &str,
    password: &str,
) -> Result<CmdResult> {
    let input = RegisterInput {
        user_name: user_name.trim().to_string(),
        email: email.trim().to_string(),
        password: password.to_string(),
    };
    let user = mutations::register(client, cache, &input)?;
    client.location().navigate(Route::Home);
    Ok(CmdResult::default()
        .with_message(CmdMessage::success(format!(
            "Account created, logged in as {}",
            user.user_name
        )))
        .with_user(user)
        .with_location(Route::Home))
}

pub fn logout<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
) -> Result<CmdResult> {
    let was_logged_in = session::is_authenticated(client.session());
    mutations::logout(client, cache)?;
    client.location().navigate(Route::Login);

    let message = if was_logged_in {
        CmdMessage::success("Logged out")
    } else {
        CmdMessage::info("Not logged in")
    };
    Ok(CmdResult::default()
        .with_message(message)
        .with_location(Route::Login))
}

/// The stored user, refreshed from the backend.
pub fn whoami<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
) -> Result<CmdResult> {
    if !session::is_authenticated(client.session()) {
        return Ok(CmdResult::default().with_message(CmdMessage::info("Not logged in")));
    }
    let user = queries::me(client, cache)?;
    Ok(CmdResult::default().with_user(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fixtures::{anonymous_client, logged_in_client};
    use crate::commands::fixtures::cache;
    use crate::commands::MessageLevel;
    use crate::error::ShelfieError;
    use crate::transport::Method;
    use serde_json::json;

    #[test]
    fn login_trims_user_name_and_stores_session() {
        let client = anonymous_client();
        client.transport().on(
            Method::Post,
            "/api/Auth/login",
            200,
            json!({ "Token": "t1", "User": { "UserId": 3, "UserName": "hoa", "RoleId": 2 } }),
        );
        let result = login(&client, &mut cache(), "  hoa ", "pw").unwrap();

        let body = client.transport().last_request().unwrap().body.unwrap();
        assert_eq!(body["UserName"], "hoa");
        assert_eq!(result.user.unwrap().user_id, 3);
        assert!(session::is_authenticated(client.session()));
    }

    #[test]
    fn bad_credentials_leave_no_session() {
        let client = anonymous_client();
        client.transport().on(
            Method::Post,
            "/api/Auth/login",
            401,
            json!({ "message": "Sai mật khẩu" }),
        );
        let err = login(&client, &mut cache(), "hoa", "nope").unwrap_err();
        assert!(matches!(err, ShelfieError::Unauthorized));
        assert!(!session::is_authenticated(client.session()));
    }

    #[test]
    fn logout_when_logged_out_is_informational() {
        let client = anonymous_client();
        let result = logout(&client, &mut cache()).unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Info);
    }

    #[test]
    fn logout_clears_session() {
        let client = logged_in_client();
        let result = logout(&client, &mut cache()).unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Success);
        assert!(!session::is_authenticated(client.session()));
        assert!(client.location().is_at(&Route::Login));
    }

    #[test]
    fn whoami_without_session_makes_no_request() {
        let client = anonymous_client();
        let result = whoami(&client, &mut cache()).unwrap();
        assert!(result.user.is_none());
        assert_eq!(client.transport().total(), 0);
    }
}
