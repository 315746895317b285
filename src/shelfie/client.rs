//! # API Client
//!
//! One client per process, wrapping a [`Transport`] with the two interceptors
//! every call goes through:
//!
//! - **Request**: the bearer token is read from the [`SessionStore`] on every
//!   request (never cached here), plus `Accept` and a fresh `X-Request-Id`.
//! - **Response**: status codes become [`ShelfieError`] variants. A 401 also
//!   clears the stored `token` and `user` and moves the [`Location`] to
//!   `/login` unless it is already there.
//!
//! Service modules only ever see typed helpers (`get`, `post`, ...), never the
//! raw response.

use crate::error::{Result, ShelfieError};
use crate::route::{Location, Route};
use crate::session::{self, SessionStore};
use crate::transport::{ApiRequest, ApiResponse, Method, Transport};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

pub struct ApiClient<T: Transport, S: SessionStore> {
    transport: T,
    session: S,
    location: Location,
}

impl<T: Transport, S: SessionStore> ApiClient<T, S> {
    pub fn new(transport: T, session: S) -> Self {
        Self {
            transport,
            session,
            location: Location::default(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        let response = self.send(ApiRequest::new(Method::Get, path))?;
        decode(&response)
    }

    /// GET where "nothing there" is a normal answer: 404 and empty bodies
    /// come back as `None`.
    pub fn get_optional<R: DeserializeOwned>(&self, path: &str) -> Result<Option<R>> {
        match self.send(ApiRequest::new(Method::Get, path)) {
            Ok(response) if response.body.trim().is_empty() => Ok(None),
            Ok(response) => decode(&response),
            Err(ShelfieError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn post<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R> {
        let response = self.send(ApiRequest::new(Method::Post, path).with_body(to_value(body)?))?;
        decode(&response)
    }

    /// POST whose response body is ignored.
    pub fn post_unit<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        self.send(ApiRequest::new(Method::Post, path).with_body(to_value(body)?))?;
        Ok(())
    }

    pub fn put<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R> {
        let response = self.send(ApiRequest::new(Method::Put, path).with_body(to_value(body)?))?;
        decode(&response)
    }

    pub fn put_unit<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        self.send(ApiRequest::new(Method::Put, path).with_body(to_value(body)?))?;
        Ok(())
    }

    pub fn delete(&self, path: &str) -> Result<()> {
        self.send(ApiRequest::new(Method::Delete, path))?;
        Ok(())
    }

    /// Run a request through both interceptors.
    pub fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let request = self.prepare(request);
        let request_id = request.header(REQUEST_ID_HEADER).unwrap_or("").to_string();
        tracing::debug!(method = %request.method, path = %request.path, request_id = %request_id, "request");

        let response = self.transport.send(&request).inspect_err(|e| {
            tracing::warn!(method = %request.method, path = %request.path, error = %e, "no response");
        })?;

        tracing::debug!(status = response.status, path = %request.path, "response");
        if response.is_success() {
            return Ok(response);
        }

        let error = error_from_response(&response, &request.path);
        if matches!(error, ShelfieError::Unauthorized) {
            tracing::info!(path = %request.path, "401 received, clearing session");
            self.handle_unauthorized();
        } else {
            tracing::warn!(
                method = %request.method,
                path = %request.path,
                status = response.status,
                request_id = %request_id,
                error = %error,
                "request failed"
            );
        }
        Err(error)
    }

    fn prepare(&self, request: ApiRequest) -> ApiRequest {
        let mut request = request
            .with_header("Accept", "application/json")
            .with_header(REQUEST_ID_HEADER, Uuid::new_v4().to_string());
        if let Some(token) = session::token(&self.session) {
            request = request.with_header("Authorization", format!("Bearer {}", token));
        }
        request
    }

    fn handle_unauthorized(&self) {
        if let Err(e) = session::clear(&self.session) {
            tracing::warn!(error = %e, "failed to clear session after 401");
        }
        if !self.location.is_at(&Route::Login) {
            self.location.navigate(Route::Login);
        }
    }
}

fn to_value<B: Serialize>(body: &B) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(body)?)
}

fn decode<R: DeserializeOwned>(response: &ApiResponse) -> Result<R> {
    let body = response.body.trim();
    let body = if body.is_empty() { "null" } else { body };
    Ok(serde_json::from_str(body)?)
}

/// Error payloads seen from the backend: `{ message }`, ASP.NET problem
/// details `{ title, errors: { Field: [..] } }`, or plain text.
#[derive(Deserialize, Default)]
struct ErrorBody {
    #[serde(default, alias = "Message")]
    message: Option<String>,
    #[serde(default, alias = "Title")]
    title: Option<String>,
    #[serde(default, alias = "Errors")]
    errors: BTreeMap<String, Vec<String>>,
}

fn error_from_response(response: &ApiResponse, path: &str) -> ShelfieError {
    let raw = response.body.trim();
    let parsed: ErrorBody = serde_json::from_str(raw).unwrap_or_default();
    let message = parsed
        .message
        .or(parsed.title)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            if raw.is_empty() || raw.starts_with('{') {
                path.to_string()
            } else {
                raw.to_string()
            }
        });

    match response.status {
        400 => ShelfieError::BadRequest {
            message,
            field_errors: parsed.errors,
        },
        401 => ShelfieError::Unauthorized,
        403 => ShelfieError::Forbidden(message),
        404 => ShelfieError::NotFound(message),
        422 => ShelfieError::Unprocessable(message),
        status @ 500..=599 => ShelfieError::Server { status, message },
        status => ShelfieError::Http { status, message },
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::model::User;
    use crate::session::MemSessionStore;
    use crate::transport::memory::MemTransport;

    pub type TestClient = ApiClient<MemTransport, MemSessionStore>;

    pub fn reader() -> User {
        User {
            user_id: 42,
            user_name: "minh".into(),
            email: Some("minh@example.com".into()),
            full_name: Some("Minh Tran".into()),
            role_id: 2,
        }
    }

    pub fn anonymous_client() -> TestClient {
        ApiClient::new(MemTransport::new(), MemSessionStore::new())
    }

    pub fn logged_in_client() -> TestClient {
        ApiClient::new(
            MemTransport::new(),
            MemSessionStore::logged_in("secret-token", &reader()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::session::{TOKEN_KEY, USER_KEY};
    use serde_json::json;

    #[test]
    fn attaches_bearer_token_and_request_id() {
        let client = logged_in_client();
        client
            .transport()
            .on(Method::Get, "/api/Book", 200, json!([]));

        let _: Vec<serde_json::Value> = client.get("/api/Book").unwrap();
        let sent = client.transport().last_request().unwrap();
        assert_eq!(sent.header("Authorization"), Some("Bearer secret-token"));
        assert!(sent.header(REQUEST_ID_HEADER).is_some());
    }

    #[test]
    fn token_is_read_on_every_request() {
        let client = logged_in_client();
        client
            .transport()
            .on(Method::Get, "/api/Book", 200, json!([]));
        client.session().set(TOKEN_KEY, "rotated").unwrap();

        let _: Vec<serde_json::Value> = client.get("/api/Book").unwrap();
        let sent = client.transport().last_request().unwrap();
        assert_eq!(sent.header("Authorization"), Some("Bearer rotated"));
    }

    #[test]
    fn anonymous_requests_have_no_auth_header() {
        let client = anonymous_client();
        client
            .transport()
            .on(Method::Get, "/api/Book", 200, json!([]));
        let _: Vec<serde_json::Value> = client.get("/api/Book").unwrap();
        assert!(client
            .transport()
            .last_request()
            .unwrap()
            .header("Authorization")
            .is_none());
    }

    #[test]
    fn unauthorized_clears_session_and_redirects_to_login() {
        let client = logged_in_client();
        client.location().navigate(Route::Library);
        client
            .transport()
            .on(Method::Get, "/api/UserBook", 401, json!({}));

        let err = client
            .get::<Vec<serde_json::Value>>("/api/UserBook")
            .unwrap_err();
        assert!(matches!(err, ShelfieError::Unauthorized));
        assert!(client.session().get(TOKEN_KEY).is_none());
        assert!(client.session().get(USER_KEY).is_none());
        assert_eq!(client.location().current(), Route::Login);
    }

    #[test]
    fn unauthorized_on_login_page_stays_put() {
        let client = logged_in_client();
        client.location().navigate(Route::Login);
        client
            .transport()
            .on(Method::Post, "/api/Auth/login", 401, json!({}));

        let result: Result<serde_json::Value> = client.post("/api/Auth/login", &json!({}));
        assert!(result.is_err());
        assert!(client.session().get(TOKEN_KEY).is_none());
        assert_eq!(client.location().current(), Route::Login);
    }

    #[test]
    fn bad_request_keeps_field_errors() {
        let client = logged_in_client();
        client.transport().on(
            Method::Post,
            "/api/Bookshelf",
            400,
            json!({
                "title": "One or more validation errors occurred.",
                "errors": { "Name": ["The Name field is required."] }
            }),
        );

        let err = client
            .post::<_, serde_json::Value>("/api/Bookshelf", &json!({}))
            .unwrap_err();
        match err {
            ShelfieError::BadRequest {
                message,
                field_errors,
            } => {
                assert_eq!(message, "One or more validation errors occurred.");
                assert_eq!(field_errors["Name"], vec!["The Name field is required."]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn maps_status_codes() {
        let client = anonymous_client();
        let t = client.transport();
        t.on(Method::Get, "/a", 403, json!({ "message": "admins only" }));
        t.on_text(Method::Get, "/b", 404, "");
        t.on(Method::Get, "/c", 422, json!({}));
        t.on_text(Method::Get, "/d", 503, "upstream down");
        t.on_text(Method::Get, "/e", 409, "");

        let get = |p: &str| client.get::<serde_json::Value>(p).unwrap_err();
        assert!(matches!(get("/a"), ShelfieError::Forbidden(m) if m == "admins only"));
        assert!(matches!(get("/b"), ShelfieError::NotFound(_)));
        assert!(matches!(get("/c"), ShelfieError::Unprocessable(_)));
        assert!(
            matches!(get("/d"), ShelfieError::Server { status: 503, message } if message == "upstream down")
        );
        assert!(matches!(get("/e"), ShelfieError::Http { status: 409, .. }));
    }

    #[test]
    fn get_optional_maps_missing_to_none() {
        let client = logged_in_client();
        client
            .transport()
            .on_text(Method::Get, "/api/Review/book/1/my-review", 200, "");
        let review: Option<serde_json::Value> =
            client.get_optional("/api/Review/book/1/my-review").unwrap();
        assert!(review.is_none());

        let missing: Option<serde_json::Value> =
            client.get_optional("/api/Review/book/2/my-review").unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn unit_helpers_ignore_body() {
        let client = logged_in_client();
        client
            .transport()
            .on(Method::Put, "/api/UserBook/1/status", 200, json!({ "ok": true }));
        client
            .put_unit("/api/UserBook/1/status", &json!({ "StatusId": 3 }))
            .unwrap();
        assert_eq!(client.transport().writes(), 1);
    }
}
