use crate::client::ApiClient;
use crate::error::Result;
use crate::model::{AuthResponse, LoginInput, RegisterInput, User};
use crate::session::SessionStore;
use crate::transport::Transport;

pub fn login<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    input: &LoginInput,
) -> Result<AuthResponse> {
    client.post("/api/Auth/login", input)
}

pub fn register<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    input: &RegisterInput,
) -> Result<AuthResponse> {
    client.post("/api/Auth/register", input)
}

pub fn me<T: Transport, S: SessionStore>(client: &ApiClient<T, S>) -> Result<User> {
    client.get("/api/Auth/me")
}
