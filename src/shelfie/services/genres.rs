use crate::client::ApiClient;
use crate::error::Result;
use crate::model::{Genre, GenreId, GenreInput};
use crate::session::SessionStore;
use crate::transport::Transport;

pub fn get_genres<T: Transport, S: SessionStore>(client: &ApiClient<T, S>) -> Result<Vec<Genre>> {
    client.get("/api/genre")
}

pub fn get_genre<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    id: GenreId,
) -> Result<Genre> {
    client.get(&format!("/api/genre/{}", id))
}

pub fn create_genre<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    input: &GenreInput,
) -> Result<Genre> {
    client.post("/api/genre", input)
}

pub fn update_genre<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    id: GenreId,
    input: &GenreInput,
) -> Result<()> {
    client.put_unit(&format!("/api/genre/{}", id), input)
}

pub fn delete_genre<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    id: GenreId,
) -> Result<()> {
    client.delete(&format!("/api/genre/{}", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fixtures::logged_in_client;
    use crate::transport::Method;
    use serde_json::json;

    #[test]
    fn genre_crud_uses_lowercase_path() {
        let client = logged_in_client();
        let t = client.transport();
        t.on(
            Method::Get,
            "/api/genre",
            200,
            json!([{ "GenreId": 1, "Name": "Fantasy", "BookCount": 4 }]),
        );
        t.on(
            Method::Post,
            "/api/genre",
            201,
            json!({ "GenreId": 2, "Name": "Poetry" }),
        );
        t.on_text(Method::Put, "/api/genre/2", 204, "");
        t.on_text(Method::Delete, "/api/genre/2", 204, "");

        assert_eq!(get_genres(&client).unwrap()[0].book_count, 4);
        let input = GenreInput {
            name: "Poetry".into(),
            description: None,
        };
        assert_eq!(create_genre(&client, &input).unwrap().genre_id, 2);
        update_genre(&client, 2, &input).unwrap();
        delete_genre(&client, 2).unwrap();
        assert_eq!(t.writes(), 3);
    }
}
