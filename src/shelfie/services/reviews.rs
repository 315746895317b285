use crate::client::ApiClient;
use crate::error::Result;
use crate::model::{
    BookId, CanReview, CanReviewWire, Comment, CommentId, CommentInput, Review, ReviewId,
    ReviewInput,
};
use crate::session::SessionStore;
use crate::transport::Transport;

pub fn create_review<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    input: &ReviewInput,
) -> Result<Review> {
    client.post("/api/Review", input)
}

pub fn update_review<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    id: ReviewId,
    input: &ReviewInput,
) -> Result<()> {
    client.put_unit(&format!("/api/Review/{}", id), input)
}

pub fn delete_review<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    id: ReviewId,
) -> Result<()> {
    client.delete(&format!("/api/Review/{}", id))
}

pub fn get_book_reviews<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    book_id: BookId,
) -> Result<Vec<Review>> {
    client.get(&format!("/api/Review/book/{}", book_id))
}

pub fn can_review<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    book_id: BookId,
) -> Result<CanReview> {
    let wire: CanReviewWire = client.get(&format!("/api/Review/book/{}/can-review", book_id))?;
    Ok(wire.into())
}

/// The current reader's review of a book; `None` when there is none.
pub fn my_review<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    book_id: BookId,
) -> Result<Option<Review>> {
    client.get_optional(&format!("/api/Review/book/{}/my-review", book_id))
}

pub fn get_comments<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    review_id: ReviewId,
) -> Result<Vec<Comment>> {
    client.get(&format!("/api/Review/{}/comments", review_id))
}

pub fn add_comment<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    review_id: ReviewId,
    input: &CommentInput,
) -> Result<Comment> {
    client.post(&format!("/api/Review/{}/comments", review_id), input)
}

pub fn update_comment<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    review_id: ReviewId,
    comment_id: CommentId,
    input: &CommentInput,
) -> Result<()> {
    client.put_unit(
        &format!("/api/Review/{}/comments/{}", review_id, comment_id),
        input,
    )
}

pub fn delete_comment<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    review_id: ReviewId,
    comment_id: CommentId,
) -> Result<()> {
    client.delete(&format!("/api/Review/{}/comments/{}", review_id, comment_id))
}
