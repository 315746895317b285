use crate::client::ApiClient;
use crate::commands::{CmdMessage, CmdResult};
use crate::eligibility::{self, QueryState, ReviewEligibility};
use crate::error::{Result, ShelfieError};
use crate::model::{BookId, CommentId, CommentInput, Review, ReviewId, ReviewInput};
use crate::query::{mutations, queries, QueryCache};
use crate::session::SessionStore;
use crate::transport::Transport;
use crate::validation;

pub fn list<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    book_id: BookId,
) -> Result<CmdResult> {
    let reviews = queries::book_reviews(client, cache, book_id)?;
    let mut result = CmdResult::default();
    if reviews.is_empty() {
        result.add_message(CmdMessage::info("Chưa có đánh giá nào"));
    }
    Ok(result.with_reviews(reviews))
}

/// Write a review. The form is checked first, then the same eligibility the
/// book page shows; a reader who may not review yet gets the prompt back as
/// [`ShelfieError::NotEligible`].
pub fn write<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    book_id: BookId,
    rating: u8,
    content: &str,
    is_public: bool,
) -> Result<CmdResult> {
    let input = ReviewInput {
        book_id,
        rating,
        content: content.trim().to_string(),
        is_public,
    };
    validation::review(&input)?;

    let can_review = QueryState::from(queries::can_review(client, cache, book_id));
    let membership = QueryState::from(queries::library_check(client, cache, book_id));
    let my_review = QueryState::from(queries::my_review(client, cache, book_id));
    let decision = eligibility::decide(&can_review, &membership, &my_review);
    if decision != ReviewEligibility::CanWrite {
        return Err(ShelfieError::NotEligible(decision.prompt()));
    }

    let review = mutations::create_review(client, cache, &input)?;
    Ok(CmdResult::default()
        .with_message(CmdMessage::success("Đã đăng đánh giá"))
        .with_reviews(vec![review]))
}

/// Change the reader's own review of a book. Fields left `None` keep their
/// current value.
pub fn edit<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    book_id: BookId,
    rating: Option<u8>,
    content: Option<&str>,
    is_public: Option<bool>,
) -> Result<CmdResult> {
    let current = own_review(client, cache, book_id)?;
    let input = ReviewInput {
        book_id,
        rating: rating.unwrap_or(current.rating),
        content: content
            .map(|c| c.trim().to_string())
            .unwrap_or_else(|| current.content.clone()),
        is_public: is_public.unwrap_or(current.is_public),
    };
    mutations::update_review(client, cache, current.review_id, &input)?;
    Ok(CmdResult::default().with_message(CmdMessage::success("Đã cập nhật đánh giá")))
}

pub fn delete<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    book_id: BookId,
) -> Result<CmdResult> {
    let current = own_review(client, cache, book_id)?;
    mutations::delete_review(client, cache, current.review_id, book_id)?;
    Ok(CmdResult::default().with_message(CmdMessage::success("Đã xóa đánh giá")))
}

fn own_review<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    book_id: BookId,
) -> Result<Review> {
    queries::my_review(client, cache, book_id)?
        .ok_or_else(|| ShelfieError::NotFound("Bạn chưa đánh giá cuốn sách này".to_string()))
}

pub fn comments<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    review_id: ReviewId,
) -> Result<CmdResult> {
    let comments = queries::comments(client, cache, review_id)?;
    let mut result = CmdResult::default();
    if comments.is_empty() {
        result.add_message(CmdMessage::info("Chưa có bình luận nào"));
    }
    Ok(result.with_comments(comments))
}

pub fn comment<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    review_id: ReviewId,
    content: &str,
) -> Result<CmdResult> {
    let input = CommentInput {
        content: content.trim().to_string(),
    };
    let comment = mutations::add_comment(client, cache, review_id, &input)?;
    Ok(CmdResult::default()
        .with_message(CmdMessage::success("Đã gửi bình luận"))
        .with_comments(vec![comment]))
}

pub fn edit_comment<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    review_id: ReviewId,
    comment_id: CommentId,
    content: &str,
) -> Result<CmdResult> {
    let input = CommentInput {
        content: content.trim().to_string(),
    };
    mutations::update_comment(client, cache, review_id, comment_id, &input)?;
    Ok(CmdResult::default().with_message(CmdMessage::success("Đã sửa bình luận")))
}

pub fn delete_comment<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    review_id: ReviewId,
    comment_id: CommentId,
) -> Result<CmdResult> {
    mutations::delete_comment(client, cache, review_id, comment_id)?;
    Ok(CmdResult::default().with_message(CmdMessage::success("Đã xóa bình luận")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fixtures::logged_in_client;
    use crate::commands::fixtures::cache;
    use crate::transport::Method;
    use serde_json::json;

    #[test]
    fn invalid_form_is_rejected_before_any_request() {
        let client = logged_in_client();
        let err = write(&client, &mut cache(), 4, 0, "  ", true).unwrap_err();
        match err {
            ShelfieError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(client.transport().total(), 0);
    }

    #[test]
    fn unread_book_fails_with_the_prompt() {
        let client = logged_in_client();
        let t = client.transport();
        t.on(Method::Get, "/api/Review/book/4/can-review", 200, json!(false));
        t.on(
            Method::Get,
            "/api/UserBook/check/4",
            200,
            json!({ "Exists": true, "StatusId": 1 }),
        );

        match write(&client, &mut cache(), 4, 5, "Hay", true).unwrap_err() {
            ShelfieError::NotEligible(prompt) => assert!(prompt.contains("Muốn đọc")),
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(t.writes(), 0);
    }

    #[test]
    fn permitted_review_is_posted() {
        let client = logged_in_client();
        let t = client.transport();
        t.on(Method::Get, "/api/Review/book/4/can-review", 200, json!(true));
        t.on(
            Method::Get,
            "/api/UserBook/check/4",
            200,
            json!({ "Exists": true, "StatusId": 3 }),
        );
        t.on(
            Method::Post,
            "/api/Review",
            201,
            json!({ "ReviewId": 11, "BookId": 4, "Rating": 5, "Content": "Hay" }),
        );

        let result = write(&client, &mut cache(), 4, 5, " Hay ", false).unwrap();
        assert_eq!(result.reviews[0].review_id, 11);
        let body = t.last_request().unwrap().body.unwrap();
        assert_eq!(
            body,
            json!({ "BookId": 4, "Rating": 5, "Content": "Hay", "IsPublic": false })
        );
    }

    #[test]
    fn edit_keeps_unchanged_fields() {
        let client = logged_in_client();
        let t = client.transport();
        t.on(
            Method::Get,
            "/api/Review/book/4/my-review",
            200,
            json!({ "ReviewId": 11, "BookId": 4, "Rating": 3, "Content": "Tạm", "IsPublic": false }),
        );
        t.on_text(Method::Put, "/api/Review/11", 204, "");

        edit(&client, &mut cache(), 4, Some(4), None, None).unwrap();
        let body = t.last_request().unwrap().body.unwrap();
        assert_eq!(
            body,
            json!({ "BookId": 4, "Rating": 4, "Content": "Tạm", "IsPublic": false })
        );
    }

    #[test]
    fn deleting_without_a_review_is_not_found() {
        let client = logged_in_client();
        let err = delete(&client, &mut cache(), 4).unwrap_err();
        assert!(matches!(err, ShelfieError::NotFound(_)));
        assert_eq!(client.transport().writes(), 0);
    }

    #[test]
    fn empty_comment_is_rejected() {
        let client = logged_in_client();
        let err = comment(&client, &mut cache(), 3, " ").unwrap_err();
        assert!(err.to_string().contains("Nội dung bình luận không được để trống"));
        assert_eq!(client.transport().total(), 0);
    }
}
