//! Every cache key in one place. Invalidation relies on these nesting the
//! way they do: everything about one book's reviews sits under
//! `reviews/book/{id}`, everything about the library under `library`.

use super::cache::QueryKey;
use crate::model::{AuthorId, BookId, GenreId, ReviewId};

pub fn books() -> QueryKey {
    QueryKey::new(["books"])
}

pub fn all_books() -> QueryKey {
    books().child("all")
}

pub fn book(id: BookId) -> QueryKey {
    books().child(id)
}

pub fn authors() -> QueryKey {
    QueryKey::new(["authors"])
}

pub fn all_authors() -> QueryKey {
    authors().child("all")
}

pub fn author(id: AuthorId) -> QueryKey {
    authors().child(id)
}

pub fn author_books(id: AuthorId) -> QueryKey {
    author(id).child("books")
}

pub fn genres() -> QueryKey {
    QueryKey::new(["genres"])
}

pub fn all_genres() -> QueryKey {
    genres().child("all")
}

pub fn genre(id: GenreId) -> QueryKey {
    genres().child(id)
}

pub fn book_reviews(book_id: BookId) -> QueryKey {
    QueryKey::new(["reviews", "book"]).child(book_id)
}

pub fn review_list(book_id: BookId) -> QueryKey {
    book_reviews(book_id).child("list")
}

pub fn can_review(book_id: BookId) -> QueryKey {
    book_reviews(book_id).child("can-review")
}

pub fn my_review(book_id: BookId) -> QueryKey {
    book_reviews(book_id).child("mine")
}

pub fn comments(review_id: ReviewId) -> QueryKey {
    QueryKey::new(["comments"]).child(review_id)
}

pub fn library() -> QueryKey {
    QueryKey::new(["library"])
}

pub fn library_entries() -> QueryKey {
    library().child("entries")
}

pub fn library_check(book_id: BookId) -> QueryKey {
    library().child("check").child(book_id)
}

pub fn shelves() -> QueryKey {
    QueryKey::new(["shelves"])
}

pub fn me() -> QueryKey {
    QueryKey::new(["me"])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn review_keys_nest_under_the_book() {
        assert!(can_review(4).starts_with(&book_reviews(4)));
        assert!(my_review(4).starts_with(&book_reviews(4)));
        assert!(review_list(4).starts_with(&book_reviews(4)));
        assert!(!can_review(41).starts_with(&book_reviews(4)));
    }

    #[test]
    fn library_keys_nest_under_library() {
        assert!(library_entries().starts_with(&library()));
        assert!(library_check(9).starts_with(&library()));
    }

    #[test]
    fn collection_and_item_keys_differ() {
        assert_ne!(all_books(), book(1));
        assert!(all_books().starts_with(&books()));
        assert_eq!(author_books(3).to_string(), "authors/3/books");
    }
}
