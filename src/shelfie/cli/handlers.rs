use super::print;
use super::AppContext;
use crate::args::{AdminAction, BookDetails, CommentAction, ConfigAction, ReviewAction, ShelfAction};
use anyhow::{bail, Context};
use shelfie::commands::admin::BookPatch;
use shelfie::commands::browse::BookFilter;
use shelfie::commands::CmdResult;
use shelfie::config::ShelfieConfig;
use shelfie::model::{BookInput, GenreInput};
use shelfie::session::FileSessionStore;
use std::io::{BufRead, IsTerminal, Write};

/// Print a command's result, or hand its error up to `main`.
pub(super) fn show(result: shelfie::error::Result<CmdResult>) -> anyhow::Result<()> {
    let result = result?;
    print::print_result(&result);
    Ok(())
}

pub(super) fn handle_login(
    ctx: &mut AppContext,
    user_name: &str,
    password: Option<String>,
) -> anyhow::Result<()> {
    let password = match password {
        Some(p) => p,
        None => read_password()?,
    };
    show(ctx.api.login(user_name, &password))
}

pub(super) fn handle_register(
    ctx: &mut AppContext,
    user_name: &str,
    email: &str,
    password: Option<String>,
) -> anyhow::Result<()> {
    let password = match password {
        Some(p) => p,
        None => read_password()?,
    };
    show(ctx.api.register(user_name, email, &password))
}

/// One line from stdin, prompting only when a person is typing.
fn read_password() -> anyhow::Result<String> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        eprint!("Password: ");
        std::io::stderr().flush()?;
    }
    let mut line = String::new();
    stdin
        .lock()
        .read_line(&mut line)
        .context("reading password from stdin")?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        bail!("No password given (pass --password, set SHELFIE_PASSWORD or type it on stdin)");
    }
    Ok(password)
}

pub(super) fn handle_books(
    ctx: &mut AppContext,
    search: Option<String>,
    genre_id: Option<i64>,
    author_id: Option<i64>,
    limit: Option<usize>,
) -> anyhow::Result<()> {
    let filter = BookFilter {
        search,
        genre_id,
        author_id,
        limit,
    };
    show(ctx.api.books(&filter))
}

pub(super) fn handle_book(ctx: &mut AppContext, id: i64, resolve: bool) -> anyhow::Result<()> {
    if resolve {
        show(ctx.api.resolve_review_prompt(id))
    } else {
        show(ctx.api.book(id))
    }
}

pub(super) fn handle_shelf(ctx: &mut AppContext, action: Option<ShelfAction>) -> anyhow::Result<()> {
    match action.unwrap_or(ShelfAction::List) {
        ShelfAction::List => show(ctx.api.shelves()),
        ShelfAction::Show { id } => show(ctx.api.shelf(id)),
        ShelfAction::Create { name, description } => show(ctx.api.create_shelf(&name, description)),
        ShelfAction::Rename {
            id,
            name,
            description,
        } => show(ctx.api.update_shelf(id, &name, description)),
        ShelfAction::Delete { id } => show(ctx.api.delete_shelf(id)),
    }
}

pub(super) fn handle_review(ctx: &mut AppContext, action: ReviewAction) -> anyhow::Result<()> {
    match action {
        ReviewAction::List { book_id } => show(ctx.api.reviews(book_id)),
        ReviewAction::Write {
            book_id,
            rating,
            content,
            private,
        } => show(ctx.api.write_review(book_id, rating, &content, !private)),
        ReviewAction::Edit {
            book_id,
            rating,
            content,
            public,
            private,
        } => {
            let visibility = match (public, private) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            show(ctx.api.edit_review(book_id, rating, content.as_deref(), visibility))
        }
        ReviewAction::Delete { book_id } => show(ctx.api.delete_review(book_id)),
    }
}

pub(super) fn handle_comment(ctx: &mut AppContext, action: CommentAction) -> anyhow::Result<()> {
    match action {
        CommentAction::List { review_id } => show(ctx.api.comments(review_id)),
        CommentAction::Add { review_id, content } => show(ctx.api.comment(review_id, &content)),
        CommentAction::Edit {
            review_id,
            comment_id,
            content,
        } => show(ctx.api.edit_comment(review_id, comment_id, &content)),
        CommentAction::Delete {
            review_id,
            comment_id,
        } => show(ctx.api.delete_comment(review_id, comment_id)),
    }
}

pub(super) fn handle_admin(ctx: &mut AppContext, action: Option<AdminAction>) -> anyhow::Result<()> {
    match action.unwrap_or(AdminAction::Dashboard) {
        AdminAction::Dashboard => show(ctx.api.admin_dashboard()),
        AdminAction::AddBook {
            title,
            pages,
            details,
        } => {
            let input = BookInput {
                title,
                isbn13: details.isbn,
                author_id: details.author,
                genre_id: details.genre,
                description: details.description,
                page_count: pages,
                publication_year: details.year,
                cover_url: details.cover,
            };
            show(ctx.api.create_book(&input))
        }
        AdminAction::EditBook {
            id,
            title,
            pages,
            details,
        } => show(ctx.api.update_book(id, book_patch(title, pages, details))),
        AdminAction::DeleteBook { id } => show(ctx.api.delete_book(id)),
        AdminAction::AddGenre { name, description } => {
            show(ctx.api.create_genre(&GenreInput { name, description }))
        }
        AdminAction::EditGenre {
            id,
            name,
            description,
        } => show(ctx.api.update_genre(id, &GenreInput { name, description })),
        AdminAction::DeleteGenre { id } => show(ctx.api.delete_genre(id)),
    }
}

fn book_patch(title: Option<String>, pages: Option<u32>, details: BookDetails) -> BookPatch {
    BookPatch {
        title,
        isbn13: details.isbn,
        author_id: details.author,
        genre_id: details.genre,
        description: details.description,
        page_count: pages,
        publication_year: details.year,
        cover_url: details.cover,
    }
}

pub(super) fn handle_config(ctx: &mut AppContext, action: Option<ConfigAction>) -> anyhow::Result<()> {
    match action.unwrap_or(ConfigAction::Show) {
        ConfigAction::Show => {
            for key in ShelfieConfig::keys() {
                let value = ctx.config.get(key).unwrap_or_default();
                println!("{} = {}", key, value);
            }
        }
        ConfigAction::Get { key } => match ctx.config.get(&key) {
            Some(value) => println!("{}", value),
            None => bail!(
                "Unknown config key '{}' (known: {})",
                key,
                ShelfieConfig::keys().join(", ")
            ),
        },
        ConfigAction::Path => {
            let session = FileSessionStore::new(&ctx.paths.data_dir);
            println!("config:  {}", ctx.paths.config_file().display());
            println!("session: {}", session.path().display());
            println!("cache:   {}", ctx.paths.cache_file().display());
        }
        ConfigAction::Template => print!("{}", ShelfieConfig::template()),
    }
    Ok(())
}
