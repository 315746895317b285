//! Terminal front end.
//!
//! Builds a [`ShelfieApi`] over HTTP from the resolved config, runs one
//! command, prints the [`CmdResult`](shelfie::commands::CmdResult) and
//! writes the query cache back so the next invocation starts warm.

mod handlers;
mod print;

pub use print::print_error;

use crate::args::{Cli, Commands};
use anyhow::Context;
use shelfie::api::ShelfieApi;
use shelfie::config::{AppPaths, ShelfieConfig};
use shelfie::query::{QueryCache, QueryPolicy};
use shelfie::session::FileSessionStore;
use shelfie::transport::http::HttpTransport;
use tracing_subscriber::EnvFilter;

pub struct AppContext {
    pub api: ShelfieApi<HttpTransport, FileSessionStore>,
    pub config: ShelfieConfig,
    pub paths: AppPaths,
}

/// Logs go to stderr. `SHELFIE_LOG` takes an `EnvFilter` directive and wins
/// over `--verbose`.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "shelfie=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("SHELFIE_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    // Already initialized is fine.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn init_context() -> anyhow::Result<AppContext> {
    let paths = AppPaths::resolve().context("resolving shelfie directories")?;
    let config = ShelfieConfig::load(Some(paths.config_dir.as_path()))
        .with_context(|| format!("loading {}", paths.config_file().display()))?;
    tracing::debug!(base_url = %config.base_url, data_dir = %paths.data_dir.display(), "starting");

    let transport = HttpTransport::new(&config.base_url, config.timeout())?;
    let session = FileSessionStore::new(&paths.data_dir);
    let cache = QueryCache::load(paths.cache_file(), QueryPolicy::from(&config));

    Ok(AppContext {
        api: ShelfieApi::with_cache(transport, session, cache),
        config,
        paths,
    })
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let mut ctx = init_context()?;
    let outcome = dispatch(&mut ctx, cli.command);

    if let Err(e) = ctx.api.save_cache(ctx.paths.cache_file()) {
        tracing::warn!(error = %e, "could not save query cache");
    }
    outcome
}

fn dispatch(ctx: &mut AppContext, command: Option<Commands>) -> anyhow::Result<()> {
    use handlers::*;

    match command {
        Some(Commands::Login {
            user_name,
            password,
        }) => handle_login(ctx, &user_name, password),
        Some(Commands::Register {
            user_name,
            email,
            password,
        }) => handle_register(ctx, &user_name, &email, password),
        Some(Commands::Logout) => show(ctx.api.logout()),
        Some(Commands::Whoami) => show(ctx.api.whoami()),
        Some(Commands::Open { path }) => show(ctx.api.open(&path)),
        Some(Commands::Home) | None => show(ctx.api.home()),
        Some(Commands::Profile) => show(ctx.api.profile()),
        Some(Commands::Books {
            search,
            genre,
            author,
            limit,
        }) => handle_books(ctx, search, genre, author, limit),
        Some(Commands::Book { id, resolve }) => handle_book(ctx, id, resolve),
        Some(Commands::Authors { search }) => show(ctx.api.authors(search.as_deref())),
        Some(Commands::Author { id }) => show(ctx.api.author(id)),
        Some(Commands::Genres) => show(ctx.api.genres()),
        Some(Commands::Genre { id }) => show(ctx.api.genre(id)),
        Some(Commands::Library { status, shelf }) => {
            show(ctx.api.library(status.as_deref(), shelf))
        }
        Some(Commands::Add {
            book_id,
            status,
            shelf,
        }) => show(ctx.api.add_to_library(book_id, &status, shelf)),
        Some(Commands::Remove { book_id }) => show(ctx.api.remove_from_library(book_id)),
        Some(Commands::Status { book_id, status }) => show(ctx.api.set_status(book_id, &status)),
        Some(Commands::Progress {
            book_id,
            page,
            notes,
        }) => show(ctx.api.set_progress(book_id, page, notes)),
        Some(Commands::Move { book_id, shelf_id }) => show(ctx.api.move_to_shelf(book_id, shelf_id)),
        Some(Commands::Shelf { action }) => handle_shelf(ctx, action),
        Some(Commands::Review { action }) => handle_review(ctx, action),
        Some(Commands::Comment { action }) => handle_comment(ctx, action),
        Some(Commands::Admin { action }) => handle_admin(ctx, action),
        Some(Commands::Config { action }) => handle_config(ctx, action),
    }
}
