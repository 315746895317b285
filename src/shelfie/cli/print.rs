use chrono::{DateTime, Utc};
use colored::Colorize;
use shelfie::commands::{CmdMessage, CmdResult, MessageLevel, PageView};
use shelfie::derived::{BookDetail, HomePageData, LibraryStats, ProfileData};
use shelfie::error::ShelfieError;
use shelfie::model::{Author, Book, Comment, Genre, Review, Shelf, User, UserBook};
use shelfie::progress;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const TITLE_WIDTH: usize = 44;
const AUTHOR_WIDTH: usize = 24;
const NAME_WIDTH: usize = 32;
const BAR_WIDTH: usize = 20;

pub(super) fn print_result(result: &CmdResult) {
    if let Some(page) = &result.page {
        print_page(page);
    } else {
        if let Some(user) = &result.user {
            print_user(user);
        }
        print_books(&result.books);
        print_authors(&result.authors);
        print_genres(&result.genres);
        print_library(&result.library);
        print_shelves(&result.shelves);
        print_reviews(&result.reviews);
        print_comments(&result.comments);
    }
    print_messages(&result.messages);
}

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

/// Errors from the library get a hint where one helps.
pub fn print_error(error: &anyhow::Error) {
    match error.downcast_ref::<ShelfieError>() {
        Some(ShelfieError::Unauthorized) => {
            eprintln!("{} {}", "Error:".red(), error);
            eprintln!("{}", "Run `shelfie login <user name>` to log in.".dimmed());
        }
        Some(ShelfieError::Validation(errors)) => {
            eprintln!("{}", "Error: please fix the following".red());
            for e in errors {
                eprintln!("  {} {}", format!("{}:", e.field).bold(), e.message);
            }
        }
        Some(ShelfieError::BadRequest {
            message,
            field_errors,
        }) if !field_errors.is_empty() => {
            eprintln!("{} {}", "Error:".red(), message);
            for (field, messages) in field_errors {
                for m in messages {
                    eprintln!("  {} {}", format!("{}:", field).bold(), m);
                }
            }
        }
        _ => eprintln!("{} {:#}", "Error:".red(), error),
    }
}

fn print_page(page: &PageView) {
    match page {
        PageView::Home(data) => print_home(data),
        PageView::Profile(data) => print_profile(data),
        PageView::Book(detail) => print_book_detail(detail),
        PageView::Author(detail) => {
            heading(&detail.author.name);
            if let Some(bio) = &detail.author.biography {
                println!("{}\n", bio);
            }
            println!("{} books", detail.author.book_count);
            print_books(&detail.books);
        }
        PageView::Genre(detail) => {
            heading(&detail.genre.name);
            if let Some(description) = &detail.genre.description {
                println!("{}\n", description);
            }
            print_books(&detail.books);
        }
    }
}

fn print_home(data: &HomePageData) {
    if let Some(preview) = &data.library_preview {
        heading("Your library");
        if preview.is_empty() {
            println!("{}", "Nothing here yet. Add a book with `shelfie add <id>`.".dimmed());
        } else {
            print_library(preview);
        }
    }
    heading("Popular");
    print_books(&data.popular);
    heading("Recently added");
    print_books(&data.recent);
    if !data.genres.is_empty() {
        heading("Genres");
        let names: Vec<String> = data
            .genres
            .iter()
            .map(|g| format!("{} {}", g.name, format!("#{}", g.genre_id).dimmed()))
            .collect();
        println!("{}", names.join("  "));
    }
}

fn print_profile(data: &ProfileData) {
    print_user(&data.user);
    print_stats(&data.stats);
    heading("Shelves");
    print_shelves(&data.shelves);
}

fn print_stats(stats: &LibraryStats) {
    heading("Reading");
    println!("  {:<14}{}", "In library", stats.total);
    println!("  {:<14}{}", "Want to read", stats.want_to_read);
    println!("  {:<14}{}", "Reading", stats.currently_reading);
    println!("  {:<14}{}", "Read", stats.read);
    println!("  {:<14}{}", "Pages read", stats.pages_read);
    if stats.currently_reading > 0 {
        println!(
            "  {:<14}{} {}%",
            "Avg progress",
            progress::bar(stats.average_progress, BAR_WIDTH),
            stats.average_progress
        );
    }
}

fn print_book_detail(detail: &BookDetail) {
    let book = &detail.book;
    heading(&book.title);

    let mut facts = Vec::new();
    if let Some(author) = &book.author_name {
        facts.push(author.clone());
    }
    if let Some(genre) = &book.genre_name {
        facts.push(genre.clone());
    }
    if let Some(year) = book.publication_year {
        facts.push(year.to_string());
    }
    if book.page_count > 0 {
        facts.push(format!("{} pages", book.page_count));
    }
    if let Some(isbn) = &book.isbn13 {
        facts.push(format!("ISBN {}", isbn));
    }
    if !facts.is_empty() {
        println!("{}", facts.join(" · ").dimmed());
    }
    println!(
        "{} ({} reviews)",
        stars(book.average_rating.round() as u8),
        book.review_count
    );
    if let Some(description) = &book.description {
        println!("\n{}", description);
    }

    if let Some(check) = detail.membership.as_ref().filter(|c| c.exists) {
        println!();
        match &check.user_book {
            Some(entry) => print_library(std::slice::from_ref(entry)),
            None => {
                if let Some(status) = check.status_id {
                    println!("In your library: {}", status.label().cyan());
                }
            }
        }
    }

    heading("Reviews");
    if detail.reviews.is_empty() {
        println!("{}", "No reviews yet.".dimmed());
    } else {
        print_reviews(&detail.reviews);
    }
}

fn print_user(user: &User) {
    let mut line = user.user_name.bold().to_string();
    if let Some(full_name) = &user.full_name {
        line.push_str(&format!(" ({})", full_name));
    }
    if let Some(email) = &user.email {
        line.push_str(&format!(" <{}>", email));
    }
    if user.is_admin() {
        line.push_str(&format!(" {}", "admin".magenta()));
    }
    println!("{}", line);
}

fn print_books(books: &[Book]) {
    for book in books {
        let author = book.author_name.as_deref().unwrap_or("");
        println!(
            "{} {}  {}  {}",
            format!("{:>5}.", book.book_id).yellow(),
            pad_to_width(&truncate_to_width(&book.title, TITLE_WIDTH), TITLE_WIDTH),
            pad_to_width(&truncate_to_width(author, AUTHOR_WIDTH), AUTHOR_WIDTH).dimmed(),
            format!("{:.1}★", book.average_rating),
        );
    }
}

fn print_authors(authors: &[Author]) {
    for author in authors {
        println!(
            "{} {}  {}",
            format!("{:>5}.", author.author_id).yellow(),
            pad_to_width(&truncate_to_width(&author.name, NAME_WIDTH), NAME_WIDTH),
            format!("{} books", author.book_count).dimmed(),
        );
    }
}

fn print_genres(genres: &[Genre]) {
    for genre in genres {
        println!(
            "{} {}  {}",
            format!("{:>5}.", genre.genre_id).yellow(),
            pad_to_width(&truncate_to_width(&genre.name, NAME_WIDTH), NAME_WIDTH),
            genre
                .description
                .as_deref()
                .map(|d| truncate_to_width(d, TITLE_WIDTH))
                .unwrap_or_default()
                .dimmed(),
        );
    }
}

fn print_library(entries: &[UserBook]) {
    for entry in entries {
        let percent = progress::for_user_book(entry);
        let pages = match entry.page_count() {
            0 => String::new(),
            total => format!("p. {}/{}", entry.current_page, total),
        };
        println!(
            "{} {}  {}  {} {:>3}%  {}",
            format!("{:>5}.", entry.book_id).yellow(),
            pad_to_width(&truncate_to_width(&entry.title(), TITLE_WIDTH), TITLE_WIDTH),
            pad_to_width(entry.status_id.label(), 9).cyan(),
            progress::bar(percent, BAR_WIDTH),
            percent,
            pages.dimmed(),
        );
        if let Some(notes) = entry.notes.as_deref().filter(|n| !n.trim().is_empty()) {
            println!("        {}", notes.dimmed());
        }
    }
}

fn print_shelves(shelves: &[Shelf]) {
    for shelf in shelves {
        let marker = if shelf.is_default { " (default)" } else { "" };
        println!(
            "{} {}{}  {}",
            format!("{:>5}.", shelf.shelf_id).yellow(),
            shelf.name.bold(),
            marker.dimmed(),
            format!("{} books", shelf.book_count).dimmed(),
        );
    }
}

fn print_reviews(reviews: &[Review]) {
    for (i, review) in reviews.iter().enumerate() {
        if i > 0 {
            println!();
        }
        let author = review.user_name.as_deref().unwrap_or("?");
        let mut header = format!(
            "{} {}  {}",
            format!("#{}", review.review_id).yellow(),
            stars(review.rating),
            author.bold()
        );
        if !review.is_public {
            header.push_str(&format!(" {}", "[private]".magenta()));
        }
        if let Some(at) = review.created_at {
            header.push_str(&format!("  {}", format_time_ago(at).dimmed()));
        }
        println!("{}", header);
        for line in review.content.lines() {
            println!("    {}", line);
        }
        if review.comment_count > 0 {
            println!("    {}", format!("{} comments", review.comment_count).dimmed());
        }
    }
}

fn print_comments(comments: &[Comment]) {
    for comment in comments {
        let author = comment.user_name.as_deref().unwrap_or("?");
        let mut header = format!("{} {}", format!("#{}", comment.comment_id).yellow(), author.bold());
        if let Some(at) = comment.created_at {
            header.push_str(&format!("  {}", format_time_ago(at).dimmed()));
        }
        if comment.is_edited {
            header.push_str(&format!(" {}", "(edited)".dimmed()));
        }
        println!("{}", header);
        println!("    {}", comment.content);
    }
}

fn heading(title: &str) {
    println!("\n{}", title.bold().underline());
}

fn stars(rating: u8) -> String {
    let filled = usize::from(rating.min(5));
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

/// `format!("{:<n}")` counts chars, not columns; Vietnamese titles need columns.
fn pad_to_width(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(padding))
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    Formatter::new().convert(duration.to_std().unwrap_or_default())
}
