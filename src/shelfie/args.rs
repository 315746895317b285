use clap::{Parser, Subcommand};
use std::sync::OnceLock;

/// "0.3.2" for clean builds, "0.3.2@abc1234" (plus "-dirty") otherwise.
fn version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_DIRTY: &str = env!("GIT_DIRTY");

    static VERSION_STRING: OnceLock<String> = OnceLock::new();
    VERSION_STRING.get_or_init(|| match (GIT_HASH.is_empty(), GIT_DIRTY == "true") {
        (true, _) => VERSION.to_string(),
        (false, false) => format!("{}@{}", VERSION, GIT_HASH),
        (false, true) => format!("{}@{}-dirty", VERSION, GIT_HASH),
    })
}

#[derive(Parser, Debug)]
#[command(name = "shelfie", bin_name = "shelfie", version = version())]
#[command(about = "Track books, shelves, reading progress and reviews", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and remember the session
    Login {
        user_name: String,

        /// Password (prompted on stdin if omitted)
        #[arg(long, env = "SHELFIE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Create an account and log in
    Register {
        user_name: String,
        email: String,

        /// Password (prompted on stdin if omitted)
        #[arg(long, env = "SHELFIE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Render the page at a path (e.g. /books/12, /library, /admin)
    #[command(alias = "o")]
    Open { path: String },

    /// Home page: popular and recent books, genres, your current reads
    Home,

    /// Your profile and reading statistics
    Profile,

    /// List or search the catalog
    #[command(alias = "ls")]
    Books {
        /// Match title or ISBN-13
        #[arg(short, long)]
        search: Option<String>,

        /// Only books of this genre id
        #[arg(long)]
        genre: Option<i64>,

        /// Only books by this author id
        #[arg(long)]
        author: Option<i64>,

        /// Show at most this many books
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Show a book, its reviews and whether you can review it
    Book {
        id: i64,

        /// Act on the review prompt (add to library as read, or mark as read)
        #[arg(long)]
        resolve: bool,
    },

    /// List or search authors
    Authors { search: Option<String> },

    /// Show an author and their books
    Author { id: i64 },

    /// List genres
    Genres,

    /// Show a genre and its books
    Genre { id: i64 },

    /// List your library
    #[command(alias = "lib")]
    Library {
        /// want, reading or read
        #[arg(short, long)]
        status: Option<String>,

        /// Only books on this shelf id
        #[arg(long)]
        shelf: Option<i64>,
    },

    /// Add a book to your library
    Add {
        book_id: i64,

        /// want, reading or read
        #[arg(short, long, default_value = "want")]
        status: String,

        /// Put it on this shelf id
        #[arg(long)]
        shelf: Option<i64>,
    },

    /// Remove a book from your library
    #[command(alias = "rm")]
    Remove { book_id: i64 },

    /// Change a book's reading status (want, reading, read)
    Status { book_id: i64, status: String },

    /// Record the page you are on
    Progress {
        book_id: i64,

        #[arg(allow_negative_numbers = true)]
        page: i64,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Move a book to a shelf (omit the shelf to take it off its shelf)
    Move { book_id: i64, shelf_id: Option<i64> },

    /// Manage shelves
    Shelf {
        #[command(subcommand)]
        action: Option<ShelfAction>,
    },

    /// Read and write reviews
    Review {
        #[command(subcommand)]
        action: ReviewAction,
    },

    /// Read and write comments on reviews
    Comment {
        #[command(subcommand)]
        action: CommentAction,
    },

    /// Catalog administration (admins only)
    Admin {
        #[command(subcommand)]
        action: Option<AdminAction>,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ShelfAction {
    /// List your shelves
    #[command(alias = "ls")]
    List,

    /// Show the books on a shelf
    Show { id: i64 },

    /// Create a shelf
    Create {
        name: String,

        #[arg(short, long)]
        description: Option<String>,
    },

    /// Rename a shelf or change its description
    Rename {
        id: i64,
        name: String,

        #[arg(short, long)]
        description: Option<String>,
    },

    /// Delete a shelf
    #[command(alias = "rm")]
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum ReviewAction {
    /// Reviews of a book
    #[command(alias = "ls")]
    List { book_id: i64 },

    /// Review a book you have read
    Write {
        book_id: i64,

        /// 1 to 5 stars
        #[arg(short, long)]
        rating: u8,

        content: String,

        /// Only you can see it
        #[arg(long)]
        private: bool,
    },

    /// Change your review of a book
    Edit {
        book_id: i64,

        #[arg(short, long)]
        rating: Option<u8>,

        #[arg(short, long)]
        content: Option<String>,

        #[arg(long, conflicts_with = "private")]
        public: bool,

        #[arg(long)]
        private: bool,
    },

    /// Delete your review of a book
    #[command(alias = "rm")]
    Delete { book_id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum CommentAction {
    /// Comments on a review
    #[command(alias = "ls")]
    List { review_id: i64 },

    /// Comment on a review
    Add { review_id: i64, content: String },

    /// Change one of your comments
    Edit {
        review_id: i64,
        comment_id: i64,
        content: String,
    },

    /// Delete one of your comments
    #[command(alias = "rm")]
    Delete { review_id: i64, comment_id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum AdminAction {
    /// Catalog overview
    Dashboard,

    /// Add a book to the catalog
    AddBook {
        title: String,

        #[arg(long)]
        pages: u32,

        #[command(flatten)]
        details: BookDetails,
    },

    /// Change a book
    EditBook {
        id: i64,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        pages: Option<u32>,

        #[command(flatten)]
        details: BookDetails,
    },

    /// Delete a book
    DeleteBook { id: i64 },

    /// Add a genre
    AddGenre {
        name: String,

        #[arg(short, long)]
        description: Option<String>,
    },

    /// Change a genre
    EditGenre {
        id: i64,
        name: String,

        #[arg(short, long)]
        description: Option<String>,
    },

    /// Delete a genre
    DeleteGenre { id: i64 },
}

#[derive(clap::Args, Debug, Default)]
pub struct BookDetails {
    #[arg(long)]
    pub isbn: Option<String>,

    #[arg(long)]
    pub author: Option<i64>,

    #[arg(long)]
    pub genre: Option<i64>,

    #[arg(long)]
    pub year: Option<i32>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub cover: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print every setting
    Show,

    /// Print one setting
    Get { key: String },

    /// Print where the config, session and cache live
    Path,

    /// Print a commented sample shelfie.toml
    Template,
}
