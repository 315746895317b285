//! # Session Storage
//!
//! The client keeps exactly two persisted values between runs, the same pair a
//! browser client keeps in local storage:
//!
//! - `token`: the bearer token attached to every request
//! - `user`: the serialized [`User`] returned at login (its role gates the
//!   admin surface)
//!
//! Storage is abstracted behind [`SessionStore`] so the client can be tested
//! without touching the filesystem:
//!
//! - [`FileSessionStore`]: `session.json` in the data directory
//! - [`MemSessionStore`]: a map in memory
//!
//! Readers never coordinate. Every access is synchronous and the process is
//! single-threaded, so no locking is needed.

use crate::error::{Result, ShelfieError};
use crate::model::{AuthResponse, User};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

const SESSION_FILENAME: &str = "session.json";

/// String key/value storage.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

impl<S: SessionStore + ?Sized> SessionStore for &S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// Session persisted as a flat JSON object.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            path: data_dir.as_ref().join(SESSION_FILENAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, values: &BTreeMap<String, String>) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        let content = serde_json::to_string_pretty(values)?;
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        // Owner-only: the file holds a bearer token.
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path)?;
        // `mode` only applies on create; tighten files left by older versions.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
        }
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.load() {
            Ok(values) => values.get(key).cloned(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "unreadable session file");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.load().unwrap_or_default();
        values.insert(key.to_string(), value.to_string());
        self.save(&values)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut values = self.load().unwrap_or_default();
        if values.remove(key).is_some() {
            self.save(&values)?;
        }
        Ok(())
    }
}

/// In-memory session for testing.
#[derive(Default)]
pub struct MemSessionStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A session already holding a token and user.
    pub fn logged_in(token: &str, user: &User) -> Self {
        let store = Self::new();
        // Writing to a map cannot fail.
        let _ = store_login(
            &store,
            &AuthResponse {
                token: token.to_string(),
                user: user.clone(),
            },
        );
        store
    }
}

impl SessionStore for MemSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}

// --- Helpers ---

pub fn token<S: SessionStore + ?Sized>(store: &S) -> Option<String> {
    store.get(TOKEN_KEY).filter(|t| !t.trim().is_empty())
}

/// The stored user, or `None` when missing or unparseable.
pub fn current_user<S: SessionStore + ?Sized>(store: &S) -> Option<User> {
    let raw = store.get(USER_KEY)?;
    serde_json::from_str(&raw).ok()
}

pub fn is_authenticated<S: SessionStore + ?Sized>(store: &S) -> bool {
    token(store).is_some()
}

pub fn is_admin<S: SessionStore + ?Sized>(store: &S) -> bool {
    is_authenticated(store) && current_user(store).is_some_and(|u| u.is_admin())
}

pub fn store_login<S: SessionStore + ?Sized>(store: &S, auth: &AuthResponse) -> Result<()> {
    if auth.token.trim().is_empty() {
        return Err(ShelfieError::Api("login response carried no token".into()));
    }
    store.set(TOKEN_KEY, &auth.token)?;
    store.set(USER_KEY, &serde_json::to_string(&auth.user)?)?;
    Ok(())
}

/// Drop both credentials.
pub fn clear<S: SessionStore + ?Sized>(store: &S) -> Result<()> {
    store.remove(TOKEN_KEY)?;
    store.remove(USER_KEY)?;
    Ok(())
}
