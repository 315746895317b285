use super::{ApiRequest, ApiResponse, Method, Transport};
use crate::error::{Result, ShelfieError};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

#[derive(Clone)]
enum Scripted {
    Respond(ApiResponse),
    Unreachable,
}

/// Scripted transport for testing.
///
/// Uses `RefCell` for interior mutability since the client is single-threaded.
/// Each `(method, path)` route holds a queue of replies; the last reply of a
/// queue is sticky so a route scripted once answers every time. Unscripted
/// routes answer 404 with an empty body.
#[derive(Default)]
pub struct MemTransport {
    routes: RefCell<HashMap<(Method, String), VecDeque<Scripted>>>,
    log: RefCell<Vec<ApiRequest>>,
}

impl MemTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON reply for a route.
    pub fn on(&self, method: Method, path: &str, status: u16, body: Value) -> &Self {
        self.push(method, path, Scripted::Respond(ApiResponse::json(status, &body)))
    }

    /// Queue a raw-text reply (useful for empty bodies).
    pub fn on_text(&self, method: Method, path: &str, status: u16, body: &str) -> &Self {
        self.push(method, path, Scripted::Respond(ApiResponse::new(status, body)))
    }

    /// Queue a reply that never arrives.
    pub fn on_unreachable(&self, method: Method, path: &str) -> &Self {
        self.push(method, path, Scripted::Unreachable)
    }

    fn push(&self, method: Method, path: &str, reply: Scripted) -> &Self {
        self.routes
            .borrow_mut()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
        self
    }

    /// Every request sent so far, in order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.log.borrow().clone()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        self.log.borrow().last().cloned()
    }

    /// Number of requests sent for a route.
    pub fn hits(&self, method: Method, path: &str) -> usize {
        self.log
            .borrow()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    /// Number of non-GET requests sent.
    pub fn writes(&self) -> usize {
        self.log.borrow().iter().filter(|r| r.method.is_write()).count()
    }

    pub fn total(&self) -> usize {
        self.log.borrow().len()
    }
}

impl Transport for MemTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        self.log.borrow_mut().push(request.clone());

        let mut routes = self.routes.borrow_mut();
        let reply = match routes.get_mut(&(request.method, request.path.clone())) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };

        match reply {
            Some(Scripted::Respond(response)) => Ok(response),
            Some(Scripted::Unreachable) => Err(ShelfieError::Network(format!(
                "{} {}: connection refused",
                request.method, request.path
            ))),
            None => Ok(ApiResponse::new(404, "")),
        }
    }
}
