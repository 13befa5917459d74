//! Explicit session object handed to list operations
//!
//! Operations never read browser storage directly; they ask a [`Session`]
//! for the bearer token and tell it when the server rejected that token.

use super::storage;

pub trait Session {
    /// Bearer token, `None` when the user is not logged in
    fn access_token(&self) -> Option<String>;

    /// Forget the stored credential (expired or rejected token)
    fn clear(&self);
}

/// Session backed by sessionStorage / localStorage
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserSession;

impl Session for BrowserSession {
    fn access_token(&self) -> Option<String> {
        storage::get_access_token()
    }

    fn clear(&self) {
        log::info!("clearing stored credential");
        storage::clear_tokens();
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::Session;
    use std::cell::{Cell, RefCell};

    /// In-memory session for tests
    #[derive(Debug, Default)]
    pub struct FakeSession {
        token: RefCell<Option<String>>,
        pub cleared: Cell<usize>,
    }

    impl FakeSession {
        pub fn logged_in() -> Self {
            Self {
                token: RefCell::new(Some("test-token".to_string())),
                cleared: Cell::new(0),
            }
        }

        pub fn anonymous() -> Self {
            Self::default()
        }
    }

    impl Session for FakeSession {
        fn access_token(&self) -> Option<String> {
            self.token.borrow().clone()
        }

        fn clear(&self) {
            self.token.borrow_mut().take();
            self.cleared.set(self.cleared.get() + 1);
        }
    }
}
