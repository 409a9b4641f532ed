#![allow(dead_code)]

pub mod mocks;

use eduquest_ui::state::{MemoryTokenStore, SessionStore, TokenStore};
use leptos::prelude::Owner;
use std::rc::Rc;

/// Reactive owner for signals created by a test; keep it alive for the test's duration.
pub fn owner() -> Owner {
    let owner = Owner::new();
    owner.set();
    owner
}

/// Session store over an in-memory token store the test can inspect.
pub fn session_store() -> (SessionStore, Rc<MemoryTokenStore>) {
    let tokens = Rc::new(MemoryTokenStore::default());
    let store = SessionStore::new(tokens.clone() as Rc<dyn TokenStore>);
    (store, tokens)
}
