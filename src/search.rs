//! Keyword search over the user's chat history

use crate::api::Backend;
use crate::error::Result;
use crate::state::RequestGeneration;
use crate::types::{SearchHit, UserId};
use leptos::prelude::*;

/// State behind the search modal.
///
/// Every keystroke issues a search; responses that arrive after a newer
/// keystroke are dropped.
#[derive(Clone, Copy)]
pub struct ChatSearch {
    query: RwSignal<String>,
    results: RwSignal<Vec<SearchHit>>,
    generation: RequestGeneration,
}

impl ChatSearch {
    pub fn new() -> Self {
        Self {
            query: RwSignal::new(String::new()),
            results: RwSignal::new(vec![]),
            generation: RequestGeneration::new(),
        }
    }

    pub fn query(&self) -> String {
        self.query.get()
    }

    pub fn results(&self) -> Vec<SearchHit> {
        self.results.get()
    }

    pub fn results_untracked(&self) -> Vec<SearchHit> {
        self.results.get_untracked()
    }

    /// Run the search for a new query. A blank query clears results
    /// without calling the backend; `status: false` keeps the old results.
    pub async fn search(&self, backend: &dyn Backend, user_id: UserId, keyword: String) -> Result<()> {
        self.query.set(keyword.clone());
        let generation = self.generation.begin();

        if keyword.trim().is_empty() {
            self.results.set(vec![]);
            return Ok(());
        }

        let resp = backend.search_chats(user_id, &keyword).await?;
        if !self.generation.is_current(generation) {
            tracing::debug!("Dropping stale search results for {:?}", keyword);
            return Ok(());
        }
        if resp.status {
            self.results.set(resp.results);
        }
        Ok(())
    }
}

impl Default for ChatSearch {
    fn default() -> Self {
        Self::new()
    }
}
