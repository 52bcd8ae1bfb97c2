// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::TokenService;
use crate::forum::ForumService;
use crate::storage::ForumDatabase;

#[derive(Clone)]
pub struct AppState {
    pub forum: ForumService,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(db: ForumDatabase, tokens: TokenService) -> Self {
        Self {
            forum: ForumService::new(Arc::new(db)),
            tokens: Arc::new(tokens),
        }
    }
}

/// State over a throwaway database, for tests.
#[cfg(test)]
pub(crate) fn test_state() -> (AppState, tempfile::TempDir) {
    use crate::auth::TokenConfig;

    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let db = ForumDatabase::open_in(temp_dir.path()).expect("Failed to open database");
    let tokens = TokenService::new(&TokenConfig::new(
        "test-secret",
        std::time::Duration::from_secs(3600),
    ))
    .expect("Failed to build token service");
    (AppState::new(db, tokens), temp_dir)
}
