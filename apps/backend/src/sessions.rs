//! In-process registry of active study and test sessions.
//!
//! One session per (user, deck) pair. Starting a new session replaces any
//! existing one, so a stale test never blocks a fresh study run. The outer
//! map lock is held only to look up or swap entries; handlers await on the
//! per-session lock instead.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use quiz_core::{StudySession, TestSession};
use tokio::sync::Mutex as AsyncMutex;
use uuid::Uuid;

use crate::db::Database;

/// A session of either flavor owned by one user over one deck.
pub enum ActiveSession {
    Study(StudySession<Database>),
    Test(TestSession<Database>),
}

type SessionKey = (Uuid, Uuid);

/// Registry of live sessions keyed by (user, deck).
#[derive(Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<SessionKey, Arc<AsyncMutex<ActiveSession>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a session, replacing whatever was active for this pair.
    pub fn insert(&self, user_id: Uuid, deck_id: Uuid, session: ActiveSession) {
        let mut sessions = self.sessions.lock().unwrap();
        sessions.insert((user_id, deck_id), Arc::new(AsyncMutex::new(session)));
    }

    pub fn get(&self, user_id: Uuid, deck_id: Uuid) -> Option<Arc<AsyncMutex<ActiveSession>>> {
        let sessions = self.sessions.lock().unwrap();
        sessions.get(&(user_id, deck_id)).cloned()
    }

    /// Drop a session; no-op when none is active.
    pub fn remove(&self, user_id: Uuid, deck_id: Uuid) {
        let mut sessions = self.sessions.lock().unwrap();
        sessions.remove(&(user_id, deck_id));
    }

    /// Drop every session touching a deck, for deck deletion.
    pub fn remove_deck(&self, deck_id: Uuid) {
        let mut sessions = self.sessions.lock().unwrap();
        sessions.retain(|(_, d), _| *d != deck_id);
    }
}
