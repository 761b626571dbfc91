use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, Duration, Utc};
use tracing::info;
use uuid::Uuid;

use crate::page::notices::NoticeBoard;
use crate::page::Page;

/// One open page: its coordinator state and its pending notices.
pub struct Session {
    pub page: Mutex<Page>,
    pub notices: NoticeBoard,
    last_seen: Mutex<DateTime<Utc>>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            page: Mutex::new(Page::default()),
            notices: NoticeBoard::default(),
            last_seen: Mutex::new(Utc::now()),
        }
    }

    pub fn last_seen(&self) -> DateTime<Utc> {
        *lock_or_recover(&self.last_seen)
    }

    fn touch(&self) {
        *lock_or_recover(&self.last_seen) = Utc::now();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_or_recover<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// In-memory session registry. Nothing survives a restart.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Arc<Session>>>,
}

impl SessionStore {
    pub fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.write().insert(id, Arc::new(Session::new()));
        info!("Session {id} created");
        id
    }

    /// Looks up a session and marks it as seen.
    pub fn get(&self, id: Uuid) -> Option<Arc<Session>> {
        let sessions = match self.sessions.read() {
            Ok(sessions) => sessions,
            Err(poisoned) => poisoned.into_inner(),
        };
        let session = sessions.get(&id).cloned()?;
        session.touch();
        Some(session)
    }

    pub fn open_count(&self) -> usize {
        match self.sessions.read() {
            Ok(sessions) => sessions.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// Drops every session not seen within `max_idle` of `now`. Returns how
    /// many were evicted.
    pub fn sweep_idle(&self, now: DateTime<Utc>, max_idle: Duration) -> usize {
        let mut sessions = self.write();
        let before = sessions.len();
        sessions.retain(|id, session| {
            let keep = now - session.last_seen() <= max_idle;
            if !keep {
                info!("Session {id} expired after {}s idle", max_idle.num_seconds());
            }
            keep
        });
        before - sessions.len()
    }

    /// Drops the store's handle. A comparison still running for this session
    /// holds its own `Arc` and resolves against the orphaned page.
    pub fn remove(&self, id: Uuid) -> bool {
        let removed = self.write().remove(&id).is_some();
        if removed {
            info!("Session {id} closed");
        }
        removed
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<Uuid, Arc<Session>>> {
        match self.sessions.write() {
            Ok(sessions) => sessions,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_get_remove() {
        let store = SessionStore::default();
        let id = store.create();
        assert!(store.get(id).is_some());
        assert!(store.remove(id));
        assert!(store.get(id).is_none());
        assert!(!store.remove(id));
    }

    #[test]
    fn test_idle_sessions_are_swept() {
        let store = SessionStore::default();
        let idle = store.create();
        let max_idle = Duration::minutes(30);

        assert_eq!(store.sweep_idle(Utc::now(), max_idle), 0);
        assert!(store.get(idle).is_some());

        let later = Utc::now() + Duration::hours(2);
        let active = store.create();
        store.get(active).unwrap().touch();
        assert_eq!(store.sweep_idle(later, max_idle), 2);
        assert!(store.get(idle).is_none());
        assert!(store.get(active).is_none());
        assert_eq!(store.open_count(), 0);
    }

    #[test]
    fn test_lookup_keeps_session_alive() {
        let store = SessionStore::default();
        let id = store.create();
        let created = store.get(id).unwrap().last_seen();

        std::thread::sleep(std::time::Duration::from_millis(5));
        let seen = store.get(id).unwrap().last_seen();
        assert!(seen > created);

        let max_idle = Duration::minutes(30);
        assert_eq!(store.sweep_idle(seen + Duration::minutes(29), max_idle), 0);
        assert_eq!(store.sweep_idle(seen + Duration::minutes(31), max_idle), 1);
    }

    #[test]
    fn test_sessions_do_not_share_pages() {
        let store = SessionStore::default();
        let a = store.get(store.create()).unwrap();
        let b = store.get(store.create()).unwrap();
        crate::page::lock_page(&a.page)
            .set_text_content(crate::documents::slot::SlotKind::Cv, "only in a");
        assert!(crate::page::lock_page(&b.page)
            .slot(crate::documents::slot::SlotKind::Cv)
            .is_empty());
    }
}
