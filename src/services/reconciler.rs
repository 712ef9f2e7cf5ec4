use std::collections::HashMap;
use std::sync::Arc;

use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use crate::models::Notification;

/// The in-memory log keeps only the most recent entries; older ones live in
/// the store and come back through a full reload.
pub const MAX_NOTIFICATIONS: usize = 50;

/// Session-local ordered log of one user's notifications.
///
/// Entries are kept newest-first by `created_at`; among equal timestamps the
/// most recently appended entry comes first. The same underlying row can be
/// reported twice (the insert response and the push echo), so `append`
/// de-duplicates by id, which makes the two arrival orders commutative.
#[derive(Debug, Default)]
pub struct NotificationLog {
    entries: Vec<Notification>,
}

impl NotificationLog {
    /// Merges one notification into the log. Returns false if an entry with
    /// the same id is already present (no-op).
    pub fn append(&mut self, n: Notification) -> bool {
        if self.entries.iter().any(|e| e.id == n.id) {
            return false;
        }

        let pos = self
            .entries
            .iter()
            .position(|e| e.created_at <= n.created_at)
            .unwrap_or(self.entries.len());

        self.entries.insert(pos, n);
        self.entries.truncate(MAX_NOTIFICATIONS);
        true
    }

    /// Wholesale replacement on session start: the store's most recent rows,
    /// already ordered newest-first.
    pub fn replace(&mut self, mut entries: Vec<Notification>) {
        entries.truncate(MAX_NOTIFICATIONS);
        self.entries = entries;
    }

    pub fn mark_read(&mut self, id: ObjectId) -> bool {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(e) => {
                e.read = true;
                true
            }
            None => false,
        }
    }

    pub fn mark_all_read(&mut self) {
        for e in &mut self.entries {
            e.read = true;
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Derived on demand, never cached.
    pub fn unread_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.read).count()
    }

    pub fn entries(&self) -> &[Notification] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One log per active user session. All mutations funnel through this
/// handle, so the per-user log has a single logical owner.
#[derive(Clone, Default)]
pub struct NotificationCenter {
    logs: Arc<RwLock<HashMap<ObjectId, NotificationLog>>>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn append(&self, user_id: ObjectId, n: Notification) -> bool {
        let mut logs = self.logs.write().await;
        logs.entry(user_id).or_default().append(n)
    }

    pub async fn replace(&self, user_id: ObjectId, entries: Vec<Notification>) {
        let mut logs = self.logs.write().await;
        logs.entry(user_id).or_default().replace(entries);
    }

    pub async fn mark_read(&self, user_id: ObjectId, id: ObjectId) -> bool {
        let mut logs = self.logs.write().await;
        logs.get_mut(&user_id).map(|l| l.mark_read(id)).unwrap_or(false)
    }

    pub async fn mark_all_read(&self, user_id: ObjectId) {
        let mut logs = self.logs.write().await;
        if let Some(l) = logs.get_mut(&user_id) {
            l.mark_all_read();
        }
    }

    pub async fn clear(&self, user_id: ObjectId) {
        let mut logs = self.logs.write().await;
        if let Some(l) = logs.get_mut(&user_id) {
            l.clear();
        }
    }

    /// Drops the session log entirely (logout / dead session).
    pub async fn end_session(&self, user_id: ObjectId) {
        let mut logs = self.logs.write().await;
        logs.remove(&user_id);
    }

    pub async fn snapshot(&self, user_id: ObjectId) -> Vec<Notification> {
        let logs = self.logs.read().await;
        logs.get(&user_id)
            .map(|l| l.entries().to_vec())
            .unwrap_or_default()
    }

    pub async fn unread_count(&self, user_id: ObjectId) -> usize {
        let logs = self.logs.read().await;
        logs.get(&user_id).map(|l| l.unread_count()).unwrap_or(0)
    }

    pub async fn has_log(&self, user_id: ObjectId) -> bool {
        let logs = self.logs.read().await;
        logs.get(&user_id).map(|l| !l.is_empty()).unwrap_or(false)
    }
}
