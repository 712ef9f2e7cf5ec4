use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

/// Reader for the pre-migration local snapshots: one JSON file per
/// namespaced key. Read once at session start, deleted after migration.
#[derive(Debug, Clone)]
pub struct LegacyStore {
    dir: PathBuf,
}

impl LegacyStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Returns the stored value, or `None` when the key is absent or the
    /// file does not parse. Corrupt snapshots are treated as absent.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = fs::read_to_string(self.path(key)).ok()?;
        serde_json::from_str(&raw).ok()
    }

    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    pub fn remove(&self, key: &str) {
        let _ = fs::remove_file(self.path(key));
    }

    pub fn contains(&self, key: &str) -> bool {
        self.path(key).exists()
    }
}

pub fn notifications_key(user_id: mongodb::bson::oid::ObjectId) -> String {
    format!("notifications.{}", user_id.to_hex())
}

pub fn settings_key(user_id: mongodb::bson::oid::ObjectId) -> String {
    format!("settings.{}", user_id.to_hex())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Snapshot {
        coin: String,
        price: f64,
    }

    #[test]
    fn get_reads_and_remove_deletes() {
        let dir = tempfile::tempdir().unwrap();
        let store = LegacyStore::new(dir.path());

        fs::write(
            dir.path().join("snap.json"),
            r#"{ "coin": "BTC", "price": 42.5 }"#,
        )
        .unwrap();

        let snap: Snapshot = store.get("snap").unwrap();
        assert_eq!(snap, Snapshot { coin: "BTC".into(), price: 42.5 });
        assert!(store.contains("snap"));

        store.remove("snap");
        assert!(!store.contains("snap"));
        assert!(store.get::<Snapshot>("snap").is_none());
    }

    #[test]
    fn missing_or_corrupt_keys_fall_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = LegacyStore::new(dir.path());

        fs::write(dir.path().join("bad.json"), "not json").unwrap();

        assert!(store.get::<Snapshot>("bad").is_none());
        assert_eq!(store.get_or::<Vec<i64>>("absent", vec![]), Vec::<i64>::new());
    }

    #[test]
    fn keys_are_namespaced_per_user() {
        let id = mongodb::bson::oid::ObjectId::new();
        assert_eq!(notifications_key(id), format!("notifications.{}", id.to_hex()));
        assert_eq!(settings_key(id), format!("settings.{}", id.to_hex()));
    }
}
