use std::path::{Path, PathBuf};

use tokio::{fs, sync::Mutex};

use crate::{
    error::{Result, WeatherError},
    model::City,
};

/// File-backed list of searched cities.
///
/// Every mutation reads the whole list, changes it and writes it back. The
/// internal lock keeps those cycles from interleaving within one process, so
/// construct one store and share it rather than opening the file twice.
#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl HistoryStore {
    /// Use `path` as-is; a missing file is reported by the first operation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    /// Like [`HistoryStore::new`], but seeds an empty history on first run.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self::new(path);

        let exists = fs::try_exists(&store.path).await.map_err(|e| {
            tracing::error!(path = %store.path.display(), error = %e, "cannot check search history");
            WeatherError::StoreUnavailable(format!("{}: {e}", store.path.display()))
        })?;
        if exists {
            return Ok(store);
        }

        if let Some(parent) = store.path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                WeatherError::StorePersist(format!("{}: {e}", parent.display()))
            })?;
        }
        store.write(&[]).await?;
        tracing::info!(path = %store.path.display(), "created empty search history");

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn list(&self) -> Result<Vec<City>> {
        let _guard = self.lock.lock().await;
        self.read().await
    }

    /// Append `name` under the next free id and return the stored entry.
    pub async fn add(&self, name: &str) -> Result<City> {
        let _guard = self.lock.lock().await;
        let mut cities = self.read().await?;

        let city = City::new(next_id(&cities)?, name);
        cities.push(city.clone());
        self.write(&cities).await?;

        tracing::info!(id = %city.id, name, "recorded city in history");
        Ok(city)
    }

    /// Drop every entry with `id`. Removing an unknown id is not an error.
    pub async fn remove(&self, id: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut cities = self.read().await?;

        let before = cities.len();
        cities.retain(|city| city.id != id);
        if cities.len() == before {
            tracing::debug!(id, "no history entry to remove");
        }

        self.write(&cities).await?;
        tracing::info!(id, removed = before - cities.len(), "removed city from history");
        Ok(())
    }

    async fn read(&self) -> Result<Vec<City>> {
        let data = fs::read_to_string(&self.path).await.map_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "error reading search history");
            WeatherError::StoreUnavailable(format!("{}: {e}", self.path.display()))
        })?;

        serde_json::from_str(&data).map_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "search history is corrupt");
            WeatherError::StoreUnavailable(format!("{}: {e}", self.path.display()))
        })
    }

    /// Replace the file through a sibling temp file and a rename, so readers
    /// see either the old list or the new one.
    async fn write(&self, cities: &[City]) -> Result<()> {
        let persist_err = |e: &dyn std::fmt::Display| {
            tracing::error!(path = %self.path.display(), error = %e, "error writing search history");
            WeatherError::StorePersist(format!("{}: {e}", self.path.display()))
        };

        let json = serde_json::to_string_pretty(cities).map_err(|e| persist_err(&e))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).await.map_err(|e| persist_err(&e))?;

        if let Err(e) = fs::rename(&tmp, &self.path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(persist_err(&e));
        }

        Ok(())
    }
}

/// One past the highest numeric id present, so a new id never matches a live entry.
fn next_id(cities: &[City]) -> Result<String> {
    let max = cities.iter().filter_map(|c| c.id.parse::<u64>().ok()).max().unwrap_or(0);
    max.checked_add(1)
        .map(|id| id.to_string())
        .ok_or_else(|| WeatherError::StorePersist(format!("no id left after {max}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    async fn fresh_store() -> (TempDir, HistoryStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = HistoryStore::open(dir.path().join("db").join("db.json"))
            .await
            .expect("open store");
        (dir, store)
    }

    #[tokio::test]
    async fn open_seeds_an_empty_list() {
        let (_dir, store) = fresh_store().await;
        assert!(store.list().await.unwrap().is_empty());
        assert_eq!(std::fs::read_to_string(store.path()).unwrap().trim(), "[]");
    }

    #[tokio::test]
    async fn open_keeps_existing_history() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        std::fs::write(&path, r#"[{"id":"7","name":"Oslo"}]"#).unwrap();

        let store = HistoryStore::open(&path).await.unwrap();
        assert_eq!(store.list().await.unwrap(), vec![City::new("7", "Oslo")]);
    }

    #[tokio::test]
    async fn add_then_remove_scenario() {
        let (_dir, store) = fresh_store().await;

        assert_eq!(store.add("Paris").await.unwrap(), City::new("1", "Paris"));
        assert_eq!(store.add("Tokyo").await.unwrap(), City::new("2", "Tokyo"));
        assert_eq!(
            store.list().await.unwrap(),
            vec![City::new("1", "Paris"), City::new("2", "Tokyo")]
        );

        store.remove("1").await.unwrap();
        assert_eq!(store.list().await.unwrap(), vec![City::new("2", "Tokyo")]);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_out_of_order_removal() {
        let (_dir, store) = fresh_store().await;
        store.add("Paris").await.unwrap();
        store.add("Tokyo").await.unwrap();
        store.remove("1").await.unwrap();

        let lima = store.add("Lima").await.unwrap();
        assert_eq!(lima.id, "3");

        let ids: Vec<String> = store.list().await.unwrap().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["2", "3"]);
    }

    #[tokio::test]
    async fn removing_unknown_id_is_a_no_op() {
        let (_dir, store) = fresh_store().await;
        store.add("Boston").await.unwrap();

        store.remove("42").await.unwrap();
        assert_eq!(store.list().await.unwrap(), vec![City::new("1", "Boston")]);
    }

    #[tokio::test]
    async fn missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("nope.json"));

        assert!(matches!(store.list().await, Err(WeatherError::StoreUnavailable(_))));
        assert!(matches!(store.add("Boston").await, Err(WeatherError::StoreUnavailable(_))));
        assert!(matches!(store.remove("1").await, Err(WeatherError::StoreUnavailable(_))));
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn corrupt_file_is_unavailable_and_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        std::fs::write(&path, "{ not json").unwrap();
        let store = HistoryStore::new(&path);

        assert!(matches!(store.add("Boston").await, Err(WeatherError::StoreUnavailable(_))));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[tokio::test]
    async fn concurrent_adds_get_distinct_ids() {
        let (_dir, store) = fresh_store().await;
        let store = Arc::new(store);

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.add(&format!("City {i}")).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let mut ids: Vec<u64> =
            store.list().await.unwrap().iter().map(|c| c.id.parse().unwrap()).collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn next_id_ignores_non_numeric_ids() {
        let cities = vec![City::new("abc", "X"), City::new("4", "Y")];
        assert_eq!(next_id(&cities).unwrap(), "5");
        assert_eq!(next_id(&[]).unwrap(), "1");
    }

    #[tokio::test]
    async fn exhausted_ids_fail_without_touching_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        let original = r#"[{"id":"18446744073709551615","name":"Oslo"}]"#;
        std::fs::write(&path, original).unwrap();
        let store = HistoryStore::open(&path).await.unwrap();

        let err = store.add("Paris").await.unwrap_err();

        assert!(matches!(err, WeatherError::StorePersist(_)));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[tokio::test]
    async fn failed_write_keeps_previous_history() {
        let (_dir, store) = fresh_store().await;
        store.add("Boston").await.unwrap();

        // A directory where the temp file should go makes the write fail.
        std::fs::create_dir(store.path().with_extension("json.tmp")).unwrap();

        let err = store.add("Paris").await.unwrap_err();
        assert!(matches!(err, WeatherError::StorePersist(_)));
        assert_eq!(store.list().await.unwrap(), vec![City::new("1", "Boston")]);

        let err = store.remove("1").await.unwrap_err();
        assert!(matches!(err, WeatherError::StorePersist(_)));
        assert_eq!(store.list().await.unwrap(), vec![City::new("1", "Boston")]);
    }

    #[tokio::test]
    async fn unreadable_parent_is_unavailable_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let err = HistoryStore::open(blocker.join("db.json")).await.unwrap_err();

        assert!(matches!(err, WeatherError::StoreUnavailable(_)));
        assert_eq!(std::fs::read_to_string(&blocker).unwrap(), "not a directory");
    }
}
