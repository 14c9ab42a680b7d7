use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use ulid::Ulid;

/// One stored record. Column sets differ per table and per row — legacy
/// rows routinely miss columns newer rows carry, which is exactly what the
/// reconciler downstream has to cope with.
pub type Row = serde_json::Map<String, Value>;

/// Failure at the storage/network boundary. Opaque message from the
/// backend; always distinct from a domain-rule violation.
#[derive(Debug, Clone)]
pub struct StoreError(pub String);

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "store error: {}", self.0)
    }
}

impl std::error::Error for StoreError {}

/// Conjunction of column equality clauses.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    clauses: Vec<(String, Value)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.clauses.push((column.to_string(), value.into()));
        self
    }

    pub fn matches(&self, row: &Row) -> bool {
        self.clauses
            .iter()
            .all(|(col, want)| row.get(col) == Some(want))
    }
}

/// Record-oriented CRUD over named tables — the engine's only boundary
/// with its storage collaborator. The hosted backend implements this over
/// the network; [`MemoryStore`] implements it in-process.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn select(&self, table: &str, filter: &Filter) -> Result<Vec<Row>, StoreError>;

    /// Insert a row, returning it as stored (the store may assign the
    /// primary key).
    async fn insert(&self, table: &str, row: Row) -> Result<Row, StoreError>;

    /// Delete matching rows, returning how many were removed.
    async fn delete(&self, table: &str, filter: &Filter) -> Result<u64, StoreError>;

    /// Merge `patch` into matching rows, returning how many were touched.
    async fn update(&self, table: &str, filter: &Filter, patch: Row) -> Result<u64, StoreError>;
}

// ── In-memory store ──────────────────────────────────────────────

/// In-process `RecordStore`. Tables spring into existence on first touch.
/// Assigns `id` on insert when the caller did not, like the backend does.
pub struct MemoryStore {
    tables: DashMap<String, Vec<Row>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: DashMap::new(),
        }
    }

    /// Load rows verbatim — no id assignment. Lets tests and the smoke
    /// binary plant legacy-shaped rows.
    pub fn seed(&self, table: &str, rows: impl IntoIterator<Item = Row>) {
        self.tables.entry(table.to_string()).or_default().extend(rows);
    }

    pub fn row_count(&self, table: &str) -> usize {
        self.tables.get(table).map(|t| t.len()).unwrap_or(0)
    }
}

fn has_id(row: &Row) -> bool {
    matches!(row.get("id"), Some(Value::String(s)) if !s.is_empty())
        || matches!(row.get("id"), Some(Value::Number(_)))
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn select(&self, table: &str, filter: &Filter) -> Result<Vec<Row>, StoreError> {
        Ok(self
            .tables
            .get(table)
            .map(|rows| rows.iter().filter(|r| filter.matches(r)).cloned().collect())
            .unwrap_or_default())
    }

    async fn insert(&self, table: &str, mut row: Row) -> Result<Row, StoreError> {
        if !has_id(&row) {
            row.insert("id".into(), Value::String(Ulid::new().to_string()));
        }
        self.tables
            .entry(table.to_string())
            .or_default()
            .push(row.clone());
        Ok(row)
    }

    async fn delete(&self, table: &str, filter: &Filter) -> Result<u64, StoreError> {
        let Some(mut rows) = self.tables.get_mut(table) else {
            return Ok(0);
        };
        let before = rows.len();
        rows.retain(|r| !filter.matches(r));
        Ok((before - rows.len()) as u64)
    }

    async fn update(&self, table: &str, filter: &Filter, patch: Row) -> Result<u64, StoreError> {
        let Some(mut rows) = self.tables.get_mut(table) else {
            return Ok(0);
        };
        let mut touched = 0;
        for row in rows.iter_mut() {
            if filter.matches(row) {
                for (col, value) in &patch {
                    row.insert(col.clone(), value.clone());
                }
                touched += 1;
            }
        }
        Ok(touched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(pairs: &[(&str, &str)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), json!(v)))
            .collect()
    }

    #[tokio::test]
    async fn insert_assigns_id_when_missing() {
        let store = MemoryStore::new();
        let stored = store.insert("t", row(&[("a", "1")])).await.unwrap();
        let id = stored.get("id").and_then(|v| v.as_str()).unwrap();
        assert!(!id.is_empty());
    }

    #[tokio::test]
    async fn insert_keeps_caller_id() {
        let store = MemoryStore::new();
        let stored = store.insert("t", row(&[("id", "r-1")])).await.unwrap();
        assert_eq!(stored.get("id"), Some(&json!("r-1")));
    }

    #[tokio::test]
    async fn select_filters_on_all_clauses() {
        let store = MemoryStore::new();
        store.seed(
            "t",
            [
                row(&[("a", "1"), ("b", "x")]),
                row(&[("a", "1"), ("b", "y")]),
                row(&[("a", "2"), ("b", "x")]),
            ],
        );
        let hits = store
            .select("t", &Filter::new().eq("a", "1").eq("b", "x"))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn select_missing_table_is_empty() {
        let store = MemoryStore::new();
        let hits = store.select("nope", &Filter::new()).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn delete_reports_removed_count() {
        let store = MemoryStore::new();
        store.seed("t", [row(&[("a", "1")]), row(&[("a", "1")]), row(&[("a", "2")])]);
        let removed = store.delete("t", &Filter::new().eq("a", "1")).await.unwrap();
        assert_eq!(removed, 2);
        assert_eq!(store.row_count("t"), 1);
    }

    #[tokio::test]
    async fn delete_no_match_is_zero() {
        let store = MemoryStore::new();
        store.seed("t", [row(&[("a", "1")])]);
        let removed = store.delete("t", &Filter::new().eq("a", "9")).await.unwrap();
        assert_eq!(removed, 0);
    }

    #[tokio::test]
    async fn update_merges_patch() {
        let store = MemoryStore::new();
        store.seed("t", [row(&[("a", "1"), ("b", "x")])]);
        let touched = store
            .update("t", &Filter::new().eq("a", "1"), row(&[("b", "z")]))
            .await
            .unwrap();
        assert_eq!(touched, 1);
        let hits = store.select("t", &Filter::new().eq("b", "z")).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].get("a"), Some(&json!("1")));
    }
}
