use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result, anyhow, bail};
use serde_json::{Map, Value, json};

use crate::browse::CollectionState;

/// Snapshot returned by `server_status`, rendered in the header.
#[derive(Clone, Debug, PartialEq)]
pub struct ServerStatus {
    pub ok: bool,
    pub version: String,
    pub uptime_secs: u64,
    pub current_conns: u32,
    pub available_conns: u32,
}

/// One database and its collections, as listed in the tree panel.
#[derive(Clone, Debug, PartialEq)]
pub struct DbWithCollections {
    pub db: String,
    pub collections: Vec<String>,
}

/// Storage-engine boundary. Every call is a fallible remote call; nothing
/// here is assumed instantaneous or ordered across calls.
pub trait Dao: Send + Sync {
    fn list_databases(&self) -> Result<Vec<DbWithCollections>>;

    /// Lists one page of documents plus the total count matching the filter.
    fn list_documents(&self, state: &CollectionState) -> Result<(Vec<Value>, u64)>;

    fn get_document(&self, db: &str, coll: &str, id: &Value) -> Result<Value>;

    /// Inserts a document (without `_id`) and returns its new id.
    fn insert_document(&self, db: &str, coll: &str, document: Value) -> Result<Value>;

    /// Replaces the document's fields; `document` must not carry `_id`.
    fn update_document(&self, db: &str, coll: &str, id: &Value, document: Value) -> Result<()>;

    fn delete_document(&self, db: &str, coll: &str, id: &Value) -> Result<()>;

    fn add_collection(&self, db: &str, coll: &str) -> Result<()>;

    fn delete_collection(&self, db: &str, coll: &str) -> Result<()>;

    fn ping(&self) -> Result<()>;

    fn server_status(&self) -> Result<ServerStatus>;
}

/// In-memory Dao backing tests and the demo binary. The production driver is
/// a collaborator wired behind the same trait.
pub struct MemoryDao {
    databases: Mutex<BTreeMap<String, BTreeMap<String, Vec<Value>>>>,
    next_id: AtomicU64,
    healthy: Mutex<bool>,
}

impl Default for MemoryDao {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDao {
    pub fn new() -> Self {
        Self {
            databases: Mutex::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
            healthy: Mutex::new(true),
        }
    }

    /// Loads a `{db: {coll: [documents]}}` fixture. Documents without an
    /// `_id` get one assigned.
    pub fn from_seed(seed: &Value) -> Result<Self> {
        let dao = Self::new();
        let root = seed
            .as_object()
            .ok_or_else(|| anyhow!("seed fixture must be a JSON object"))?;

        for (db, collections) in root {
            let collections = collections
                .as_object()
                .with_context(|| format!("seed database {db} must be an object"))?;
            for (coll, documents) in collections {
                dao.add_collection(db, coll)?;
                let documents = documents
                    .as_array()
                    .with_context(|| format!("seed collection {db}.{coll} must be an array"))?;
                for document in documents {
                    let mut document = document.clone();
                    if document.get("_id").is_none() {
                        dao.insert_document(db, coll, document)?;
                    } else {
                        let id = document
                            .as_object_mut()
                            .and_then(|map| map.remove("_id"))
                            .unwrap_or(Value::Null);
                        dao.insert_with_id(db, coll, id, document)?;
                    }
                }
            }
        }

        Ok(dao)
    }

    /// Flips health-check behavior; tests use this to simulate a degraded
    /// backend.
    pub fn set_healthy(&self, healthy: bool) {
        *self.healthy.lock().expect("dao poisoned") = healthy;
    }

    fn fresh_id(&self) -> Value {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed);
        Value::String(format!("{n:024x}"))
    }

    fn insert_with_id(&self, db: &str, coll: &str, id: Value, document: Value) -> Result<Value> {
        let mut map = match document {
            Value::Object(map) => map,
            other => bail!("document must be a JSON object, got {other}"),
        };
        let mut full = Map::new();
        full.insert("_id".to_string(), id.clone());
        full.append(&mut map);

        let mut databases = self.databases.lock().expect("dao poisoned");
        databases
            .entry(db.to_string())
            .or_default()
            .entry(coll.to_string())
            .or_default()
            .push(Value::Object(full));
        Ok(id)
    }

    fn matches_filter(document: &Value, filter: &Value) -> bool {
        let Some(conditions) = filter.as_object() else {
            return true;
        };
        conditions
            .iter()
            .all(|(key, expected)| lookup_path(document, key) == Some(expected))
    }

    fn compare_by_sort(a: &Value, b: &Value, sort: &Value) -> std::cmp::Ordering {
        use std::cmp::Ordering as O;
        let Some(sort) = sort.as_object() else {
            return O::Equal;
        };
        for (key, direction) in sort {
            let left = lookup_path(a, key);
            let right = lookup_path(b, key);
            let ordering = compare_values(left, right);
            let ordering = if direction.as_i64() == Some(-1) {
                ordering.reverse()
            } else {
                ordering
            };
            if ordering != O::Equal {
                return ordering;
            }
        }
        O::Equal
    }
}

fn lookup_path<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = document;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    Some(current)
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> std::cmp::Ordering {
    use std::cmp::Ordering as O;
    match (a, b) {
        (None, None) => O::Equal,
        (None, Some(_)) => O::Less,
        (Some(_), None) => O::Greater,
        (Some(a), Some(b)) => match (a, b) {
            (Value::Number(x), Value::Number(y)) => x
                .as_f64()
                .partial_cmp(&y.as_f64())
                .unwrap_or(O::Equal),
            (Value::String(x), Value::String(y)) => x.cmp(y),
            (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
            _ => O::Equal,
        },
    }
}

impl Dao for MemoryDao {
    fn list_databases(&self) -> Result<Vec<DbWithCollections>> {
        let databases = self.databases.lock().expect("dao poisoned");
        Ok(databases
            .iter()
            .map(|(db, collections)| DbWithCollections {
                db: db.clone(),
                collections: collections.keys().cloned().collect(),
            })
            .collect())
    }

    fn list_documents(&self, state: &CollectionState) -> Result<(Vec<Value>, u64)> {
        let databases = self.databases.lock().expect("dao poisoned");
        let documents = databases
            .get(&state.db)
            .and_then(|collections| collections.get(&state.coll))
            .ok_or_else(|| anyhow!("unknown collection {}.{}", state.db, state.coll))?;

        let mut matched: Vec<&Value> = documents
            .iter()
            .filter(|document| Self::matches_filter(document, &state.filter))
            .collect();
        matched.sort_by(|a, b| Self::compare_by_sort(a, b, &state.sort));

        let count = matched.len() as u64;
        let page = matched
            .into_iter()
            .skip(state.page as usize)
            .take(state.limit as usize)
            .cloned()
            .collect();
        Ok((page, count))
    }

    fn get_document(&self, db: &str, coll: &str, id: &Value) -> Result<Value> {
        let databases = self.databases.lock().expect("dao poisoned");
        databases
            .get(db)
            .and_then(|collections| collections.get(coll))
            .and_then(|documents| {
                documents
                    .iter()
                    .find(|document| document.get("_id") == Some(id))
            })
            .cloned()
            .ok_or_else(|| anyhow!("document {id} not found in {db}.{coll}"))
    }

    fn insert_document(&self, db: &str, coll: &str, document: Value) -> Result<Value> {
        if document.get("_id").is_some() {
            bail!("insert payload must not carry _id");
        }
        let id = self.fresh_id();
        self.insert_with_id(db, coll, id, document)
    }

    fn update_document(&self, db: &str, coll: &str, id: &Value, document: Value) -> Result<()> {
        if document.get("_id").is_some() {
            bail!("update payload must not carry _id");
        }
        let mut map = match document {
            Value::Object(map) => map,
            other => bail!("document must be a JSON object, got {other}"),
        };
        let mut full = Map::new();
        full.insert("_id".to_string(), id.clone());
        full.append(&mut map);

        let mut databases = self.databases.lock().expect("dao poisoned");
        let documents = databases
            .get_mut(db)
            .and_then(|collections| collections.get_mut(coll))
            .ok_or_else(|| anyhow!("unknown collection {db}.{coll}"))?;
        let slot = documents
            .iter_mut()
            .find(|document| document.get("_id") == Some(id))
            .ok_or_else(|| anyhow!("document {id} not found in {db}.{coll}"))?;
        *slot = Value::Object(full);
        Ok(())
    }

    fn delete_document(&self, db: &str, coll: &str, id: &Value) -> Result<()> {
        let mut databases = self.databases.lock().expect("dao poisoned");
        let documents = databases
            .get_mut(db)
            .and_then(|collections| collections.get_mut(coll))
            .ok_or_else(|| anyhow!("unknown collection {db}.{coll}"))?;
        let before = documents.len();
        documents.retain(|document| document.get("_id") != Some(id));
        if documents.len() == before {
            bail!("document {id} not found in {db}.{coll}");
        }
        Ok(())
    }

    fn add_collection(&self, db: &str, coll: &str) -> Result<()> {
        let mut databases = self.databases.lock().expect("dao poisoned");
        databases
            .entry(db.to_string())
            .or_default()
            .entry(coll.to_string())
            .or_default();
        Ok(())
    }

    fn delete_collection(&self, db: &str, coll: &str) -> Result<()> {
        let mut databases = self.databases.lock().expect("dao poisoned");
        let collections = databases
            .get_mut(db)
            .ok_or_else(|| anyhow!("unknown database {db}"))?;
        collections
            .remove(coll)
            .ok_or_else(|| anyhow!("unknown collection {db}.{coll}"))?;
        Ok(())
    }

    fn ping(&self) -> Result<()> {
        if *self.healthy.lock().expect("dao poisoned") {
            Ok(())
        } else {
            bail!("server unreachable")
        }
    }

    fn server_status(&self) -> Result<ServerStatus> {
        self.ping()?;
        Ok(ServerStatus {
            ok: true,
            version: "in-memory".to_string(),
            uptime_secs: 0,
            current_conns: 1,
            available_conns: 1,
        })
    }
}

/// Sample data for running the demo binary without a seed fixture.
pub fn sample_seed() -> Value {
    json!({
        "shop": {
            "products": [
                { "name": "keyboard", "price": 49, "stock": { "warehouse": 12, "store": 3 } },
                { "name": "mouse", "price": 19, "stock": { "warehouse": 40, "store": 7 } },
                { "name": "monitor", "price": 199, "tags": ["27in", "ips"] }
            ],
            "orders": [
                { "product": "mouse", "quantity": 2, "shipped": true },
                { "product": "monitor", "quantity": 1, "shipped": false }
            ]
        },
        "admin": {
            "users": [
                { "login": "ada", "role": "owner" },
                { "login": "grace", "role": "viewer" }
            ]
        }
    })
}
