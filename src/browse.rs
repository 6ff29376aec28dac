use serde_json::{Map, Value, json};

/// Browse state for the content panel: current database/collection, the
/// pagination cursor and the active filter/sort documents.
///
/// Invariants: `page` is always a multiple of `limit`, and `page < count`
/// whenever `count > 0`. Owned exclusively by the UI thread.
#[derive(Clone, Debug, PartialEq)]
pub struct CollectionState {
    pub db: String,
    pub coll: String,
    pub page: u64,
    pub limit: u64,
    pub count: u64,
    pub filter: Value,
    pub sort: Value,
}

pub const DEFAULT_PAGE_LIMIT: u64 = 50;

impl CollectionState {
    pub fn new(db: &str, coll: &str) -> Self {
        Self {
            db: db.to_string(),
            coll: coll.to_string(),
            page: 0,
            limit: DEFAULT_PAGE_LIMIT,
            count: 0,
            filter: json!({}),
            sort: json!({}),
        }
    }

    /// Points the state at another collection, resetting the cursor but
    /// keeping filter/sort untouched until the user changes them.
    pub fn switch_collection(&mut self, db: &str, coll: &str) {
        self.db = db.to_string();
        self.coll = coll.to_string();
        self.page = 0;
        self.count = 0;
    }

    pub fn apply_filter(&mut self, filter: Value) {
        self.filter = filter;
        self.page = 0;
    }

    pub fn apply_sort(&mut self, sort: Value) {
        self.sort = sort;
    }

    /// Advances one page. No-op when the next page would start at or past
    /// `count`; returns whether a re-list is needed.
    pub fn next_page(&mut self) -> bool {
        if self.page + self.limit >= self.count {
            return false;
        }
        self.page += self.limit;
        true
    }

    /// Goes back one page. No-op on the first page.
    pub fn prev_page(&mut self) -> bool {
        if self.page == 0 {
            return false;
        }
        self.page = self.page.saturating_sub(self.limit);
        true
    }

    /// Records the total count reported by the latest list call. If the
    /// store shrank below the current cursor, the page is clamped back to
    /// the last valid page boundary; returns true when that happened and the
    /// page must be re-listed.
    pub fn reconcile_count(&mut self, count: u64) -> bool {
        self.count = count;
        if count == 0 {
            let moved = self.page != 0;
            self.page = 0;
            return moved;
        }
        if self.page >= count {
            let last = (count - 1) / self.limit.max(1);
            self.page = last * self.limit;
            return true;
        }
        false
    }
}

/// Walks the listed documents' key paths to build the autocomplete
/// vocabulary for the query/sort bars. Nested sub-documents are flattened
/// one level with dotted notation; array elements are never descended into.
pub fn infer_document_keys(documents: &[Value]) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();

    for document in documents {
        let Some(fields) = document.as_object() else {
            continue;
        };
        for (key, value) in fields {
            collect_key(&mut keys, key.clone());
            if let Value::Object(nested) = value {
                collect_nested(&mut keys, key, nested);
            }
        }
    }

    keys.sort();
    keys
}

fn collect_nested(keys: &mut Vec<String>, prefix: &str, nested: &Map<String, Value>) {
    for key in nested.keys() {
        collect_key(keys, format!("{prefix}.{key}"));
    }
}

fn collect_key(keys: &mut Vec<String>, key: String) {
    if !keys.contains(&key) {
        keys.push(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_page_stops_at_count() {
        let mut state = CollectionState::new("shop", "products");
        state.limit = 50;
        state.reconcile_count(120);

        assert!(state.next_page());
        assert_eq!(state.page, 50);
        assert!(state.next_page());
        assert_eq!(state.page, 100);
        // 100 + 50 >= 120: no further pages.
        assert!(!state.next_page());
        assert_eq!(state.page, 100);
    }

    #[test]
    fn test_prev_page_stops_at_zero() {
        let mut state = CollectionState::new("shop", "products");
        state.limit = 50;
        state.reconcile_count(120);
        state.next_page();

        assert!(state.prev_page());
        assert_eq!(state.page, 0);
        assert!(!state.prev_page());
        assert_eq!(state.page, 0);
    }

    #[test]
    fn test_pagination_never_escapes_bounds() {
        for (count, limit) in [(0u64, 10u64), (1, 10), (9, 10), (10, 10), (11, 10), (95, 10)] {
            let mut state = CollectionState::new("db", "coll");
            state.limit = limit;
            state.reconcile_count(count);

            for _ in 0..20 {
                state.next_page();
                if count > 0 {
                    assert!(state.page < count, "count={count} page={}", state.page);
                }
                assert_eq!(state.page % limit, 0);
            }
            for _ in 0..20 {
                state.prev_page();
                assert_eq!(state.page % limit, 0);
            }
            assert_eq!(state.page, 0);
        }
    }

    #[test]
    fn test_reconcile_clamps_page_after_shrink() {
        let mut state = CollectionState::new("shop", "products");
        state.limit = 50;
        state.reconcile_count(120);
        state.next_page();
        state.next_page();
        assert_eq!(state.page, 100);

        // Store shrank under the cursor: clamp to the last page boundary.
        assert!(state.reconcile_count(60));
        assert_eq!(state.page, 50);

        assert!(state.reconcile_count(0));
        assert_eq!(state.page, 0);
    }

    #[test]
    fn test_apply_filter_resets_cursor() {
        let mut state = CollectionState::new("shop", "products");
        state.limit = 10;
        state.reconcile_count(30);
        state.next_page();
        assert_eq!(state.page, 10);

        state.apply_filter(json!({ "name": "mouse" }));
        assert_eq!(state.page, 0);
        assert_eq!(state.filter, json!({ "name": "mouse" }));
    }

    #[test]
    fn test_infer_keys_flattens_one_level() {
        let documents = vec![
            json!({ "name": "keyboard", "stock": { "warehouse": 12, "store": 3 } }),
            json!({ "name": "monitor", "tags": ["27in", "ips"] }),
        ];

        let keys = infer_document_keys(&documents);
        assert_eq!(
            keys,
            vec!["name", "stock", "stock.store", "stock.warehouse", "tags"]
        );
    }

    #[test]
    fn test_infer_keys_is_idempotent() {
        let documents = vec![json!({ "a": 1, "b": { "c": 2 } })];
        let first = infer_document_keys(&documents);
        let second = infer_document_keys(&documents);
        assert_eq!(first, second);

        // Same document listed twice yields the same vocabulary.
        let doubled = vec![documents[0].clone(), documents[0].clone()];
        assert_eq!(infer_document_keys(&doubled), first);
    }

    #[test]
    fn test_infer_keys_skips_array_elements() {
        let documents = vec![json!({
            "items": [{ "sku": "x" }, { "sku": "y" }],
            "meta": { "tags": ["a"], "origin": { "country": "de", "city": { "name": "berlin" } } }
        })];

        let keys = infer_document_keys(&documents);
        assert!(keys.contains(&"items".to_string()));
        assert!(!keys.iter().any(|k| k.contains("sku")));
        assert!(keys.contains(&"meta.origin".to_string()));
        // Second level of nesting is beyond the flattening depth.
        assert!(!keys.iter().any(|k| k.contains("country")));
    }
}
