//! 测试辅助模块
//!
//! 提供内存版 `Transport` mock 和便捷的测试数据工厂。

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use staffdesk_transport::{ListQuery, PaginatedResponse, RecordId, Result, TransportError};
use tokio::sync::RwLock;

use crate::traits::Transport;

// ===== MockTransport =====

/// In-memory backend keyed by endpoint, with call counters and injectable failures.
pub struct MockTransport {
    records: RwLock<HashMap<String, BTreeMap<RecordId, Value>>>,
    next_id: AtomicI64,
    list_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    created: RwLock<HashMap<String, usize>>,
    /// 如果 Some，list 返回此错误
    list_error: RwLock<Option<TransportError>>,
    /// create/update 在这些 endpoint 上返回对应错误
    save_errors: RwLock<HashMap<String, TransportError>>,
    /// delete 这些 id 时返回对应错误
    failing_deletes: RwLock<HashMap<RecordId, TransportError>>,
    save_delay: RwLock<Option<Duration>>,
    in_flight_deletes: AtomicUsize,
    delete_rounds: AtomicUsize,
    peak_in_flight_deletes: AtomicUsize,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1000),
            list_calls: AtomicUsize::new(0),
            delete_calls: AtomicUsize::new(0),
            created: RwLock::new(HashMap::new()),
            list_error: RwLock::new(None),
            save_errors: RwLock::new(HashMap::new()),
            failing_deletes: RwLock::new(HashMap::new()),
            save_delay: RwLock::new(None),
            in_flight_deletes: AtomicUsize::new(0),
            delete_rounds: AtomicUsize::new(0),
            peak_in_flight_deletes: AtomicUsize::new(0),
        }
    }

    /// Insert records; each must carry an integer `id`.
    pub async fn seed(&self, endpoint: &str, records: impl IntoIterator<Item = Value>) {
        let mut store = self.records.write().await;
        let table = store.entry(endpoint.to_string()).or_default();
        for record in records {
            let id = record["id"].as_i64().unwrap();
            table.insert(id, record);
        }
    }

    pub async fn set_list_error(&self, err: Option<TransportError>) {
        *self.list_error.write().await = err;
    }

    pub async fn fail_saves_on(&self, endpoint: &str, err: TransportError) {
        self.save_errors
            .write()
            .await
            .insert(endpoint.to_string(), err);
    }

    /// Deleting any of `ids` fails with HTTP 500.
    pub async fn fail_delete_of(&self, ids: impl IntoIterator<Item = RecordId>) {
        let server_error = TransportError::Http {
            status: 500,
            message: None,
        };
        self.failing_deletes
            .write()
            .await
            .extend(ids.into_iter().map(|id| (id, server_error.clone())));
    }

    pub async fn fail_delete_with(&self, id: RecordId, err: TransportError) {
        self.failing_deletes.write().await.insert(id, err);
    }

    pub async fn set_save_delay(&self, delay: Duration) {
        *self.save_delay.write().await = Some(delay);
    }

    pub async fn count(&self, endpoint: &str) -> usize {
        self.records
            .read()
            .await
            .get(endpoint)
            .map_or(0, BTreeMap::len)
    }

    pub async fn contains(&self, endpoint: &str, id: RecordId) -> bool {
        self.records
            .read()
            .await
            .get(endpoint)
            .is_some_and(|table| table.contains_key(&id))
    }

    pub async fn created_on(&self, endpoint: &str) -> usize {
        self.created
            .read()
            .await
            .get(endpoint)
            .copied()
            .unwrap_or(0)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    /// Number of times deletes went from zero to one in flight
    pub fn delete_rounds(&self) -> usize {
        self.delete_rounds.load(Ordering::SeqCst)
    }

    pub fn peak_in_flight_deletes(&self) -> usize {
        self.peak_in_flight_deletes.load(Ordering::SeqCst)
    }

    fn matches(record: &Value, query: &ListQuery) -> bool {
        query.filters.iter().all(|(key, expected)| match &record[key] {
            Value::String(s) => s == expected,
            Value::Null => false,
            other => other.to_string() == *expected,
        })
    }

    async fn save_error(&self, endpoint: &str) -> Option<TransportError> {
        self.save_errors.read().await.get(endpoint).cloned()
    }

    async fn save_pause(&self) {
        let delay = *self.save_delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn list(&self, endpoint: &str, query: &ListQuery) -> Result<PaginatedResponse<Value>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.list_error.read().await.clone() {
            return Err(err);
        }

        let store = self.records.read().await;
        let matching: Vec<&Value> = store
            .get(endpoint)
            .map(|table| table.values().filter(|r| Self::matches(r, query)).collect())
            .unwrap_or_default();
        let items = matching
            .iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .map(|r| (*r).clone())
            .collect();
        Ok(PaginatedResponse::new(items, matching.len() as u32))
    }

    async fn create(&self, endpoint: &str, body: Value) -> Result<Value> {
        self.save_pause().await;
        if let Some(err) = self.save_error(endpoint).await {
            return Err(err);
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut record = body;
        if let Value::Object(map) = &mut record {
            map.insert("id".to_string(), json!(id));
        }
        self.records
            .write()
            .await
            .entry(endpoint.to_string())
            .or_default()
            .insert(id, record.clone());
        *self
            .created
            .write()
            .await
            .entry(endpoint.to_string())
            .or_default() += 1;
        Ok(record)
    }

    async fn update(&self, endpoint: &str, id: RecordId, body: Value) -> Result<Value> {
        self.save_pause().await;
        if let Some(err) = self.save_error(endpoint).await {
            return Err(err);
        }
        let mut store = self.records.write().await;
        let Some(existing) = store.get_mut(endpoint).and_then(|t| t.get_mut(&id)) else {
            return Err(TransportError::Http {
                status: 404,
                message: Some("Not found".to_string()),
            });
        };
        if let (Value::Object(target), Value::Object(patch)) = (existing, body) {
            target.extend(patch);
        }
        Ok(store[endpoint][&id].clone())
    }

    async fn delete(&self, endpoint: &str, id: RecordId) -> Result<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.in_flight_deletes.fetch_add(1, Ordering::SeqCst) == 0 {
            self.delete_rounds.fetch_add(1, Ordering::SeqCst);
        }
        let now = self.in_flight_deletes.load(Ordering::SeqCst);
        self.peak_in_flight_deletes.fetch_max(now, Ordering::SeqCst);

        // Let the rest of the round start before this one finishes
        tokio::task::yield_now().await;

        let failure = self.failing_deletes.read().await.get(&id).cloned();
        let result = if let Some(err) = failure {
            Err(err)
        } else {
            self.records
                .write()
                .await
                .get_mut(endpoint)
                .and_then(|table| table.remove(&id))
                .map(|_| ())
                .ok_or(TransportError::Http {
                    status: 404,
                    message: Some("Not found".to_string()),
                })
        };
        self.in_flight_deletes.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

// ===== 工厂方法 =====

/// Professional record; even ids are cardiologists, odd ids pediatricians.
pub fn professional_json(id: RecordId) -> Value {
    json!({
        "id": id,
        "name": format!("Professional {id}"),
        "email": format!("pro{id}@example.com"),
        "specialty": if id % 2 == 0 { "cardiology" } else { "pediatrics" },
    })
}
