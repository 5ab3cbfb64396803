//! JSON document backends addressed by slash-separated paths.

use crate::error::StoreError;
use reqwest::{Client, Method, StatusCode};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

/// Document store backend.
#[derive(Clone)]
pub enum DocumentStore {
    /// Firebase Realtime Database REST API
    Firebase(FirebaseStore),
    /// In-process JSON tree (no persistence)
    Memory(MemoryStore),
}

impl DocumentStore {
    /// Read the value at `path`; absent paths read as `Value::Null`.
    pub async fn get(&self, path: &str) -> Result<Value, StoreError> {
        match self {
            DocumentStore::Firebase(s) => s.get(path).await,
            DocumentStore::Memory(s) => Ok(s.get(path).await),
        }
    }

    /// Replace the value at `path`.
    pub async fn set(&self, path: &str, value: &Value) -> Result<(), StoreError> {
        match self {
            DocumentStore::Firebase(s) => s.set(path, value).await,
            DocumentStore::Memory(s) => {
                s.set(path, value.clone()).await;
                Ok(())
            }
        }
    }

    /// Merge the given fields into the object at `path`.
    pub async fn patch(&self, path: &str, fields: &Map<String, Value>) -> Result<(), StoreError> {
        match self {
            DocumentStore::Firebase(s) => s.patch(path, fields).await,
            DocumentStore::Memory(s) => {
                s.patch(path, fields.clone()).await;
                Ok(())
            }
        }
    }

    /// Remove the value at `path`. Removing an absent path succeeds.
    pub async fn delete(&self, path: &str) -> Result<(), StoreError> {
        match self {
            DocumentStore::Firebase(s) => s.delete(path).await,
            DocumentStore::Memory(s) => {
                s.delete(path).await;
                Ok(())
            }
        }
    }
}

/// Firebase Realtime Database over its REST surface (`{base}/{path}.json`).
#[derive(Clone)]
pub struct FirebaseStore {
    client: Client,
    base_url: String,
}

impl FirebaseStore {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}.json", self.base_url, path.trim_matches('/'))
    }

    async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value, StoreError> {
        let mut request = self.client.request(method.clone(), self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(%method, path, status = status.as_u16(), "Store request failed: {}", message);
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, path: &str) -> Result<Value, StoreError> {
        self.send(Method::GET, path, None).await
    }

    #[instrument(skip(self, value))]
    pub async fn set(&self, path: &str, value: &Value) -> Result<(), StoreError> {
        self.send(Method::PUT, path, Some(value)).await?;
        debug!("Wrote {}", path);
        Ok(())
    }

    #[instrument(skip(self, fields))]
    pub async fn patch(&self, path: &str, fields: &Map<String, Value>) -> Result<(), StoreError> {
        let body = Value::Object(fields.clone());
        self.send(Method::PATCH, path, Some(&body)).await?;
        debug!("Patched {}", path);
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, path: &str) -> Result<(), StoreError> {
        self.send(Method::DELETE, path, None).await?;
        debug!("Deleted {}", path);
        Ok(())
    }
}

/// In-memory JSON tree with the same path semantics as Firebase.
#[derive(Clone, Default)]
pub struct MemoryStore {
    root: Arc<RwLock<Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, path: &str) -> Value {
        let root = self.root.read().await;
        let mut node = &*root;
        for segment in segments(path) {
            node = match node {
                Value::Object(map) => match map.get(segment) {
                    Some(child) => child,
                    None => return Value::Null,
                },
                Value::Array(items) => match segment.parse::<usize>().ok().and_then(|i| items.get(i)) {
                    Some(child) => child,
                    None => return Value::Null,
                },
                _ => return Value::Null,
            };
        }
        node.clone()
    }

    pub async fn set(&self, path: &str, value: Value) {
        if value.is_null() {
            self.delete(path).await;
            return;
        }

        let mut root = self.root.write().await;
        let parts: Vec<&str> = segments(path).collect();
        let Some((last, parents)) = parts.split_last() else {
            *root = value;
            return;
        };

        if let Some(parent) = ensure_object_path(&mut root, parents) {
            parent.insert((*last).to_string(), value);
        }
    }

    pub async fn patch(&self, path: &str, fields: Map<String, Value>) {
        let mut root = self.root.write().await;
        let parts: Vec<&str> = segments(path).collect();
        let Some(target) = ensure_object_path(&mut root, &parts) else {
            return;
        };

        for (key, value) in fields {
            if value.is_null() {
                target.remove(&key);
            } else {
                target.insert(key, value);
            }
        }
    }

    pub async fn delete(&self, path: &str) {
        let mut root = self.root.write().await;
        let parts: Vec<&str> = segments(path).collect();
        let Some((last, parents)) = parts.split_last() else {
            *root = Value::Null;
            return;
        };

        let mut node = &mut *root;
        for segment in parents {
            node = match node {
                Value::Object(map) => match map.get_mut(*segment) {
                    Some(child) => child,
                    None => return,
                },
                _ => return,
            };
        }

        if let Value::Object(map) = node {
            map.remove(*last);
        }
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Walk to `parts`, replacing anything that is not an object on the way.
fn ensure_object_path<'a>(root: &'a mut Value, parts: &[&str]) -> Option<&'a mut Map<String, Value>> {
    let mut node = root;
    for segment in parts {
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        node = node
            .as_object_mut()?
            .entry((*segment).to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    node.as_object_mut()
}
