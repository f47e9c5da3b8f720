//! Authoritative favorite set.
//!
//! `FavoritesService` is the only writer of the favorite set. Add and remove
//! are check-then-act sequences, so both run under a single write guard; the
//! store itself never sees concurrent mutation.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::catalog::{Catalog, Tool, ToolId};

/// Storage for favorited ids. Implementations must keep ids unique and
/// iterate in insertion order.
pub trait FavoriteStore: Send + Sync {
    fn contains(&self, id: ToolId) -> bool;
    /// Returns `false` (and changes nothing) when `id` is already stored.
    fn insert(&mut self, id: ToolId) -> bool;
    /// Returns `false` when `id` was not stored.
    fn remove(&mut self, id: ToolId) -> bool;
    fn ids(&self) -> Vec<ToolId>;
    fn len(&self) -> usize;
}

/// Process-lifetime store. Discarded on restart.
#[derive(Debug, Default)]
pub struct InMemoryFavorites {
    ids: Vec<ToolId>,
}

impl FavoriteStore for InMemoryFavorites {
    fn contains(&self, id: ToolId) -> bool {
        self.ids.contains(&id)
    }

    fn insert(&mut self, id: ToolId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    fn remove(&mut self, id: ToolId) -> bool {
        match self.ids.iter().position(|&existing| existing == id) {
            Some(index) => {
                self.ids.remove(index);
                true
            }
            None => false,
        }
    }

    fn ids(&self) -> Vec<ToolId> {
        self.ids.clone()
    }

    fn len(&self) -> usize {
        self.ids.len()
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FavoritesError {
    #[error("{message}")]
    InvalidInput {
        message: String,
        field: &'static str,
        received: Option<serde_json::Value>,
    },
    #[error("{message}")]
    NotFound { message: String },
    #[error("{message}")]
    Conflict { message: String },
}

/// Acknowledgement returned by a successful add or remove.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteAck {
    pub message: String,
    pub tool_id: ToolId,
}

/// Validate a `toolId` taken from a JSON body: present, integral and positive.
/// A float with no fractional part (`1.0`) counts as integral.
pub fn parse_tool_id_value(value: Option<&serde_json::Value>) -> Result<ToolId, FavoritesError> {
    let invalid = |received: Option<&serde_json::Value>| FavoritesError::InvalidInput {
        message: "Valid toolId is required".to_string(),
        field: "toolId",
        received: received.cloned(),
    };

    let Some(value) = value else {
        return Err(invalid(None));
    };
    value
        .as_u64()
        .or_else(|| integral_f64(value))
        .filter(|&id| id > 0)
        .and_then(|id| ToolId::try_from(id).ok())
        .ok_or_else(|| invalid(Some(value)))
}

fn integral_f64(value: &serde_json::Value) -> Option<u64> {
    let n = value.as_f64()?;
    (n.fract() == 0.0 && n > 0.0 && n <= f64::from(ToolId::MAX)).then_some(n as u64)
}

/// Validate a tool id taken from a URL path segment.
pub fn parse_tool_id_str(raw: &str) -> Result<ToolId, FavoritesError> {
    raw.trim()
        .parse::<ToolId>()
        .ok()
        .filter(|&id| id > 0)
        .ok_or_else(|| FavoritesError::InvalidInput {
            message: "Valid tool ID is required".to_string(),
            field: "id",
            received: Some(serde_json::Value::String(raw.to_string())),
        })
}

pub struct FavoritesService<S = InMemoryFavorites> {
    catalog: Arc<Catalog>,
    store: RwLock<S>,
}

impl FavoritesService<InMemoryFavorites> {
    pub fn in_memory(catalog: Arc<Catalog>) -> Self {
        Self::with_store(catalog, InMemoryFavorites::default())
    }
}

impl<S: FavoriteStore> FavoritesService<S> {
    pub fn with_store(catalog: Arc<Catalog>, store: S) -> Self {
        Self {
            catalog,
            store: RwLock::new(store),
        }
    }

    /// Favorited tools, in the order they were added.
    pub fn list(&self) -> Vec<Tool> {
        let ids = self.store.read().ids();
        ids.into_iter()
            .filter_map(|id| self.catalog.find(id).cloned())
            .collect()
    }

    pub fn count(&self) -> usize {
        self.store.read().len()
    }

    /// Add `id` to the favorite set.
    ///
    /// Adding an id that is already favorited is a `Conflict`, not a silent
    /// success; the set is left unchanged.
    pub fn add(&self, id: ToolId) -> Result<FavoriteAck, FavoritesError> {
        let tool = self
            .catalog
            .find(id)
            .ok_or_else(|| FavoritesError::NotFound {
                message: "Tool not found".to_string(),
            })?;

        let mut store = self.store.write();
        if !store.insert(id) {
            return Err(FavoritesError::Conflict {
                message: format!("{} is already in your favorites!", tool.name),
            });
        }
        let favorite_count = store.len();
        drop(store);

        tracing::info!(tool_id = id, favorite_count, "Favorite added");
        Ok(FavoriteAck {
            message: format!("{} added to favorites!", tool.name),
            tool_id: id,
        })
    }

    /// Remove `id` from the favorite set.
    pub fn remove(&self, id: ToolId) -> Result<FavoriteAck, FavoritesError> {
        let mut store = self.store.write();
        if !store.remove(id) {
            return Err(FavoritesError::NotFound {
                message: "Tool not found in favorites".to_string(),
            });
        }
        let favorite_count = store.len();
        drop(store);

        tracing::info!(tool_id = id, favorite_count, "Favorite removed");
        let name = self
            .catalog
            .find(id)
            .map(|t| t.name.as_str())
            .unwrap_or("Tool");
        Ok(FavoriteAck {
            message: format!("{name} removed from favorites"),
            tool_id: id,
        })
    }
}
