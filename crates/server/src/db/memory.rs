//! In-process user map store.
//!
//! Used by the router tests and by `MAPA_STORE=memory` for local development
//! without a database. Every mutation holds the write lock for its whole
//! read-modify-write, so it is atomic in the same way a single-row update is.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use mapa_core::{Email, MarkerId};

use super::{RepositoryError, UserMapStore};
use crate::models::{Marker, UserMap, Visit};

/// User maps kept in a `HashMap` keyed by owner email.
#[derive(Debug, Default)]
pub struct MemoryUserMapStore {
    maps: RwLock<HashMap<Email, UserMap>>,
}

impl MemoryUserMapStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored maps.
    pub async fn len(&self) -> usize {
        self.maps.read().await.len()
    }

    /// Whether no map has been created yet.
    pub async fn is_empty(&self) -> bool {
        self.maps.read().await.is_empty()
    }
}

#[async_trait]
impl UserMapStore for MemoryUserMapStore {
    async fn find_by_email(&self, email: &Email) -> Result<Option<UserMap>, RepositoryError> {
        Ok(self.maps.read().await.get(email).cloned())
    }

    async fn push_marker(
        &self,
        email: &Email,
        marker: Marker,
    ) -> Result<UserMap, RepositoryError> {
        let mut maps = self.maps.write().await;
        let map = maps
            .entry(email.clone())
            .or_insert_with(|| UserMap::new(email.clone(), Utc::now()));
        map.markers.push(marker);
        Ok(map.clone())
    }

    async fn push_visit(
        &self,
        email: &Email,
        visit: Visit,
    ) -> Result<Option<UserMap>, RepositoryError> {
        let mut maps = self.maps.write().await;
        Ok(maps.get_mut(email).map(|map| {
            map.visits.push(visit);
            map.clone()
        }))
    }

    async fn pull_marker(
        &self,
        email: &Email,
        marker_id: MarkerId,
    ) -> Result<Option<UserMap>, RepositoryError> {
        let mut maps = self.maps.write().await;
        let Some(map) = maps.get_mut(email) else {
            return Ok(None);
        };
        let Some(pos) = map.markers.iter().position(|m| m.id == marker_id) else {
            return Ok(None);
        };
        // Vec::remove shifts the tail left, so the remaining order is kept.
        map.markers.remove(pos);
        Ok(Some(map.clone()))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
