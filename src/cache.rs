//! Client-side query cache with optimistic update support.
//!
//! Values are stored as JSON keyed by a hierarchical [`QueryKey`], so one
//! prefix (e.g. `events`) can be snapshotted, invalidated or restored as a
//! unit. Mutations follow the same pattern everywhere: snapshot the prefix,
//! splice in the expected state, then restore the snapshot on failure or
//! invalidate the prefix on success.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::error::AppResult;

/// Hierarchical cache key, e.g. `events/detail/<id>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn root(segment: impl Into<String>) -> Self {
        Self(vec![segment.into()])
    }

    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    /// Child segment holding the JSON form of a filter struct
    pub fn with_params<P: Serialize>(&self, params: &P) -> AppResult<Self> {
        Ok(self.child(serde_json::to_string(params)?))
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.len() >= prefix.0.len() && self.0[..prefix.0.len()] == prefix.0[..]
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}

#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    stale: bool,
    updated_at: Instant,
}

impl Entry {
    fn fresh(value: Value) -> Self {
        Self {
            value,
            stale: false,
            updated_at: Instant::now(),
        }
    }
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<QueryKey, Entry>,
    /// Latest fetch generation per superseding slot
    generations: HashMap<QueryKey, u64>,
}

/// Entries under one prefix, captured before an optimistic update
#[derive(Debug, Clone)]
pub struct Snapshot {
    prefix: QueryKey,
    entries: Vec<(QueryKey, Entry)>,
}

impl Snapshot {
    pub fn prefix(&self) -> &QueryKey {
        &self.prefix
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Shared cache handle. Cheap to clone.
#[derive(Clone, Default)]
pub struct QueryCache {
    state: Arc<RwLock<CacheState>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, CacheState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CacheState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cached value, stale or not
    pub fn get<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let value = self.read().entries.get(key).map(|e| e.value.clone())?;
        match serde_json::from_value(value) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("Cache entry {} has an unexpected shape: {}", key, e);
                None
            }
        }
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.read().entries.contains_key(key)
    }

    pub fn is_fresh(&self, key: &QueryKey) -> bool {
        self.read().entries.get(key).is_some_and(|e| !e.stale)
    }

    /// Seconds since the entry was last written
    pub fn age_secs(&self, key: &QueryKey) -> Option<u64> {
        self.read()
            .entries
            .get(key)
            .map(|e| e.updated_at.elapsed().as_secs())
    }

    pub fn set<T: Serialize + ?Sized>(&self, key: QueryKey, value: &T) -> AppResult<()> {
        let value = serde_json::to_value(value)?;
        self.write().entries.insert(key, Entry::fresh(value));
        Ok(())
    }

    /// Edit an existing entry in place. Returns false when the key is absent.
    pub fn update<T, F>(&self, key: &QueryKey, f: F) -> AppResult<bool>
    where
        T: DeserializeOwned + Serialize,
        F: FnOnce(&mut T),
    {
        let mut state = self.write();
        let Some(entry) = state.entries.get_mut(key) else {
            return Ok(false);
        };
        let mut typed: T = serde_json::from_value(entry.value.clone())?;
        f(&mut typed);
        entry.value = serde_json::to_value(&typed)?;
        entry.updated_at = Instant::now();
        Ok(true)
    }

    /// Edit every entry under `prefix` that decodes as `T`; others are skipped.
    /// Returns how many entries were edited.
    pub fn update_matching<T, F>(&self, prefix: &QueryKey, mut f: F) -> AppResult<usize>
    where
        T: DeserializeOwned + Serialize,
        F: FnMut(&QueryKey, &mut T),
    {
        let mut state = self.write();
        let mut edited = 0;
        for (key, entry) in state.entries.iter_mut() {
            if !key.starts_with(prefix) {
                continue;
            }
            let Ok(mut typed) = serde_json::from_value::<T>(entry.value.clone()) else {
                continue;
            };
            f(key, &mut typed);
            entry.value = serde_json::to_value(&typed)?;
            entry.updated_at = Instant::now();
            edited += 1;
        }
        Ok(edited)
    }

    /// Drop every entry under `prefix`
    pub fn remove(&self, prefix: &QueryKey) -> usize {
        let mut state = self.write();
        let before = state.entries.len();
        state.entries.retain(|key, _| !key.starts_with(prefix));
        before - state.entries.len()
    }

    pub fn clear(&self) {
        let mut state = self.write();
        state.entries.clear();
        state.generations.clear();
    }

    /// Mark every entry under `prefix` stale so the next fetch reloads it
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        let mut state = self.write();
        let mut count = 0;
        for (key, entry) in state.entries.iter_mut() {
            if key.starts_with(prefix) {
                entry.stale = true;
                count += 1;
            }
        }
        tracing::debug!("Invalidated {} cache entries under {}", count, prefix);
        count
    }

    pub fn snapshot(&self, prefix: &QueryKey) -> Snapshot {
        let state = self.read();
        let entries = state
            .entries
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, entry)| (key.clone(), entry.clone()))
            .collect();
        Snapshot {
            prefix: prefix.clone(),
            entries,
        }
    }

    /// Put the prefix back exactly as it was when the snapshot was taken.
    /// Entries created under the prefix since then are dropped.
    pub fn restore(&self, snapshot: Snapshot) {
        let mut state = self.write();
        state.entries.retain(|key, _| !key.starts_with(&snapshot.prefix));
        tracing::debug!(
            "Restoring {} cache entries under {}",
            snapshot.entries.len(),
            snapshot.prefix
        );
        state.entries.extend(snapshot.entries);
    }

    /// Return the cached value when fresh, otherwise load and store it
    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, loader: F) -> AppResult<T>
    where
        T: DeserializeOwned + Serialize,
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        if self.is_fresh(&key) {
            if let Some(value) = self.get(&key) {
                return Ok(value);
            }
        }

        let value = loader().await?;
        self.set(key, &value)?;
        Ok(value)
    }

    /// Like [`fetch`](Self::fetch), but a load finishing after a newer load
    /// for the same `slot` has started is discarded and yields `None`.
    ///
    /// Used for list views whose key changes with the filters: results for
    /// filters the user has already moved away from never land.
    pub async fn fetch_latest<T, F, Fut>(
        &self,
        slot: &QueryKey,
        key: QueryKey,
        loader: F,
    ) -> AppResult<Option<T>>
    where
        T: DeserializeOwned + Serialize,
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let generation = {
            let mut state = self.write();
            let counter = state.generations.entry(slot.clone()).or_insert(0);
            *counter += 1;
            *counter
        };

        if self.is_fresh(&key) {
            if let Some(value) = self.get(&key) {
                return Ok(Some(value));
            }
        }

        let result = loader().await;

        let mut state = self.write();
        if state.generations.get(slot) != Some(&generation) {
            tracing::debug!("Discarding superseded fetch for {}", key);
            return Ok(None);
        }

        let value = result?;
        state
            .entries
            .insert(key, Entry::fresh(serde_json::to_value(&value)?));
        Ok(Some(value))
    }

    /// Optimistic mutation over `prefix`: apply `splice`, await `request`,
    /// then invalidate the prefix on success or restore it on failure.
    pub async fn mutate<T, S, Fut>(&self, prefix: &QueryKey, splice: S, request: Fut) -> AppResult<T>
    where
        S: FnOnce(&QueryCache) -> AppResult<()>,
        Fut: Future<Output = AppResult<T>>,
    {
        let snapshot = self.snapshot(prefix);

        if let Err(e) = splice(self) {
            tracing::warn!("Optimistic update of {} skipped: {}", prefix, e);
            self.restore(snapshot.clone());
        }

        match request.await {
            Ok(value) => {
                self.invalidate(prefix);
                Ok(value)
            }
            Err(e) => {
                tracing::warn!("Mutation under {} failed, rolling back: {}", prefix, e);
                self.restore(snapshot);
                Err(e)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
