// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! TTL cache for fetched IdP metadata, keyed by netloc. Entries live in
//! memory or in a temporary file, per the netloc's cache policy; a
//! replaced or dropped file entry unlinks its backing file.

use crate::settings::CachingSetting;
use std::{
    collections::HashMap,
    io::Write,
    sync::Mutex,
    time::{Duration, Instant},
};
use tempfile::NamedTempFile;

#[derive(Debug)]
enum Storage {
    Memory(String),
    // The entry owns the file handle; dropping it removes the file.
    File(NamedTempFile),
}

#[derive(Debug)]
pub struct CacheEntry {
    timestamp: Instant,
    lifetime: Duration,
    storage: Storage,
}

impl CacheEntry {
    fn new(data: &str, settings: &CachingSetting) -> std::io::Result<Self> {
        let storage = if settings.in_memory {
            Storage::Memory(data.to_owned())
        } else {
            let mut file = NamedTempFile::new()?;
            file.write_all(data.as_bytes())?;
            file.flush()?;
            Storage::File(file)
        };
        Ok(Self {
            timestamp: Instant::now(),
            lifetime: Duration::from_secs(settings.lifetime_secs),
            storage,
        })
    }

    pub fn valid(&self) -> bool {
        self.timestamp.elapsed() < self.lifetime
    }

    /// The cached data, or `None` once the entry has expired.
    pub fn get_data(&self) -> Option<String> {
        if !self.valid() {
            return None;
        }
        match &self.storage {
            Storage::Memory(data) => Some(data.clone()),
            Storage::File(file) => match std::fs::read_to_string(file.path()) {
                Ok(data) => Some(data),
                Err(error) => {
                    tracing::warn!(path = %file.path().display(), %error, "cache file unreadable");
                    None
                },
            },
        }
    }
}

/// The per-grant metadata cache. Reads and writes on the same handle are
/// serialized; distinct handles are independent.
#[derive(Debug, Default)]
pub struct Cache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `data` under `handle` with the given policy. A zero
    /// lifetime disables caching entirely. The previous entry, if any, is
    /// dropped (removing its backing file).
    pub fn set(&self, handle: &str, settings: &CachingSetting, data: &str) {
        if settings.lifetime_secs == 0 {
            return;
        }
        match CacheEntry::new(data, settings) {
            Ok(entry) => {
                self.entries
                    .lock()
                    .expect("cache lock poisoned")
                    .insert(handle.to_owned(), entry);
            },
            Err(error) => {
                tracing::warn!(handle, %error, "failed to persist cache entry");
            },
        }
    }

    /// The last value stored under `handle`, unless absent or expired.
    pub fn get(&self, handle: &str) -> Option<String> {
        self.entries
            .lock()
            .expect("cache lock poisoned")
            .get(handle)
            .and_then(CacheEntry::get_data)
    }

    #[cfg(test)]
    fn force_expire(&self, handle: &str) {
        if let Some(entry) = self
            .entries
            .lock()
            .expect("cache lock poisoned")
            .get_mut(handle)
        {
            entry.lifetime = Duration::ZERO;
        }
    }
}
