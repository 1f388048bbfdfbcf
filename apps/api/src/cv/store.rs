//! Session CV store — uploaded profiles live in memory only, per the
//! design intent that CV data never persists beyond the session.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::cv::profile::CvProfile;

const DEFAULT_TTL: Duration = Duration::from_secs(3600);

struct StoredCv {
    profile: CvProfile,
    stored_at: Instant,
}

/// In-memory store keyed by an opaque session id. Entries expire after the
/// TTL; expired entries are swept on every insert.
#[derive(Clone)]
pub struct CvStore {
    inner: Arc<RwLock<HashMap<String, StoredCv>>>,
    ttl: Duration,
}

impl CvStore {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    /// TTL injection point for tests.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Stores a profile and returns its session id.
    pub async fn insert(&self, profile: CvProfile) -> String {
        let id = Uuid::new_v4().simple().to_string();
        let now = Instant::now();

        let mut map = self.inner.write().await;
        map.retain(|_, stored| now.duration_since(stored.stored_at) <= self.ttl);
        map.insert(
            id.clone(),
            StoredCv {
                profile,
                stored_at: now,
            },
        );
        id
    }

    /// Returns a clone of the stored profile, or None if unknown or expired.
    pub async fn get(&self, cv_id: &str) -> Option<CvProfile> {
        let map = self.inner.read().await;
        let stored = map.get(cv_id)?;
        if stored.stored_at.elapsed() > self.ttl {
            return None;
        }
        Some(stored.profile.clone())
    }
}

impl Default for CvStore {
    fn default() -> Self {
        Self::new()
    }
}
