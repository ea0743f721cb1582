use actions::Navigator;
use std::collections::HashMap;
use std::sync::RwLock;

/// Response header carrying the revision of the view being served.
pub const VIEW_REVISION_HEADER: &str = "x-view-revision";

/// Tracks a revision per view path. Revalidating a path bumps its revision, so
/// clients holding an older revision know to refetch.
#[derive(Debug, Default)]
pub struct ViewCache {
    revisions: RwLock<HashMap<String, u64>>,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current revision of `path`; 0 if it was never revalidated.
    pub fn revision(&self, path: &str) -> u64 {
        let revisions = self.revisions.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        revisions.get(path).copied().unwrap_or(0)
    }
}

impl Navigator for ViewCache {
    fn revalidate_path(&self, path: &str) {
        let mut revisions = self.revisions.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        let revision = revisions.entry(path.to_string()).or_insert(0);
        *revision += 1;
        tracing::info!(path, revision = *revision, "View marked stale.");
    }
}
