use crate::{
    gateway::StateGateway,
    models::{
        CommentStore, CreatedPostMeta, FollowMap, LikeMap, MAX_COMMENTS_PER_POST, MessageStore,
        SaveMap,
    },
    storage::StorageKey,
    store::PersistedStore,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;
use tracing::{info, warn};

/// File name offered when the snapshot is downloaded.
pub const EXPORT_FILE_NAME: &str = "vibeverse_state_small.json";

const KNOWN_FIELDS: [&str; 6] = [
    "likesMap",
    "savesMap",
    "followsMap",
    "commentsSmall",
    "createdMeta",
    "messagesMap",
];

// ============================================================================
// SNAPSHOT - Exported aggregate of every persisted store
// ============================================================================
/// Every field is optional on import. An absent or `null` field leaves its
/// store alone. Export always fills all six.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes_map: Option<LikeMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saves_map: Option<SaveMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follows_map: Option<FollowMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments_small: Option<CommentStore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_meta: Option<Vec<CreatedPostMeta>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages_map: Option<MessageStore>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error("malformed snapshot: {0}")]
    Malformed(String),
}

impl Snapshot {
    /// Parse an imported document. Fails without side effects unless the text
    /// is a JSON object whose known fields all have the expected shape.
    pub fn parse(text: &str) -> Result<Self, ImportError> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| ImportError::Malformed(e.to_string()))?;

        let Some(object) = value.as_object() else {
            return Err(ImportError::Malformed("expected a JSON object".into()));
        };

        for field in object.keys().filter(|k| !KNOWN_FIELDS.contains(&k.as_str())) {
            warn!("Ignoring unknown snapshot field: {}", field);
        }

        serde_json::from_value(value).map_err(|e| ImportError::Malformed(e.to_string()))
    }

    pub fn to_json(&self) -> String {
        // Maps with string keys and plain records always serialize
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Stores that changed during an import, in merge order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    pub changed: Vec<&'static str>,
    #[serde(skip)]
    keys: Vec<StorageKey>,
}

impl MergeReport {
    fn record(&mut self, key: StorageKey, changed: bool) {
        if changed {
            self.keys.push(key);
            self.changed.push(key.as_str());
        }
    }

    pub fn changed_keys(&self) -> &[StorageKey] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

// ============================================================================
// EXPORT / IMPORT
// ============================================================================
impl StateGateway {
    pub fn export(&self) -> Snapshot {
        Snapshot {
            likes_map: Some(self.likes().clone()),
            saves_map: Some(self.saves().clone()),
            follows_map: Some(self.follows().clone()),
            comments_small: Some(self.comments().clone()),
            created_meta: Some(self.created_posts().to_vec()),
            messages_map: Some(self.messages().clone()),
        }
    }

    /// Parse `text` and merge it. Nothing changes if parsing fails.
    pub fn import_text(&mut self, text: &str) -> Result<MergeReport, ImportError> {
        let snapshot = Snapshot::parse(text)?;
        Ok(self.import_merge(snapshot))
    }

    /// Merge an already validated snapshot into the live stores.
    ///
    /// Flag maps take imported values key by key. Comment threads and
    /// conversations are replaced per key; imported threads keep only their
    /// most recent `MAX_COMMENTS_PER_POST` comments. Created posts are appended, minus
    /// ids already present. Only stores that actually change are written.
    pub fn import_merge(&mut self, snapshot: Snapshot) -> MergeReport {
        let mut report = MergeReport::default();

        if let Some(incoming) = snapshot.likes_map {
            report.record(StorageKey::Likes, merge_map(&mut self.likes, incoming));
        }
        if let Some(incoming) = snapshot.saves_map {
            report.record(StorageKey::Saves, merge_map(&mut self.saves, incoming));
        }
        if let Some(incoming) = snapshot.follows_map {
            report.record(StorageKey::Follows, merge_map(&mut self.follows, incoming));
        }
        if let Some(mut incoming) = snapshot.comments_small {
            for thread in incoming.values_mut() {
                if thread.len() > MAX_COMMENTS_PER_POST {
                    let excess = thread.len() - MAX_COMMENTS_PER_POST;
                    thread.drain(..excess);
                }
            }
            report.record(StorageKey::Comments, merge_map(&mut self.comments, incoming));
        }
        if let Some(incoming) = snapshot.created_meta {
            let existing: HashSet<&str> =
                self.created.get().iter().map(|m| m.id.as_str()).collect();
            let fresh: Vec<CreatedPostMeta> = incoming
                .into_iter()
                .filter(|m| !existing.contains(m.id.as_str()))
                .collect();

            let appended = !fresh.is_empty();
            if appended {
                self.created.update(|posts| posts.extend(fresh));
            }
            report.record(StorageKey::CreatedMeta, appended);
        }
        if let Some(incoming) = snapshot.messages_map {
            report.record(StorageKey::Messages, merge_map(&mut self.messages, incoming));
        }

        info!("Imported snapshot, changed stores: {:?}", report.changed);
        report
    }
}

/// Overwrite `store` entries with `incoming` ones. Writes only if some entry differs.
fn merge_map<V>(
    store: &mut PersistedStore<BTreeMap<String, V>>,
    incoming: BTreeMap<String, V>,
) -> bool
where
    V: PartialEq + Serialize + DeserializeOwned,
{
    let current = store.get();
    let changed = incoming
        .iter()
        .any(|(key, value)| current.get(key) != Some(value));

    if changed {
        store.update(|map| map.extend(incoming));
    }
    changed
}
