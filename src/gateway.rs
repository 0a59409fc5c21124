use crate::{
    models::{
        ColorPair, Comment, CommentStore, CreatedPostMeta, FollowMap, LOCAL_AUTHOR_ID, LikeMap,
        MAX_COMMENTS_PER_POST, Message, MessageStore, SaveMap, YOU, fresh_id, now_millis,
    },
    storage::{Storage, StorageKey},
    store::PersistedStore,
};
use std::{collections::BTreeMap, sync::Arc};
use tracing::info;

/// Where the picture of a new post comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostImage {
    /// A gradient regenerated from the stored colours
    Generated(ColorPair),
    /// A user-supplied image that lives only for the session
    Uploaded,
}

// ============================================================================
// STATE GATEWAY - The only writer of the persisted stores
// ============================================================================
/// Owns the six persisted stores. Every operation touches exactly one store
/// and writes it back before returning.
pub struct StateGateway {
    pub(crate) likes: PersistedStore<LikeMap>,
    pub(crate) saves: PersistedStore<SaveMap>,
    pub(crate) follows: PersistedStore<FollowMap>,
    pub(crate) comments: PersistedStore<CommentStore>,
    pub(crate) created: PersistedStore<Vec<CreatedPostMeta>>,
    pub(crate) messages: PersistedStore<MessageStore>,
}

impl StateGateway {
    /// Load every store from `storage`. Never fails: unreadable entries start empty.
    pub fn open(storage: Arc<dyn Storage>) -> Self {
        let gateway = Self {
            likes: PersistedStore::open(StorageKey::Likes, storage.clone()),
            saves: PersistedStore::open(StorageKey::Saves, storage.clone()),
            follows: PersistedStore::open(StorageKey::Follows, storage.clone()),
            comments: PersistedStore::open(StorageKey::Comments, storage.clone()),
            created: PersistedStore::open(StorageKey::CreatedMeta, storage.clone()),
            messages: PersistedStore::open(StorageKey::Messages, storage),
        };

        info!(
            "State loaded: {} likes, {} saves, {} follows, {} created posts",
            gateway.likes.get().len(),
            gateway.saves.get().len(),
            gateway.follows.get().len(),
            gateway.created.get().len()
        );

        gateway
    }

    // ------------------------------------------------------------------------
    // Toggles
    // ------------------------------------------------------------------------

    /// Returns the new flag.
    pub fn toggle_like(&mut self, post_id: &str) -> bool {
        let liked = self.likes.update(|m| toggle(m, post_id));
        info!("Post {} liked: {}", post_id, liked);
        liked
    }

    pub fn toggle_save(&mut self, post_id: &str) -> bool {
        let saved = self.saves.update(|m| toggle(m, post_id));
        info!("Post {} saved: {}", post_id, saved);
        saved
    }

    pub fn toggle_follow(&mut self, user_id: &str) -> bool {
        let followed = self.follows.update(|m| toggle(m, user_id));
        info!("User {} followed: {}", user_id, followed);
        followed
    }

    // ------------------------------------------------------------------------
    // Appends
    // ------------------------------------------------------------------------

    /// Append a comment by the local user. Blank text is ignored and returns `None`.
    pub fn add_comment(&mut self, post_id: &str, raw_text: &str) -> Option<Comment> {
        let text = raw_text.trim();
        if text.is_empty() {
            return None;
        }

        let comment = Comment {
            id: fresh_id("c"),
            author: YOU.to_string(),
            text: text.to_string(),
            timestamp: now_millis(),
        };

        self.comments.update(|store| {
            let thread = store.entry(post_id.to_string()).or_default();
            thread.push(comment.clone());
            if thread.len() > MAX_COMMENTS_PER_POST {
                let excess = thread.len() - MAX_COMMENTS_PER_POST;
                thread.drain(..excess);
            }
        });

        info!("Comment {} added to post {}", comment.id, post_id);
        Some(comment)
    }

    /// Record a locally authored post. Only metadata is kept.
    ///
    /// An uploaded post without a caption is captioned "(image)".
    pub fn create_post(&mut self, caption: Option<&str>, image: PostImage) -> CreatedPostMeta {
        let (caption, color_pair) = match image {
            PostImage::Generated(pair) => (caption.unwrap_or_default(), Some(pair)),
            PostImage::Uploaded => (caption.filter(|c| !c.is_empty()).unwrap_or("(image)"), None),
        };

        let meta = CreatedPostMeta {
            id: fresh_id("cmeta-"),
            caption: caption.to_string(),
            color_pair,
            created_at: now_millis(),
            author_id: LOCAL_AUTHOR_ID.to_string(),
        };

        self.created.update(|posts| posts.push(meta.clone()));

        info!("Post created: {}", meta.id);
        meta
    }

    /// Append an outgoing message. Blank text is ignored and returns `None`.
    pub fn send_message(&mut self, peer_id: &str, raw_text: &str) -> Option<Message> {
        let text = raw_text.trim();
        if text.is_empty() {
            return None;
        }

        let message = Message {
            id: fresh_id("m"),
            sender: YOU.to_string(),
            text: text.to_string(),
            timestamp: now_millis(),
        };

        self.messages.update(|store| {
            store
                .entry(peer_id.to_string())
                .or_default()
                .push(message.clone())
        });

        info!("Message {} sent to {}", message.id, peer_id);
        Some(message)
    }

    // ------------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------------

    pub fn is_liked(&self, post_id: &str) -> bool {
        flag(self.likes.get(), post_id)
    }

    pub fn is_saved(&self, post_id: &str) -> bool {
        flag(self.saves.get(), post_id)
    }

    pub fn is_followed(&self, user_id: &str) -> bool {
        flag(self.follows.get(), user_id)
    }

    pub fn comments_for(&self, post_id: &str) -> &[Comment] {
        self.comments.get().get(post_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn conversation(&self, peer_id: &str) -> &[Message] {
        self.messages.get().get(peer_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Locally created posts in creation order.
    pub fn created_posts(&self) -> &[CreatedPostMeta] {
        self.created.get()
    }

    pub fn likes(&self) -> &LikeMap {
        self.likes.get()
    }

    pub fn saves(&self) -> &SaveMap {
        self.saves.get()
    }

    pub fn follows(&self) -> &FollowMap {
        self.follows.get()
    }

    pub fn comments(&self) -> &CommentStore {
        self.comments.get()
    }

    pub fn messages(&self) -> &MessageStore {
        self.messages.get()
    }
}

fn toggle(map: &mut BTreeMap<String, bool>, key: &str) -> bool {
    let flag = map.entry(key.to_string()).or_insert(false);
    *flag = !*flag;
    *flag
}

fn flag(map: &BTreeMap<String, bool>, key: &str) -> bool {
    map.get(key).copied().unwrap_or(false)
}
