use crate::{
    catalog::{Catalog, CatalogPost, Profile},
    gateway::StateGateway,
    models::{ColorPair, LOCAL_AUTHOR_ID},
};
use serde::Serialize;

/// Catalog items revealed per feed page.
pub const PAGE_SIZE: usize = 5;

/// Display name used for locally created posts.
const LOCAL_USERNAME: &str = "You";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    pub id: String,
    pub user_id: String,
    pub username: String,
    pub caption: String,
    /// `None` for uploaded images, which are not kept across sessions
    pub color_pair: Option<ColorPair>,
    pub created_at: i64,
    pub age: String,
    pub liked: bool,
    pub saved: bool,
    pub comment_count: usize,
    pub interactions: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPage {
    pub page: usize,
    pub items: Vec<FeedItem>,
    pub has_more: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub id: String,
    pub name: String,
    pub seed: u32,
    pub following: bool,
    pub post_count: usize,
    pub posts: Vec<CatalogPost>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub peer_id: String,
    pub message_count: usize,
}

/// Coarse "how long ago" label: `42s`, `5m`, `3h`, `2d`.
pub fn time_ago(now: i64, then: i64) -> String {
    let s = now.saturating_sub(then).max(0) / 1000;
    match s {
        0..60 => format!("{}s", s),
        60..3600 => format!("{}m", s / 60),
        3600..86400 => format!("{}h", s / 3600),
        _ => format!("{}d", s / 86400),
    }
}

// ============================================================================
// FEED - Catalog and persisted state combined into view data
// ============================================================================
/// Locally created posts come first, newest on top, followed by the first
/// post of each catalog profile, `PAGE_SIZE` more per page.
pub fn feed_page(catalog: &Catalog, state: &StateGateway, page: usize, now: i64) -> FeedPage {
    let page = page.max(1);
    let profiles = catalog.profiles();
    let revealed = PAGE_SIZE.saturating_mul(page).min(profiles.len());

    let created = state.created_posts().iter().rev().map(|meta| {
        decorate(
            state,
            now,
            FeedItem {
                id: meta.id.clone(),
                user_id: LOCAL_AUTHOR_ID.to_string(),
                username: LOCAL_USERNAME.to_string(),
                caption: meta.caption.clone(),
                color_pair: meta.color_pair.clone(),
                created_at: meta.created_at,
                ..FeedItem::blank()
            },
        )
    });

    let base = profiles[..revealed].iter().filter_map(|profile| {
        let first = profile.posts.first()?;
        Some(decorate(
            state,
            now,
            FeedItem {
                id: format!("f-{}-1", profile.id),
                user_id: profile.id.clone(),
                username: profile.name.clone(),
                caption: first.caption.clone(),
                color_pair: Some(first.color_pair.clone()),
                created_at: first.created_at,
                ..FeedItem::blank()
            },
        ))
    });

    FeedPage {
        page,
        items: created.chain(base).collect(),
        has_more: revealed < profiles.len(),
    }
}

pub fn profile_view(profile: &Profile, state: &StateGateway) -> ProfileView {
    ProfileView {
        id: profile.id.clone(),
        name: profile.name.clone(),
        seed: profile.seed,
        following: state.is_followed(&profile.id),
        post_count: profile.posts.len(),
        posts: profile.posts.clone(),
    }
}

/// Peers with a conversation, in catalog order, then any others.
pub fn conversations(catalog: &Catalog, state: &StateGateway) -> Vec<ConversationSummary> {
    let known = catalog.profiles().iter().map(|p| p.id.as_str());
    let unknown = state
        .messages()
        .keys()
        .map(String::as_str)
        .filter(|peer| catalog.profile(peer).is_none());

    known
        .chain(unknown)
        .filter_map(|peer| {
            let count = state.conversation(peer).len();
            (count > 0).then(|| ConversationSummary {
                peer_id: peer.to_string(),
                message_count: count,
            })
        })
        .collect()
}

fn decorate(state: &StateGateway, now: i64, mut item: FeedItem) -> FeedItem {
    item.liked = state.is_liked(&item.id);
    item.saved = state.is_saved(&item.id);
    item.comment_count = state.comments_for(&item.id).len();
    item.interactions = usize::from(item.liked) + item.comment_count;
    item.age = time_ago(now, item.created_at);
    item
}

impl FeedItem {
    fn blank() -> Self {
        Self {
            id: String::new(),
            user_id: String::new(),
            username: String::new(),
            caption: String::new(),
            color_pair: None,
            created_at: 0,
            age: String::new(),
            liked: false,
            saved: false,
            comment_count: 0,
            interactions: 0,
        }
    }
}
