use crate::models::ColorPair;
use serde::Serialize;

const DAY_MILLIS: i64 = 1000 * 60 * 60 * 24;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPost {
    pub id: String,
    pub color_pair: ColorPair,
    pub caption: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    /// Avatar seed for whoever renders the placeholder
    pub seed: u32,
    pub posts: Vec<CatalogPost>,
}

// ============================================================================
// CATALOG - Synthetic, read-only profiles and posts
// ============================================================================
/// Deterministic for a given `(profiles, posts_per_profile, generated_at)`.
#[derive(Debug, Clone)]
pub struct Catalog {
    profiles: Vec<Profile>,
}

impl Catalog {
    pub fn generate(profile_count: u32, posts_per_profile: u32, generated_at: i64) -> Self {
        let profiles = (1..=profile_count)
            .map(|u| Profile {
                id: format!("u{}", u),
                name: format!("User{}", u),
                seed: u,
                posts: (1..=posts_per_profile)
                    .map(|p| {
                        let hue = (u * 20 + p * 7) % 360;
                        CatalogPost {
                            id: format!("pp-{}-{}", u, p),
                            color_pair: ColorPair::new(
                                format!("hsl({},70%,70%)", hue),
                                format!("hsl({},70%,60%)", (hue + 40) % 360),
                            ),
                            caption: format!("Post {} by User{}", p, u),
                            created_at: generated_at - i64::from(p) * DAY_MILLIS,
                        }
                    })
                    .collect(),
            })
            .collect();

        Self { profiles }
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn profile(&self, user_id: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.id == user_id)
    }

    /// Case-insensitive name match. Blank queries match nobody.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&Profile> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return vec![];
        }

        self.profiles
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&query))
            .take(limit)
            .collect()
    }
}
