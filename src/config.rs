use serde::Deserialize;

/// Categories offered to every provider even before anyone registers
/// under them. Stored categories are merged in on top of these.
pub const DEFAULT_BASE_CATEGORIES: &[&str] = &[
    "Carpentry",
    "Cleaning",
    "Electrical",
    "Gardening",
    "Painting",
    "Plumbing",
    "Tutoring",
];

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub session: SessionConfig,
    pub base_categories: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let session = SessionConfig {
            cookie_name: std::env::var("SESSION_COOKIE").unwrap_or_else(|_| "sid".into()),
            ttl_minutes: std::env::var("SESSION_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24 * 7),
        };
        let base_categories = std::env::var("BASE_CATEGORIES")
            .map(|raw| {
                raw.split(',')
                    .map(|c| c.trim().to_string())
                    .filter(|c: &String| !c.is_empty())
                    .collect()
            })
            .unwrap_or_else(|_| {
                DEFAULT_BASE_CATEGORIES
                    .iter()
                    .map(|c| c.to_string())
                    .collect()
            });
        Ok(Self {
            database_url,
            session,
            base_categories,
        })
    }
}
