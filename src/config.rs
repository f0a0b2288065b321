use serde::Deserialize;

use crate::services::lookup::{KPolicy, SelfExclusion};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path to the movie catalog artifact
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Path to the similarity matrix artifact (plain or gzip-compressed)
    #[serde(default = "default_similarity_path")]
    pub similarity_path: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of recommendations returned when the request omits `k`
    #[serde(default = "default_k")]
    pub default_k: i64,

    /// What to do with out-of-range `k` values
    #[serde(default)]
    pub k_policy: KPolicy,

    /// How the query movie is removed from its own ranking
    #[serde(default)]
    pub self_exclusion: SelfExclusion,

    /// Maximum number of entries kept per session history
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Maximum number of sessions with remembered history
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

fn default_catalog_path() -> String {
    "movies.json".to_string()
}

fn default_similarity_path() -> String {
    "similarity.json.gz".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_k() -> i64 {
    5
}

fn default_history_limit() -> usize {
    20
}

fn default_max_sessions() -> usize {
    10_000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            similarity_path: default_similarity_path(),
            host: default_host(),
            port: default_port(),
            default_k: default_k(),
            k_policy: KPolicy::default(),
            self_exclusion: SelfExclusion::default(),
            history_limit: default_history_limit(),
            max_sessions: default_max_sessions(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Address the HTTP listener binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_env() {
        let config: Config = envy::from_iter(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(config.catalog_path, "movies.json");
        assert_eq!(config.port, 3000);
        assert_eq!(config.default_k, 5);
        assert_eq!(config.max_sessions, 10_000);
        assert_eq!(config.k_policy, KPolicy::Clamp);
        assert_eq!(config.self_exclusion, SelfExclusion::ExcludeQuery);
    }

    #[test]
    fn test_policies_from_env() {
        let vars = vec![
            ("K_POLICY".to_string(), "reject".to_string()),
            ("SELF_EXCLUSION".to_string(), "drop_first".to_string()),
            ("PORT".to_string(), "8080".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();
        assert_eq!(config.k_policy, KPolicy::Reject);
        assert_eq!(config.self_exclusion, SelfExclusion::DropFirst);
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    }
}
