use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB v3 API key
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// PostgreSQL connection URL. Lists and profiles are kept in memory when unset.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Redis connection URL. The cache and sessions are kept in memory when unset.
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Lifetime of a browsing session, in seconds
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,

    /// Lifetime of cached movie details and credits, in seconds
    #[serde(default = "default_movie_cache_ttl_secs")]
    pub movie_cache_ttl_secs: u64,

    /// Header carrying the authenticated user id, set by the fronting identity proxy
    #[serde(default = "default_auth_header")]
    pub auth_header: String,

    /// Mark the session cookie `Secure`
    #[serde(default)]
    pub secure_cookies: bool,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_session_ttl_secs() -> u64 {
    60 * 60 * 24 * 14
}

fn default_movie_cache_ttl_secs() -> u64 {
    60 * 60 * 24
}

fn default_auth_header() -> String {
    "x-authenticated-user".to_string()
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
    fn test_defaults_applied() {
        let vars = vec![("TMDB_API_KEY".to_string(), "abc".to_string())];
        let config: Config = envy::from_iter(vars).unwrap();

        assert_eq!(config.tmdb_api_key, "abc");
        assert_eq!(config.tmdb_api_url, "https://api.themoviedb.org/3");
        assert_eq!(config.database_url, None);
        assert_eq!(config.redis_url, None);
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
        assert_eq!(config.session_ttl_secs, 1_209_600);
        assert_eq!(config.movie_cache_ttl_secs, 86_400);
        assert_eq!(config.auth_header, "x-authenticated-user");
        assert!(!config.secure_cookies);
    }

    #[test]
    fn test_missing_api_key_is_an_error() {
        let vars: Vec<(String, String)> = vec![("PORT".to_string(), "8080".to_string())];
        assert!(envy::from_iter::<_, Config>(vars).is_err());
    }

    #[test]
    fn test_optional_backends_parsed() {
        let vars = vec![
            ("TMDB_API_KEY".to_string(), "abc".to_string()),
            ("DATABASE_URL".to_string(), "postgres://localhost/pick".to_string()),
            ("REDIS_URL".to_string(), "redis://localhost:6379".to_string()),
            ("SECURE_COOKIES".to_string(), "true".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();

        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/pick"));
        assert_eq!(config.redis_url.as_deref(), Some("redis://localhost:6379"));
        assert!(config.secure_cookies);
    }
}
