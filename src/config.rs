use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceMode {
    /// Write straight to the configured store
    Direct,
    /// Forward writes to the upstream record API
    Relay,
}

impl PersistenceMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Relay => "relay",
        }
    }
}

impl FromStr for PersistenceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "direct" => Ok(Self::Direct),
            "relay" => Ok(Self::Relay),
            other => Err(format!("unknown persistence mode `{other}`")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,

    /// Unset selects the in-memory store
    pub database_url: Option<String>,
    pub persistence_mode: PersistenceMode,

    pub relay_base_url: String,
    pub relay_timeout_secs: u64,

    pub auth_url: Option<String>,
    pub auth_api_key: String,
    pub jwt_secret: String,
    pub session_cookie: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()
                .expect("PORT must be a number"),

            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            persistence_mode: env::var("PERSISTENCE_MODE")
                .unwrap_or_else(|_| "direct".into())
                .parse()
                .expect("PERSISTENCE_MODE must be `direct` or `relay`"),

            relay_base_url: env::var("RELAY_BASE_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8000".into()),
            relay_timeout_secs: env::var("RELAY_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".into())
                .parse()
                .expect("RELAY_TIMEOUT_SECS must be a number"),

            auth_url: env::var("AUTH_URL").ok().filter(|s| !s.is_empty()),
            auth_api_key: env::var("AUTH_API_KEY").unwrap_or_default(),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            session_cookie: env::var("SESSION_COOKIE")
                .unwrap_or_else(|_| "supabase-auth-token".into()),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
