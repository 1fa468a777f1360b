use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub realtime: RealtimeConfig,
    pub guard: GuardConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    /// Bearer token for the RINSR backend. Absent means unauthenticated calls.
    pub token: Option<String>,
    pub request_timeout_secs: u64,
    pub notification_limit: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// host:port of the push event endpoint
    pub events_addr: String,
    /// Prefixed variant used alongside the bare hub id when joining
    pub hub_channel_prefix: String,
    pub reconnect_delay_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Where the route guard sends a principal who is denied a page
    pub fallback_path: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // API overrides
        if let Ok(v) = env::var("RINSR_API_BASE_URL") {
            self.api.base_url = v;
        }
        if let Ok(v) = env::var("RINSR_API_TOKEN") {
            if !v.is_empty() {
                self.api.token = Some(v);
            }
        }
        if let Ok(v) = env::var("RINSR_API_TIMEOUT_SECS") {
            self.api.request_timeout_secs = v.parse().unwrap_or(self.api.request_timeout_secs);
        }
        if let Ok(v) = env::var("RINSR_NOTIFICATION_LIMIT") {
            self.api.notification_limit = v.parse().unwrap_or(self.api.notification_limit);
        }

        // Realtime overrides
        if let Ok(v) = env::var("RINSR_EVENTS_ADDR") {
            self.realtime.events_addr = v;
        }
        if let Ok(v) = env::var("RINSR_HUB_CHANNEL_PREFIX") {
            self.realtime.hub_channel_prefix = v;
        }
        if let Ok(v) = env::var("RINSR_RECONNECT_DELAY_SECS") {
            self.realtime.reconnect_delay_secs =
                v.parse().unwrap_or(self.realtime.reconnect_delay_secs);
        }

        // Guard overrides
        if let Ok(v) = env::var("RINSR_GUARD_FALLBACK") {
            self.guard.fallback_path = v;
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                base_url: "http://localhost:4000".to_string(),
                token: None,
                request_timeout_secs: 30,
                notification_limit: 200,
            },
            realtime: RealtimeConfig {
                events_addr: "localhost:4010".to_string(),
                hub_channel_prefix: "hub_".to_string(),
                reconnect_delay_secs: 2,
            },
            guard: GuardConfig {
                fallback_path: "/dashboard/unauthorized".to_string(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                base_url: "https://api-staging.rinsr.example".to_string(),
                token: None,
                request_timeout_secs: 15,
                notification_limit: 200,
            },
            realtime: RealtimeConfig {
                events_addr: "events-staging.rinsr.example:443".to_string(),
                hub_channel_prefix: "hub_".to_string(),
                reconnect_delay_secs: 5,
            },
            guard: GuardConfig {
                fallback_path: "/dashboard/unauthorized".to_string(),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                base_url: "https://api.rinsr.example".to_string(),
                token: None,
                request_timeout_secs: 10,
                notification_limit: 100,
            },
            realtime: RealtimeConfig {
                events_addr: "events.rinsr.example:443".to_string(),
                hub_channel_prefix: "hub_".to_string(),
                reconnect_delay_secs: 5,
            },
            guard: GuardConfig {
                fallback_path: "/dashboard/unauthorized".to_string(),
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
