use std::net::IpAddr;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: IpAddr,
    pub port: u16,
    pub api_access: AccessPolicy,
    pub registration: RegistrationMode,
    pub max_body_size: usize,
    pub log_level: String,
}

/// Who may call the CRM resource endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AccessPolicy {
    Open,
    Authenticated,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RegistrationMode {
    Open,
    Closed,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;
        let jwt_secret = env_required("JWT_SECRET")?;

        let host: IpAddr = env_or("CRMD_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid CRMD_HOST: {e}"))?;

        let port: u16 = env_or("CRMD_PORT", "8000")
            .parse()
            .map_err(|e| format!("Invalid CRMD_PORT: {e}"))?;

        // Unrecognised values fall back to requiring authentication
        let api_access = match env_or("CRMD_API_ACCESS", "authenticated").as_str() {
            "open" => AccessPolicy::Open,
            _ => AccessPolicy::Authenticated,
        };

        let registration = match env_or("CRMD_REGISTRATION", "closed").as_str() {
            "open" => RegistrationMode::Open,
            _ => RegistrationMode::Closed,
        };

        let max_body_size: usize = env_or("CRMD_MAX_BODY_SIZE", "1048576")
            .parse()
            .map_err(|e| format!("Invalid CRMD_MAX_BODY_SIZE: {e}"))?;

        let log_level = env_or("CRMD_LOG_LEVEL", "info");

        Ok(Config {
            database_url,
            jwt_secret,
            host,
            port,
            api_access,
            registration,
            max_body_size,
            log_level,
        })
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
