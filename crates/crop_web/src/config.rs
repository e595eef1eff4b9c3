use axum::http::HeaderValue;
use crop_core::{Error, Result};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            allowed_origins: vec![DEFAULT_ALLOWED_ORIGIN.to_string()],
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Allow-listed origins get every method and header, with credentials.
    pub fn cors_layer(&self) -> Result<CorsLayer> {
        let origins = self
            .allowed_origins
            .iter()
            .map(|origin| {
                // credentials cannot be combined with a wildcard origin
                if origin.trim() == "*" {
                    return Err(Error::Config(
                        "wildcard origin is not allowed with credentials".to_string(),
                    ));
                }
                origin
                    .parse::<HeaderValue>()
                    .map_err(|e| Error::Config(format!("invalid origin {:?}: {}", origin, e)))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(AllowMethods::mirror_request())
            .allow_headers(AllowHeaders::mirror_request())
            .allow_credentials(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr(), "127.0.0.1:8000");
        assert_eq!(config.allowed_origins, vec!["http://localhost:3000"]);
        assert!(config.cors_layer().is_ok());
    }

    #[test]
    fn test_rejects_bad_origins() {
        let wildcard = ServerConfig {
            allowed_origins: vec!["*".to_string()],
            ..ServerConfig::default()
        };
        assert!(matches!(wildcard.cors_layer(), Err(Error::Config(_))));

        let control = ServerConfig {
            allowed_origins: vec!["http://a\nb".to_string()],
            ..ServerConfig::default()
        };
        assert!(matches!(control.cors_layer(), Err(Error::Config(_))));
    }
}
