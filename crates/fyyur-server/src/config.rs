use axum::http::{HeaderValue, Method};
use std::env;
use std::net::SocketAddr;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub domain: String,
    pub scheme: String,
    /// Empty means same-origin only.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup("FYYUR_BIND")
            .and_then(|v| match v.parse() {
                Ok(addr) => Some(addr),
                Err(e) => {
                    tracing::warn!(value = %v, "ignoring invalid FYYUR_BIND: {e}");
                    None
                }
            })
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 8080)));

        Self {
            bind_addr,
            domain: lookup("FYYUR_DOMAIN").unwrap_or_else(|| "localhost:8080".to_string()),
            scheme: lookup("FYYUR_SCHEME").unwrap_or_else(|| "http".to_string()),
            cors_origins: lookup("CORS_ORIGINS")
                .map(|v| parse_origins(&v))
                .unwrap_or_default(),
        }
    }

    pub fn cors_layer(&self) -> CorsLayer {
        let methods = [
            Method::GET,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ];

        if self.cors_origins.is_empty() {
            let origin = format!("{}://{}", self.scheme, self.domain);
            CorsLayer::new()
                .allow_origin(AllowOrigin::exact(
                    HeaderValue::from_str(&origin)
                        .unwrap_or_else(|_| HeaderValue::from_static("http://localhost")),
                ))
                .allow_methods(methods)
                .allow_headers(Any)
        } else {
            let origins: Vec<HeaderValue> = self
                .cors_origins
                .iter()
                .filter_map(|s| HeaderValue::from_str(s).ok())
                .collect();
            tracing::info!("CORS allowed origins: {:?}", origins);
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(methods)
                .allow_headers(Any)
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
