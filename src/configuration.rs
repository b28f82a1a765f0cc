use thiserror::Error;
use url::Url;

pub const BACKEND_URL_VAR: &str = "NEXT_PUBLIC_SUPABASE_URL";
pub const BACKEND_ANON_KEY_VAR: &str = "NEXT_PUBLIC_SUPABASE_ANON_KEY";

pub trait Configuration: Clone + Send + Sync + 'static {
    fn website_title(&self) -> String;
    fn port(&self) -> String;
    fn backend(&self) -> BackendConfig;
    fn image_domains(&self) -> Vec<ImageDomain>;
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set and non-empty")]
    Missing(&'static str),

    #[error("Invalid backend url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Anon key is not a valid header value")]
    InvalidAnonKey,

    #[error("Invalid image domain {0:?}: expected a bare host name such as images.example.com")]
    InvalidImageDomain(String),
}

/// Endpoint and public key of the hosted backend, checked for presence once
/// at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendConfig {
    url: Url,
    anon_key: String,
}

impl BackendConfig {
    pub fn new(url: Option<String>, anon_key: Option<String>) -> Result<Self, ConfigError> {
        let url = present(url).ok_or(ConfigError::Missing(BACKEND_URL_VAR))?;
        let anon_key = present(anon_key).ok_or(ConfigError::Missing(BACKEND_ANON_KEY_VAR))?;

        let parsed = Url::parse(&url).map_err(|err| ConfigError::InvalidUrl {
            url: url.clone(),
            reason: err.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                url,
                reason: "scheme must be http or https".into(),
            });
        }

        Ok(Self {
            url: parsed,
            anon_key,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn anon_key(&self) -> &str {
        &self.anon_key
    }
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Host a page may load remote images from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDomain(String);

impl ImageDomain {
    pub fn parse(domain: &str) -> Result<Self, ConfigError> {
        let domain = domain.trim();
        let invalid = || ConfigError::InvalidImageDomain(domain.to_string());

        if domain.is_empty() || domain.contains("://") || domain.contains('/') {
            return Err(invalid());
        }
        url::Host::parse(domain).map_err(|_| invalid())?;

        Ok(Self(domain.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test_case::test_case(None, Some("key"), BACKEND_URL_VAR)]
    #[test_case::test_case(Some(""), Some("key"), BACKEND_URL_VAR)]
    #[test_case::test_case(Some("   "), Some("key"), BACKEND_URL_VAR)]
    #[test_case::test_case(Some("https://project.supabase.co"), None, BACKEND_ANON_KEY_VAR)]
    #[test_case::test_case(Some("https://project.supabase.co"), Some(""), BACKEND_ANON_KEY_VAR)]
    #[test_case::test_case(None, None, BACKEND_URL_VAR)]
    fn test_missing_backend_values(url: Option<&str>, key: Option<&str>, variable: &'static str) {
        let result = BackendConfig::new(url.map(String::from), key.map(String::from));
        assert_eq!(result.unwrap_err(), ConfigError::Missing(variable));
    }

    #[test_case::test_case("project.supabase.co")]
    #[test_case::test_case("ftp://project.supabase.co")]
    fn test_invalid_backend_url(url: &str) {
        let result = BackendConfig::new(Some(url.into()), Some("key".into()));
        assert!(matches!(result, Err(ConfigError::InvalidUrl { .. })));
    }

    #[test]
    fn test_valid_backend_config() {
        let config =
            BackendConfig::new(Some("https://project.supabase.co".into()), Some(" key ".into()))
                .unwrap();
        assert_eq!(config.url().host_str(), Some("project.supabase.co"));
        assert_eq!(config.anon_key(), "key");
    }

    #[test_case::test_case("images.unsplash.com")]
    #[test_case::test_case("CDN.Example.com")]
    #[test_case::test_case("localhost")]
    #[test_case::test_case("127.0.0.1")]
    fn test_valid_image_domain(domain: &str) {
        let parsed = ImageDomain::parse(domain).unwrap();
        assert_eq!(parsed.as_str(), domain.to_ascii_lowercase());
    }

    #[test_case::test_case("https://images.unsplash.com")]
    #[test_case::test_case("images.unsplash.com/photos")]
    #[test_case::test_case("")]
    #[test_case::test_case("bad host")]
    fn test_invalid_image_domain(domain: &str) {
        assert_eq!(
            ImageDomain::parse(domain).unwrap_err(),
            ConfigError::InvalidImageDomain(domain.trim().to_string())
        );
    }
}
