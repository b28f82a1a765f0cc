use crate::configuration::{BackendConfig, ConfigError, Configuration, ImageDomain};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about = "Booking website backed by a hosted database")]
struct Arguments {
    /// Title shown in the page header
    #[arg(long, env = "WEBSITE_TITLE", default_value = "Book an appointment")]
    website_title: String,

    #[arg(long, env = "PORT", default_value = "3000")]
    port: String,

    /// Endpoint of the hosted backend
    #[arg(long, env = "NEXT_PUBLIC_SUPABASE_URL")]
    supabase_url: Option<String>,

    /// Public (anon) API key of the hosted backend
    #[arg(long, env = "NEXT_PUBLIC_SUPABASE_ANON_KEY", hide_env_values = true)]
    supabase_anon_key: Option<String>,

    /// Host names remote images may be loaded from
    #[arg(long = "image-domain", env = "IMAGE_DOMAINS", value_delimiter = ',')]
    image_domains: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct ConfigurationHandler {
    website_title: String,
    port: String,
    backend: BackendConfig,
    image_domains: Vec<ImageDomain>,
}

impl ConfigurationHandler {
    /// Loads `.env` if present, then reads arguments and environment.
    pub fn parse_arguments() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(?path, "Loaded environment file");
        }
        Self::from_arguments(Arguments::parse())
    }

    fn from_arguments(arguments: Arguments) -> Result<Self, ConfigError> {
        let backend = BackendConfig::new(arguments.supabase_url, arguments.supabase_anon_key)?;
        let image_domains = arguments
            .image_domains
            .iter()
            .map(|domain| ImageDomain::parse(domain))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            website_title: arguments.website_title,
            port: arguments.port,
            backend,
            image_domains,
        })
    }
}

impl Configuration for ConfigurationHandler {
    fn website_title(&self) -> String {
        self.website_title.clone()
    }

    fn port(&self) -> String {
        self.port.clone()
    }

    fn backend(&self) -> BackendConfig {
        self.backend.clone()
    }

    fn image_domains(&self) -> Vec<ImageDomain> {
        self.image_domains.clone()
    }
}
