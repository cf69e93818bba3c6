pub mod agent;
pub mod domain;
pub mod time;

pub mod config {
    use anyhow::Context;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub vercel_url: Option<String>,
        pub public_url: Option<String>,
        pub analysis_backend_url: Option<String>,
        pub analysis_backend_api_key: Option<String>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                vercel_url: std::env::var("VERCEL_URL").ok(),
                public_url: std::env::var("NEXT_PUBLIC_URL").ok(),
                analysis_backend_url: std::env::var("ANALYSIS_BACKEND_URL").ok(),
                analysis_backend_api_key: std::env::var("ANALYSIS_BACKEND_API_KEY").ok(),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            })
        }

        pub fn require_analysis_backend_url(&self) -> anyhow::Result<&str> {
            self.analysis_backend_url
                .as_deref()
                .context("ANALYSIS_BACKEND_URL is required")
        }

        /// Origins allowed to call the API from a browser: local dev frontends
        /// plus whatever deployment URLs the environment advertises.
        pub fn allowed_origins(&self) -> Vec<String> {
            let mut origins = vec![
                "http://localhost:3000".to_string(),
                "http://localhost:3001".to_string(),
            ];
            if let Some(url) = self.vercel_url.as_deref().filter(|s| !s.is_empty()) {
                origins.push(url.to_string());
            }
            if let Some(url) = self.public_url.as_deref().filter(|s| !s.is_empty()) {
                origins.push(format!("https://{url}"));
            }
            origins
        }
    }

}
