pub mod credentials;
pub mod memory;

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::error;

use crate::error::{AppError, FetchError};
use crate::models::{Course, CourseId, Material, Week, WeekId};

pub use credentials::{Credential, CredentialProvider, StaticCredentials};
pub use memory::{Catalog, MemoryGateway};

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub api_url: String,
    pub api_token: Option<String>,
    pub timeout: Duration,
    pub fixture: Option<PathBuf>,
}

impl GatewayConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key/value source; unset keys fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let api_url = lookup("CATALOG_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let api_token = lookup("CATALOG_TOKEN").filter(|t| !t.is_empty());
        let timeout_secs = match lookup("CATALOG_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                AppError::Config(format!("CATALOG_TIMEOUT_SECS is not a number: {}", raw))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        let fixture = lookup("CATALOG_FIXTURE").map(PathBuf::from);

        Ok(Self {
            api_url,
            api_token,
            timeout: Duration::from_secs(timeout_secs),
            fixture,
        })
    }
}

/// Read-only access to the remote course catalog.
///
/// Implementations own transport concerns (paths, headers, timeouts). The credential is
/// handed in per call and only passed through.
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    async fn fetch_courses(&self, credential: Option<&Credential>) -> Result<Vec<Course>, FetchError>;
    async fn fetch_weeks(
        &self,
        course_id: CourseId,
        credential: Option<&Credential>,
    ) -> Result<Vec<Week>, FetchError>;
    async fn fetch_materials(
        &self,
        week_id: WeekId,
        credential: Option<&Credential>,
    ) -> Result<Vec<Material>, FetchError>;
}

pub struct HttpGateway {
    client: Client,
    api_url: String,
}

impl HttpGateway {
    pub fn new(config: &GatewayConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build http client: {}", e)))?;
        Ok(Self {
            client,
            api_url: config.api_url.clone(),
        })
    }

    pub fn courses_url(&self) -> String {
        format!("{}/courses/", self.api_url)
    }

    pub fn weeks_url(&self, course_id: CourseId) -> String {
        format!("{}/course-weeks/course/{}", self.api_url, course_id)
    }

    pub fn materials_url(&self, week_id: WeekId) -> String {
        format!("{}/course-materials/week/{}", self.api_url, week_id)
    }

    async fn get_collection<T: DeserializeOwned>(
        &self,
        url: &str,
        credential: Option<&Credential>,
    ) -> Result<Vec<T>, FetchError> {
        let credential = credential.ok_or(FetchError::MissingCredential)?;

        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {}", credential.expose()))
            .send()
            .await?;

        let status = response.status();
        let body_text = response.text().await?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: body_text,
            });
        }

        serde_json::from_str::<Vec<T>>(&body_text).map_err(|e| {
            error!("Failed to parse response from {}: {}", url, e);
            FetchError::Decode(e)
        })
    }
}

#[async_trait]
impl CatalogGateway for HttpGateway {
    async fn fetch_courses(&self, credential: Option<&Credential>) -> Result<Vec<Course>, FetchError> {
        self.get_collection(&self.courses_url(), credential).await
    }

    async fn fetch_weeks(
        &self,
        course_id: CourseId,
        credential: Option<&Credential>,
    ) -> Result<Vec<Week>, FetchError> {
        self.get_collection(&self.weeks_url(course_id), credential).await
    }

    async fn fetch_materials(
        &self,
        week_id: WeekId,
        credential: Option<&Credential>,
    ) -> Result<Vec<Material>, FetchError> {
        self.get_collection(&self.materials_url(week_id), credential).await
    }
}
