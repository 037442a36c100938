use std::sync::Arc;

use tracing::{info, warn};

use crate::error::FetchError;
use crate::gateway::{CatalogGateway, CredentialProvider};
use crate::models::{Course, CourseId, Material, Week, WeekId};
use crate::store::{Level, SelectionPath};

/// Tag captured when a fetch is dispatched. An outcome is applied only if its ticket is
/// still the one the navigator holds for that level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchTicket {
    pub level: Level,
    pub generation: u64,
    pub path: SelectionPath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchTarget {
    Courses,
    Weeks(CourseId),
    Materials(WeekId),
}

impl FetchTarget {
    pub fn level(self) -> Level {
        match self {
            FetchTarget::Courses => Level::Courses,
            FetchTarget::Weeks(_) => Level::Weeks,
            FetchTarget::Materials(_) => Level::Materials,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    pub ticket: FetchTicket,
    pub target: FetchTarget,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Fetched {
    Courses(Vec<Course>),
    Weeks(Vec<Week>),
    Materials(Vec<Material>),
}

impl Fetched {
    pub fn level(&self) -> Level {
        match self {
            Fetched::Courses(_) => Level::Courses,
            Fetched::Weeks(_) => Level::Weeks,
            Fetched::Materials(_) => Level::Materials,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Fetched::Courses(items) => items.len(),
            Fetched::Weeks(items) => items.len(),
            Fetched::Materials(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug)]
pub struct FetchOutcome {
    pub ticket: FetchTicket,
    pub result: Result<Fetched, FetchError>,
}

/// Runs fetch requests against the gateway with the session credential.
///
/// Holds no navigation state, so clones can be moved into spawned tasks.
#[derive(Clone)]
pub struct FetchService {
    gateway: Arc<dyn CatalogGateway>,
    credentials: Arc<dyn CredentialProvider>,
}

impl FetchService {
    pub fn new(gateway: Arc<dyn CatalogGateway>, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            gateway,
            credentials,
        }
    }

    pub async fn execute(&self, request: FetchRequest) -> FetchOutcome {
        let credential = self.credentials.credential();
        let credential = credential.as_ref();

        info!("Fetching {:?} (generation {})", request.target, request.ticket.generation);

        let result = match request.target {
            FetchTarget::Courses => self
                .gateway
                .fetch_courses(credential)
                .await
                .map(Fetched::Courses),
            FetchTarget::Weeks(course_id) => self
                .gateway
                .fetch_weeks(course_id, credential)
                .await
                .map(Fetched::Weeks),
            FetchTarget::Materials(week_id) => self
                .gateway
                .fetch_materials(week_id, credential)
                .await
                .map(Fetched::Materials),
        };

        match &result {
            Ok(fetched) => info!("Fetched {} {}", fetched.len(), request.target.level()),
            Err(e) => warn!("Fetching {:?} failed: {}", request.target, e),
        }

        FetchOutcome {
            ticket: request.ticket,
            result,
        }
    }
}
