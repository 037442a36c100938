use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{CatalogGateway, Credential};
use crate::error::{AppError, FetchError};
use crate::models::{Course, CourseId, Material, Week, WeekId};

/// Whole catalog held in memory, as stored in a JSON fixture.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub weeks: Vec<Week>,
    #[serde(default)]
    pub materials: Vec<Material>,
}

/// Gateway serving a fixed [`Catalog`]. Records come back in fixture order, the way a
/// server would return them unsorted.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    catalog: Catalog,
    fail_courses: bool,
    failing_courses: HashSet<CourseId>,
    failing_weeks: HashSet<WeekId>,
    calls: AtomicUsize,
}

impl MemoryGateway {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    pub fn from_json_file(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)?;
        let catalog: Catalog = serde_json::from_str(&raw)?;
        info!(
            "Loaded catalog fixture {} ({} courses, {} weeks, {} materials)",
            path.display(),
            catalog.courses.len(),
            catalog.weeks.len(),
            catalog.materials.len()
        );
        Ok(Self::new(catalog))
    }

    pub fn failing_courses(mut self) -> Self {
        self.fail_courses = true;
        self
    }

    /// Week fetches for this course fail.
    pub fn failing_weeks_of(mut self, course_id: CourseId) -> Self {
        self.failing_courses.insert(course_id);
        self
    }

    /// Material fetches for this week fail.
    pub fn failing_materials_of(mut self, week_id: WeekId) -> Self {
        self.failing_weeks.insert(week_id);
        self
    }

    /// Number of fetches served so far, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogGateway for MemoryGateway {
    async fn fetch_courses(&self, _credential: Option<&Credential>) -> Result<Vec<Course>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_courses {
            return Err(FetchError::Unavailable("courses".to_string()));
        }
        Ok(self.catalog.courses.clone())
    }

    async fn fetch_weeks(
        &self,
        course_id: CourseId,
        _credential: Option<&Credential>,
    ) -> Result<Vec<Week>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_courses.contains(&course_id) {
            return Err(FetchError::Unavailable(format!("weeks of course {}", course_id)));
        }
        Ok(self
            .catalog
            .weeks
            .iter()
            .filter(|w| w.course_id == course_id)
            .cloned()
            .collect())
    }

    async fn fetch_materials(
        &self,
        week_id: WeekId,
        _credential: Option<&Credential>,
    ) -> Result<Vec<Material>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_weeks.contains(&week_id) {
            return Err(FetchError::Unavailable(format!("materials of week {}", week_id)));
        }
        Ok(self
            .catalog
            .materials
            .iter()
            .filter(|m| m.week_id == week_id)
            .cloned()
            .collect())
    }
}
