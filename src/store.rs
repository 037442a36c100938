use std::fmt;

use chrono::{DateTime, Utc};

use crate::error::NavigationError;
use crate::models::{Course, CourseId, Material, Week, WeekId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Courses,
    Weeks,
    Materials,
}

impl Level {
    pub fn noun(self) -> &'static str {
        match self {
            Level::Courses => "courses",
            Level::Weeks => "weeks",
            Level::Materials => "materials",
        }
    }

    fn failure_message(self) -> &'static str {
        match self {
            Level::Courses => "Failed to load courses. Please try again later.",
            Level::Weeks => "Failed to load course weeks. Please try again later.",
            Level::Materials => "Failed to load course materials. Please try again later.",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.noun())
    }
}

/// The (course, week) pair identifying where the user is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SelectionPath {
    pub course: Option<CourseId>,
    pub week: Option<WeekId>,
}

impl SelectionPath {
    /// Whether data fetched for `level` under `self` still belongs at `current`.
    pub fn same_scope(&self, current: &SelectionPath, level: Level) -> bool {
        match level {
            Level::Courses => true,
            Level::Weeks => self.course == current.course,
            Level::Materials => self == current,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(String),
}

impl LoadStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadStatus::Loading)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, LoadStatus::Failed(_))
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadStatus::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// One level's collection. Items are only ever replaced as a whole.
#[derive(Debug, Clone)]
pub struct LevelSlot<T> {
    items: Vec<T>,
    status: LoadStatus,
    fetched_at: Option<DateTime<Utc>>,
}

impl<T> Default for LevelSlot<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            status: LoadStatus::Idle,
            fetched_at: None,
        }
    }
}

impl<T> LevelSlot<T> {
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    /// When the current items arrived; `None` unless the slot is ready.
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    fn clear(&mut self) {
        *self = Self::default();
    }

    fn begin_loading(&mut self) {
        self.items.clear();
        self.status = LoadStatus::Loading;
        self.fetched_at = None;
    }

    fn fill(&mut self, items: Vec<T>) {
        self.items = items;
        self.status = LoadStatus::Ready;
        self.fetched_at = Some(Utc::now());
    }

    fn fail(&mut self, message: String) {
        self.items.clear();
        self.status = LoadStatus::Failed(message);
        self.fetched_at = None;
    }
}

/// Holds what is known about each level and the current selection path.
///
/// Selection changes clear every descendant level right away, so a level never shows
/// records fetched for a different parent.
#[derive(Debug, Clone, Default)]
pub struct HierarchyStore {
    courses: LevelSlot<Course>,
    weeks: LevelSlot<Week>,
    materials: LevelSlot<Material>,
    selected_course: Option<Course>,
    selected_week: Option<Week>,
}

impl HierarchyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn courses(&self) -> &LevelSlot<Course> {
        &self.courses
    }

    pub fn weeks(&self) -> &LevelSlot<Week> {
        &self.weeks
    }

    pub fn materials(&self) -> &LevelSlot<Material> {
        &self.materials
    }

    pub fn selected_course(&self) -> Option<&Course> {
        self.selected_course.as_ref()
    }

    pub fn selected_week(&self) -> Option<&Week> {
        self.selected_week.as_ref()
    }

    pub fn path(&self) -> SelectionPath {
        SelectionPath {
            course: self.selected_course.as_ref().map(|c| c.id),
            week: self.selected_week.as_ref().map(|w| w.id),
        }
    }

    pub fn status(&self, level: Level) -> &LoadStatus {
        match level {
            Level::Courses => self.courses.status(),
            Level::Weeks => self.weeks.status(),
            Level::Materials => self.materials.status(),
        }
    }

    pub fn set_courses(&mut self, courses: Vec<Course>) {
        self.courses.fill(courses);
    }

    /// Stores weeks ordered by `week_number`; ties keep the order they arrived in.
    pub fn set_weeks(&mut self, mut weeks: Vec<Week>) {
        weeks.sort_by_key(|w| w.week_number);
        self.weeks.fill(weeks);
    }

    pub fn set_materials(&mut self, materials: Vec<Material>) {
        self.materials.fill(materials);
    }

    pub fn select_course(&mut self, course: Option<Course>) {
        self.selected_course = course;
        self.selected_week = None;
        self.weeks.clear();
        self.materials.clear();
    }

    pub fn select_week(&mut self, week: Option<Week>) -> Result<(), NavigationError> {
        if let Some(week) = &week {
            let course = self
                .selected_course
                .as_ref()
                .ok_or(NavigationError::NoCourseSelected)?;
            if week.course_id != course.id {
                return Err(NavigationError::ForeignWeek {
                    week_id: week.id,
                    owner: week.course_id,
                    selected: course.id,
                });
            }
        }
        self.selected_week = week;
        self.materials.clear();
        Ok(())
    }

    pub(crate) fn begin_loading(&mut self, level: Level) {
        match level {
            Level::Courses => self.courses.begin_loading(),
            Level::Weeks => self.weeks.begin_loading(),
            Level::Materials => self.materials.begin_loading(),
        }
    }

    pub(crate) fn fail(&mut self, level: Level) {
        let message = level.failure_message().to_string();
        match level {
            Level::Courses => self.courses.fail(message),
            Level::Weeks => self.weeks.fail(message),
            Level::Materials => self.materials.fail(message),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.courses.status().is_loading()
            || self.weeks.status().is_loading()
            || self.materials.status().is_loading()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(id: CourseId) -> Course {
        Course {
            id,
            title: format!("Course {}", id),
            description: None,
            lecturer_id: 1,
            created_at: "2024-01-01T00:00:00".to_string(),
            updated_at: "2024-01-01T00:00:00".to_string(),
        }
    }

    fn week(id: WeekId, course_id: CourseId, week_number: i32) -> Week {
        Week {
            id,
            course_id,
            title: format!("W{}", week_number),
            description: None,
            week_number,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn set_weeks_sorts_stably_by_week_number() {
        let mut store = HierarchyStore::new();
        store.select_course(Some(course(1)));
        store.set_weeks(vec![week(10, 1, 2), week(11, 1, 1), week(12, 1, 2), week(13, 1, 1)]);

        let ids: Vec<_> = store.weeks().items().iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![11, 13, 10, 12]);
        assert_eq!(store.weeks().status(), &LoadStatus::Ready);
        assert!(store.weeks().fetched_at().is_some());
    }

    #[test]
    fn selecting_course_clears_descendants() {
        let mut store = HierarchyStore::new();
        store.select_course(Some(course(1)));
        store.set_weeks(vec![week(10, 1, 1)]);
        store.select_week(Some(week(10, 1, 1))).unwrap();
        store.set_materials(Vec::new());

        store.select_course(Some(course(2)));

        assert!(store.weeks().items().is_empty());
        assert_eq!(store.weeks().status(), &LoadStatus::Idle);
        assert_eq!(store.materials().status(), &LoadStatus::Idle);
        assert_eq!(store.path(), SelectionPath { course: Some(2), week: None });
    }

    #[test]
    fn selecting_week_requires_matching_course() {
        let mut store = HierarchyStore::new();
        assert_eq!(
            store.select_week(Some(week(10, 1, 1))),
            Err(NavigationError::NoCourseSelected)
        );

        store.select_course(Some(course(2)));
        assert_eq!(
            store.select_week(Some(week(10, 1, 1))),
            Err(NavigationError::ForeignWeek { week_id: 10, owner: 1, selected: 2 })
        );
        assert_eq!(store.select_week(None), Ok(()));
    }

    #[test]
    fn failure_leaves_level_empty_with_message() {
        let mut store = HierarchyStore::new();
        store.set_courses(vec![course(1)]);
        store.begin_loading(Level::Courses);
        assert!(store.courses().items().is_empty());
        assert!(store.is_loading());

        store.fail(Level::Courses);
        assert!(store.courses().items().is_empty());
        assert_eq!(
            store.courses().status().error(),
            Some("Failed to load courses. Please try again later.")
        );
        assert!(!store.is_loading());
    }

    #[test]
    fn materials_scope_needs_whole_path() {
        let dispatched = SelectionPath { course: Some(1), week: Some(10) };
        let moved = SelectionPath { course: Some(1), week: Some(11) };
        assert!(dispatched.same_scope(&moved, Level::Weeks));
        assert!(!dispatched.same_scope(&moved, Level::Materials));
        assert!(dispatched.same_scope(&SelectionPath::default(), Level::Courses));
    }
}
