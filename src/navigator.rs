//! Fetch-on-select state machine over the course hierarchy.
//!
//! Transitions are synchronous: they update the store and hand back a [`FetchRequest`]
//! when a level needs data. The caller runs the request (see
//! [`FetchService`](crate::services::FetchService) and
//! [`FetchDispatcher`](crate::services::FetchDispatcher)) and feeds the outcome back
//! through [`Navigator::apply`], which drops it unless its ticket is still current.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::NavigationError;
use crate::filter;
use crate::gateway::{CatalogGateway, CredentialProvider};
use crate::models::{Course, Week};
use crate::services::{FetchOutcome, FetchRequest, FetchService, FetchTarget, FetchTicket, Fetched};
use crate::store::{HierarchyStore, Level};
use crate::view::{self, View};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BrowseState<'a> {
    /// Initial course fetch not resolved yet.
    Starting,
    Courses,
    Weeks(&'a Course),
    Materials(&'a Course, &'a Week),
}

/// Immutable picture of the browser at one point in time.
#[derive(Debug, Clone, Default)]
pub struct BrowserSnapshot {
    store: HierarchyStore,
    query: String,
    started: bool,
}

impl BrowserSnapshot {
    pub fn store(&self) -> &HierarchyStore {
        &self.store
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn state(&self) -> BrowseState<'_> {
        match (self.store.selected_course(), self.store.selected_week()) {
            (Some(course), Some(week)) => BrowseState::Materials(course, week),
            (Some(course), None) => BrowseState::Weeks(course),
            (None, _) if !self.started => BrowseState::Starting,
            (None, _) => BrowseState::Courses,
        }
    }

    pub fn view(&self) -> View<'_> {
        view::select_view(self)
    }

    pub fn is_loading(&self) -> bool {
        self.store.is_loading()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Applied,
    Stale,
}

#[derive(Debug, Default)]
struct InFlight {
    courses: Option<FetchTicket>,
    weeks: Option<FetchTicket>,
    materials: Option<FetchTicket>,
}

impl InFlight {
    fn slot(&mut self, level: Level) -> &mut Option<FetchTicket> {
        match level {
            Level::Courses => &mut self.courses,
            Level::Weeks => &mut self.weeks,
            Level::Materials => &mut self.materials,
        }
    }
}

pub struct Navigator {
    fetches: FetchService,
    snapshot: Arc<BrowserSnapshot>,
    in_flight: InFlight,
    generation: u64,
}

impl Navigator {
    pub fn new(gateway: Arc<dyn CatalogGateway>, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            fetches: FetchService::new(gateway, credentials),
            snapshot: Arc::new(BrowserSnapshot::default()),
            in_flight: InFlight::default(),
            generation: 0,
        }
    }

    pub fn fetch_service(&self) -> FetchService {
        self.fetches.clone()
    }

    /// Cheap handle on the current state. Later transitions never modify it.
    pub fn snapshot(&self) -> Arc<BrowserSnapshot> {
        Arc::clone(&self.snapshot)
    }

    pub fn state(&self) -> BrowseState<'_> {
        self.snapshot.state()
    }

    pub fn view(&self) -> View<'_> {
        self.snapshot.view()
    }

    fn snapshot_mut(&mut self) -> &mut BrowserSnapshot {
        Arc::make_mut(&mut self.snapshot)
    }

    fn issue(&mut self, target: FetchTarget) -> FetchRequest {
        self.generation += 1;
        let level = target.level();
        let generation = self.generation;

        let snapshot = self.snapshot_mut();
        snapshot.store.begin_loading(level);
        let ticket = FetchTicket {
            level,
            generation,
            path: snapshot.store.path(),
        };

        *self.in_flight.slot(level) = Some(ticket);
        debug!("Issued {:?} as generation {}", target, generation);
        FetchRequest { ticket, target }
    }

    /// Session entry: load the course list.
    pub fn start(&mut self) -> FetchRequest {
        self.issue(FetchTarget::Courses)
    }

    /// Opens a course's week list. Fetches unless this course is already open with
    /// weeks loaded or loading.
    pub fn select_course(&mut self, course: Course) -> Option<FetchRequest> {
        let store = &self.snapshot.store;
        let unchanged = store.selected_course().map(|c| c.id) == Some(course.id);

        if unchanged && !store.weeks().status().is_failed() {
            self.deselect_week();
            return None;
        }

        let course_id = course.id;
        debug!("Selecting course {} ({})", course_id, course.title);
        self.snapshot_mut().store.select_course(Some(course));
        self.in_flight.weeks = None;
        self.in_flight.materials = None;
        Some(self.issue(FetchTarget::Weeks(course_id)))
    }

    /// Back to the course list. Courses are kept; weeks and materials are dropped.
    pub fn deselect_course(&mut self) {
        if self.snapshot.store.selected_course().is_none() {
            return;
        }
        debug!("Back to courses");
        self.snapshot_mut().store.select_course(None);
        self.in_flight.weeks = None;
        self.in_flight.materials = None;
    }

    pub fn select_week(&mut self, week: Week) -> Result<Option<FetchRequest>, NavigationError> {
        let store = &self.snapshot.store;
        let unchanged = store.selected_week().map(|w| w.id) == Some(week.id);

        if unchanged && !store.materials().status().is_failed() {
            return Ok(None);
        }

        let week_id = week.id;
        self.snapshot_mut().store.select_week(Some(week))?;
        debug!("Selected week {}", week_id);
        self.in_flight.materials = None;
        Ok(Some(self.issue(FetchTarget::Materials(week_id))))
    }

    /// Back to the week list of the selected course. Weeks are kept.
    pub fn deselect_week(&mut self) {
        if self.snapshot.store.selected_week().is_none() {
            return;
        }
        debug!("Back to weeks");
        // Clearing a week is always valid.
        let _ = self.snapshot_mut().store.select_week(None);
        self.in_flight.materials = None;
    }

    /// One step up the hierarchy. Returns false when already at the top.
    pub fn back(&mut self) -> bool {
        if self.snapshot.store.selected_week().is_some() {
            self.deselect_week();
            true
        } else if self.snapshot.store.selected_course().is_some() {
            self.deselect_course();
            true
        } else {
            false
        }
    }

    /// Re-fetches the level currently on screen.
    pub fn reload(&mut self) -> FetchRequest {
        let target = match self.state() {
            BrowseState::Starting | BrowseState::Courses => FetchTarget::Courses,
            BrowseState::Weeks(course) => FetchTarget::Weeks(course.id),
            BrowseState::Materials(_, week) => FetchTarget::Materials(week.id),
        };
        self.issue(target)
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if self.snapshot.query != query {
            self.snapshot_mut().query = query;
        }
    }

    pub fn clear_query(&mut self) {
        self.set_query(String::new());
    }

    /// Navigates into the `index`th visible item (zero based) of the course or week
    /// list, after filtering.
    pub fn open(&mut self, index: usize) -> Result<Option<FetchRequest>, NavigationError> {
        let snapshot = Arc::clone(&self.snapshot);
        let store = snapshot.store();
        match snapshot.state() {
            BrowseState::Starting | BrowseState::Courses => {
                let course = filter::filter(store.courses().items(), snapshot.query())
                    .get(index)
                    .map(|c| (*c).clone())
                    .ok_or(NavigationError::NoSuchItem(index))?;
                Ok(self.select_course(course))
            }
            BrowseState::Weeks(_) => {
                let week = filter::filter(store.weeks().items(), snapshot.query())
                    .get(index)
                    .map(|w| (*w).clone())
                    .ok_or(NavigationError::NoSuchItem(index))?;
                self.select_week(week)
            }
            BrowseState::Materials(..) => Err(NavigationError::NoSuchItem(index)),
        }
    }

    /// Applies a finished fetch if it is still the current one for its level.
    pub fn apply(&mut self, outcome: FetchOutcome) -> Applied {
        let ticket = outcome.ticket;
        let level = ticket.level;
        let current_path = self.snapshot.store.path();

        let current = *self.in_flight.slot(level) == Some(ticket);
        if !current || !ticket.path.same_scope(&current_path, level) {
            warn!(
                "Dropping stale {} response (generation {})",
                level, ticket.generation
            );
            return Applied::Stale;
        }

        if let Ok(fetched) = &outcome.result {
            if fetched.level() != level {
                warn!("Dropping {} payload tagged as {}", fetched.level(), level);
                return Applied::Stale;
            }
        }

        *self.in_flight.slot(level) = None;
        let snapshot = self.snapshot_mut();
        match outcome.result {
            Ok(Fetched::Courses(courses)) => snapshot.store.set_courses(courses),
            Ok(Fetched::Weeks(weeks)) => snapshot.store.set_weeks(weeks),
            Ok(Fetched::Materials(materials)) => snapshot.store.set_materials(materials),
            // FetchService already logged the cause.
            Err(_) => snapshot.store.fail(level),
        }
        if level == Level::Courses {
            snapshot.started = true;
        }
        Applied::Applied
    }

    /// Runs `request` to completion on the current task and applies the outcome.
    pub async fn resolve(&mut self, request: FetchRequest) -> Applied {
        let outcome = self.fetches.execute(request).await;
        self.apply(outcome)
    }
}
