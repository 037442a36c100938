//! What to show, derived from a [`BrowserSnapshot`]. Holds no state of its own.

use crate::filter::filter;
use crate::models::{Course, Material, Week};
use crate::navigator::{BrowseState, BrowserSnapshot};
use crate::store::{Level, LoadStatus};

#[derive(Debug, Clone, PartialEq)]
pub enum Listing<'a> {
    Courses(Vec<&'a Course>),
    Weeks {
        course: &'a Course,
        weeks: Vec<&'a Week>,
    },
    Materials {
        course: &'a Course,
        week: &'a Week,
        materials: Vec<&'a Material>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct View<'a> {
    pub listing: Listing<'a>,
    pub status: &'a LoadStatus,
    pub query: &'a str,
}

/// Message shown in place of, or above, the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice<'a> {
    Loading,
    Error(&'a str),
    Empty {
        headline: &'static str,
        hint: &'static str,
    },
}

/// Deepest selected level wins: materials, then weeks, then courses.
pub fn select_view(snapshot: &BrowserSnapshot) -> View<'_> {
    let store = snapshot.store();
    let query = snapshot.query();

    let (listing, status) = match snapshot.state() {
        BrowseState::Materials(course, week) => (
            Listing::Materials {
                course,
                week,
                materials: filter(store.materials().items(), query),
            },
            store.materials().status(),
        ),
        BrowseState::Weeks(course) => (
            Listing::Weeks {
                course,
                weeks: filter(store.weeks().items(), query),
            },
            store.weeks().status(),
        ),
        BrowseState::Starting | BrowseState::Courses => (
            Listing::Courses(filter(store.courses().items(), query)),
            store.courses().status(),
        ),
    };

    View {
        listing,
        status,
        query,
    }
}

impl<'a> View<'a> {
    pub fn level(&self) -> Level {
        match self.listing {
            Listing::Courses(_) => Level::Courses,
            Listing::Weeks { .. } => Level::Weeks,
            Listing::Materials { .. } => Level::Materials,
        }
    }

    pub fn len(&self) -> usize {
        match &self.listing {
            Listing::Courses(courses) => courses.len(),
            Listing::Weeks { weeks, .. } => weeks.len(),
            Listing::Materials { materials, .. } => materials.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn titles(&self) -> Vec<&'a str> {
        match &self.listing {
            Listing::Courses(courses) => courses.iter().map(|c| c.title.as_str()).collect(),
            Listing::Weeks { weeks, .. } => weeks.iter().map(|w| w.title.as_str()).collect(),
            Listing::Materials { materials, .. } => {
                materials.iter().map(|m| m.title.as_str()).collect()
            }
        }
    }

    pub fn error(&self) -> Option<&'a str> {
        self.status.error()
    }

    /// Titles along the selection path, e.g. `["Algebra", "W1"]`.
    pub fn breadcrumbs(&self) -> Vec<&'a str> {
        match &self.listing {
            Listing::Courses(_) => Vec::new(),
            Listing::Weeks { course, .. } => vec![course.title.as_str()],
            Listing::Materials { course, week, .. } => {
                vec![course.title.as_str(), week.title.as_str()]
            }
        }
    }

    pub fn notice(&self) -> Option<Notice<'a>> {
        if let Some(message) = self.error() {
            return Some(Notice::Error(message));
        }
        if !self.is_empty() {
            return None;
        }
        if self.status.is_loading() {
            return Some(Notice::Loading);
        }

        let searching = !self.query.is_empty();
        let (headline, idle_hint) = match self.level() {
            Level::Courses => ("No courses found", "You are not enrolled in any courses yet."),
            Level::Weeks => (
                "No weeks found",
                "No weeks have been added to this course yet.",
            ),
            Level::Materials => (
                "No materials found",
                "No materials have been added to this week yet.",
            ),
        };
        let hint = if searching {
            "Try a different search term."
        } else {
            idle_hint
        };
        Some(Notice::Empty { headline, hint })
    }
}
