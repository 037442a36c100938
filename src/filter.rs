//! Client-side search over the visible level.

use crate::models::{Course, Material, Week};

/// Text fields a search query is matched against.
pub trait Searchable {
    fn title(&self) -> &str;
    fn description(&self) -> Option<&str>;
}

impl Searchable for Course {
    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl Searchable for Week {
    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl Searchable for Material {
    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl<T: Searchable + ?Sized> Searchable for &T {
    fn title(&self) -> &str {
        (**self).title()
    }

    fn description(&self) -> Option<&str> {
        (**self).description()
    }
}

/// Case-insensitive substring match on title or description.
pub fn matches<T: Searchable>(item: &T, query: &str) -> bool {
    let needle = query.to_lowercase();
    matches_lowercase(item, &needle)
}

fn matches_lowercase<T: Searchable>(item: &T, needle: &str) -> bool {
    item.title().to_lowercase().contains(needle)
        || item
            .description()
            .is_some_and(|d| d.to_lowercase().contains(needle))
}

/// Items matching `query`, in their original order. An empty query keeps everything.
pub fn filter<'a, T: Searchable>(items: &'a [T], query: &str) -> Vec<&'a T> {
    if query.is_empty() {
        return items.iter().collect();
    }
    let needle = query.to_lowercase();
    items
        .iter()
        .filter(|item| matches_lowercase(*item, &needle))
        .collect()
}
