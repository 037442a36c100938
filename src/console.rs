//! Line-oriented front end: parses user commands and renders a [`View`] as text.

use std::fmt::Write;

use crate::models::Material;
use crate::view::{Listing, Notice, View};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// One-based position in the visible list.
    Open(usize),
    Back,
    Search(String),
    ClearSearch,
    Reload,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word {
            "open" | "o" => rest
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .map(Command::Open)
                .ok_or_else(|| format!("expected a position after 'open', got '{}'", rest)),
            "back" | "b" => Ok(Command::Back),
            "search" | "s" | "/" => Ok(Command::Search(rest.to_string())),
            "clear" => Ok(Command::ClearSearch),
            "reload" | "r" => Ok(Command::Reload),
            "help" | "?" => Ok(Command::Help),
            "quit" | "q" | "exit" => Ok(Command::Quit),
            other => match other.parse::<usize>() {
                Ok(n) if n > 0 && rest.is_empty() => Ok(Command::Open(n)),
                _ => Err(format!("unknown command '{}'", other)),
            },
        }
    }
}

pub const HELP: &str = "\
commands:
  open <n> | <n>     open the n-th item
  back               go up one level
  search <text>      filter the current list
  clear              clear the search
  reload             fetch the current level again
  quit";

const NO_DESCRIPTION: &str = "No description available";

fn material_line(material: &Material) -> String {
    let tag = if material.opens_externally() { "link" } else { "file" };
    let description = material.description.as_deref().unwrap_or(NO_DESCRIPTION);
    format!(
        "[{}] {} - {} <{}>",
        tag, material.title, description, material.content
    )
}

pub fn render(view: &View<'_>) -> String {
    let mut out = String::new();

    let crumbs = view.breadcrumbs();
    if crumbs.is_empty() {
        let _ = writeln!(out, "== Courses ==");
    } else {
        let _ = writeln!(out, "== {} ==", crumbs.join(" › "));
    }
    if !view.query.is_empty() {
        let _ = writeln!(out, "search: \"{}\"", view.query);
    }

    match view.notice() {
        Some(Notice::Loading) => {
            let _ = writeln!(out, "loading {}...", view.level());
        }
        Some(Notice::Error(message)) => {
            let _ = writeln!(out, "error: {}", message);
        }
        Some(Notice::Empty { headline, hint }) => {
            let _ = writeln!(out, "{}. {}", headline, hint);
        }
        None => {}
    }

    match &view.listing {
        Listing::Courses(courses) => {
            for (i, course) in courses.iter().enumerate() {
                let description = course.description.as_deref().unwrap_or(NO_DESCRIPTION);
                let _ = writeln!(out, "{:>3}. {} - {}", i + 1, course.title, description);
            }
        }
        Listing::Weeks { weeks, .. } => {
            for (i, week) in weeks.iter().enumerate() {
                let description = week.description.as_deref().unwrap_or(NO_DESCRIPTION);
                let _ = writeln!(out, "{:>3}. {} - {}", i + 1, week.title, description);
            }
        }
        Listing::Materials { materials, .. } => {
            for (i, material) in materials.iter().enumerate() {
                let _ = writeln!(out, "{:>3}. {}", i + 1, material_line(material));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::Catalog;
    use crate::store::LoadStatus;

    fn catalog() -> Catalog {
        serde_json::from_str(include_str!("../fixtures/catalog.json")).unwrap()
    }

    #[test]
    fn renders_courses_with_description_fallback() {
        let catalog = catalog();
        let status = LoadStatus::Ready;
        let view = View {
            listing: Listing::Courses(catalog.courses.iter().collect()),
            status: &status,
            query: "",
        };

        let text = render(&view);
        assert_eq!(
            text,
            "== Courses ==\n  1. Algebra - Groups, rings and fields\n  2. Biology - No description available\n"
        );
    }

    #[test]
    fn renders_weeks_under_course_breadcrumb() {
        let catalog = catalog();
        let mut week = catalog.weeks[1].clone();
        week.description = None;
        let status = LoadStatus::Ready;
        let view = View {
            listing: Listing::Weeks {
                course: &catalog.courses[0],
                weeks: vec![&week, &catalog.weeks[0]],
            },
            status: &status,
            query: "",
        };

        let text = render(&view);
        assert!(text.starts_with("== Algebra ==\n"));
        assert!(text.contains("  1. W1 - No description available\n"));
        assert!(text.contains("  2. W2 - Subgroups and cosets\n"));
    }

    #[test]
    fn renders_materials_with_error_and_kind_tags() {
        let catalog = catalog();
        let status =
            LoadStatus::Failed("Failed to load course materials. Please try again later.".to_string());
        let mut worksheet = catalog.materials[1].clone();
        worksheet.description = None;
        let view = View {
            listing: Listing::Materials {
                course: &catalog.courses[0],
                week: &catalog.weeks[1],
                materials: vec![&catalog.materials[0], &worksheet],
            },
            status: &status,
            query: "",
        };

        let lines: Vec<String> = render(&view).lines().map(str::to_string).collect();
        assert_eq!(lines[0], "== Algebra › W1 ==");
        assert_eq!(
            lines[1],
            "error: Failed to load course materials. Please try again later."
        );
        assert_eq!(
            lines[2],
            "  1. [link] Intro slides - Lecture one <https://example.com/algebra/w1/slides>"
        );
        assert_eq!(
            lines[3],
            "  2. [file] Worksheet - No description available <drive://algebra/w1/worksheet.pdf>"
        );
    }

    #[test]
    fn empty_search_suggests_another_term() {
        let status = LoadStatus::Ready;
        let view = View {
            listing: Listing::Courses(Vec::new()),
            status: &status,
            query: "zoology",
        };

        assert_eq!(
            render(&view),
            "== Courses ==\nsearch: \"zoology\"\nNo courses found. Try a different search term.\n"
        );
    }

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("open 2"), Ok(Command::Open(2)));
        assert_eq!(Command::parse(" 3 "), Ok(Command::Open(3)));
        assert_eq!(Command::parse("back"), Ok(Command::Back));
        assert_eq!(
            Command::parse("search linear algebra"),
            Ok(Command::Search("linear algebra".to_string()))
        );
        assert_eq!(Command::parse("search"), Ok(Command::Search(String::new())));
        assert_eq!(Command::parse("q"), Ok(Command::Quit));
    }

    #[test]
    fn rejects_bad_positions() {
        assert!(Command::parse("open 0").is_err());
        assert!(Command::parse("open x").is_err());
        assert!(Command::parse("dance").is_err());
    }
}
