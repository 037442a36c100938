use serde::{Deserialize, Serialize};

pub type CourseId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub description: Option<String>,
    pub lecturer_id: i64,
    pub created_at: String,
    pub updated_at: String,
}
