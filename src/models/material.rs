use serde::{Deserialize, Serialize};

use super::week::WeekId;

pub type MaterialId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: MaterialId,
    pub week_id: WeekId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub material_type: MaterialKind,
    /// URL or drive file reference.
    pub content: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Material {
    /// Links open in the browser; everything else is treated as a stored file.
    pub fn opens_externally(&self) -> bool {
        matches!(self.material_type, MaterialKind::Link)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MaterialKind {
    Link,
    DriveFile,
    Other(String),
}

impl MaterialKind {
    pub fn as_str(&self) -> &str {
        match self {
            MaterialKind::Link => "link",
            MaterialKind::DriveFile => "drive-file",
            MaterialKind::Other(tag) => tag,
        }
    }
}

impl From<String> for MaterialKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "link" => MaterialKind::Link,
            "drive-file" | "drive_file" => MaterialKind::DriveFile,
            _ => MaterialKind::Other(tag),
        }
    }
}

impl From<MaterialKind> for String {
    fn from(kind: MaterialKind) -> Self {
        match kind {
            MaterialKind::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}
