pub mod course;
pub mod material;
pub mod week;

pub use course::{Course, CourseId};
pub use material::{Material, MaterialId, MaterialKind};
pub use week::{Week, WeekId};
