//! Domain Layer

pub mod entities;
pub mod repository;
pub mod value_objects;

pub use entities::{Paper, Question, QuestionChanges};
pub use repository::{LocalQuizRepository, QuizRepository};
pub use value_objects::Title;
