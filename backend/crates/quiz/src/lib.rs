//! Quiz Backend Module
//!
//! Papers owned by an account, and the questions inside them. Every route
//! sits behind `auth`'s access-token middleware; this crate only reads the
//! identity it attaches.
//!
//! Clean Architecture structure:
//! - `domain/` - Paper/Question entities, repository trait
//! - `application/` - Ownership-filtered operations
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, router

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

pub use error::{QuizError, QuizResult};
pub use infra::{InMemoryQuizRepository, PgQuizRepository};
pub use presentation::router::{quiz_router, quiz_router_generic};
