//! versevault-core: data model, store trait, and quiz session logic.
//!
//! This crate defines the verse data model, the `VerseStore` trait that the
//! storage backends implement, and the quiz state machine that the
//! presentation layer drives.

pub mod blanks;
pub mod error;
pub mod model;
pub mod session;
pub mod traits;

pub use error::{QuizError, StoreError};
pub use model::{Backend, FutureVerse, NewVerse, Verse, VerseId};
pub use session::{QuizMode, QuizSession, Traversal};
pub use traits::VerseStore;
