//! Editing sessions for pagewright pages
//!
//! An [`EditingSession`] loads one page through a
//! [`PageRepository`](pagewright_repository::PageRepository), applies
//! section-level edits to a private copy and commits it back:
//!
//! ```text
//! Loading -> Ready <-> Dirty -> Saving -> Ready
//!                                  \-> Error -> Dirty
//! Loading -> LoadFailed
//! ```
//!
//! Saves are last-write-wins. The session bumps nothing itself; the
//! content source assigns revisions and the session adopts whatever
//! canonical page the repository returns.

pub mod error;
pub mod operation;
pub mod session;
pub mod state;

pub use error::{Result, SessionError};
pub use operation::{EditOperation, EditOutcome};
pub use session::EditingSession;
pub use state::SessionState;
