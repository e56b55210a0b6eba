//! # Content-Type Builder Session
//!
//! An undoable schema-editing session. The host constructs a [`Session`],
//! feeds it [`Action`]s one at a time and renders from
//! [`Session::current`].
//!
//! ```rust,ignore
//! use ctb_session::{Action, Session};
//!
//! let mut session = Session::default();
//! session.dispatch(Action::Init(snapshot))?;
//! session.dispatch(Action::Undo)?;
//! ```

pub mod action;
pub mod config;
pub mod history;
pub mod session;
pub mod state;

pub use action::Action;
pub use config::{DEFAULT_HISTORY_LIMIT, SessionConfig};
pub use history::History;
pub use session::Session;
pub use state::SessionState;
