#![deny(unsafe_code)]

pub mod error;
pub mod requests;
pub mod session;

pub use error::{Result, SessionError};
pub use requests::{RequestId, RequestTracker};
pub use session::{AuthoringSession, Draft, ProjectAction};
