//! `vetcard-auth`: session state, credential refresh and the login flow.
//!
//! Routing decisions live in `vetcard-router`; this crate only answers
//! "who is logged in" and keeps the credentials needed to talk to the backend.

pub mod client;
pub mod login;
pub mod mock;
pub mod refresh;
pub mod session;
pub mod storage;
pub mod transport;

pub use client::{ApiClient, ApiError, decode_response, endpoints};
pub use login::{Credentials, LoginError, LoginService};
pub use mock::MockTransport;
pub use refresh::{RefreshCoordinator, RefreshError};
pub use session::{ActiveSession, SessionStore};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use transport::{ApiRequest, ApiResponse, ApiTransport, HttpTransport, Method};
