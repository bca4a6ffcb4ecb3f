//! `vetcard-core`: identity primitives shared by the session and routing crates.
//!
//! Pure types only: no IO, no async.

pub mod error;
pub mod id;
pub mod principal;
pub mod role;
pub mod session;

pub use error::{CoreError, CoreResult};
pub use id::PrincipalId;
pub use principal::{Principal, Profile, TokenPair};
pub use role::{Role, RoleSet};
pub use session::SessionSnapshot;
