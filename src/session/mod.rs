// Authentication lifecycle: credential storage, the session store and access control

pub mod credential;
pub mod guard;
pub mod state;
pub mod store;

pub use credential::{CredentialStorage, FileCredentialStorage, MemoryCredentialStorage};
pub use guard::{AccessDecision, resolve_access};
pub use state::{AuthStatus, AuthenticatedUser, Session};
pub use store::SessionStore;
