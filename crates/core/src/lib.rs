//! SplitAlgo client core: session, storage, routing and forms

pub mod error;
pub mod forms;
pub mod identity;
pub mod routes;
pub mod session;
pub mod storage;
pub mod types;

#[cfg(any(test, feature = "tests"))]
pub mod tests;

pub use error::{CoreError, CoreResult};
pub use forms::{FormState, LoginForm, RegisterForm, ValidationError};
pub use identity::{CredentialOutcome, ExternalCredential, IdentityProvider};
pub use routes::{Access, GuardState, Redirect, Route, RouteGuard, check_access};
pub use session::{AuthorizedSession, Session, SessionCheck, TokenStore};
pub use storage::{FileStorage, MemoryStorage, Storage};
