pub mod provider;
pub mod session;

pub use provider::{AuthProvider, AuthProviderError};
pub use session::resolve_session;
