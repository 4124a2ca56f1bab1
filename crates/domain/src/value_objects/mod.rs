//! Value objects - Immutable identifiers shared across the domain

mod capability;
mod codename;
mod session_id;

pub use capability::Capability;
pub use codename::Codename;
pub use session_id::SessionId;
