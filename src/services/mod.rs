// Service exports
pub mod appwrite;
pub mod catalog;
pub mod guard;

pub use appwrite::{AppwriteClient, AppwriteCollections, GatewayError, ProfileOutcome, Session, SessionGateway};
pub use catalog::{Catalog, CatalogError};
pub use guard::{check_session, resolve_access, Rejection};
