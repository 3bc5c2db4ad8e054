//! Application services behind the inbound ports

pub mod authorization;
pub mod family;

pub use authorization::{AllowAllAuthorizer, RoleAuthorizer};
pub use family::FamilyServiceImpl;
