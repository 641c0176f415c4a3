//! Role taxonomy: stored labels to canonical roles.

pub mod aliases;

pub use aliases::RoleAliasTable;
