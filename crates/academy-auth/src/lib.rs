//! # academy-auth
//!
//! Authentication and authorization for the Academy back office.
//!
//! ## Modules
//!
//! - `jwt` — signed session token creation and verification
//! - `session` — single-session-per-account lifecycle (issue, resolve, revoke)
//! - `rbac` — stored role label normalization onto canonical roles
//! - `guard` — composable role-tier checks over a live session
//! - `scope` — the subject sets an actor may act upon
//! - `password` — Argon2id hashing and password policy

pub mod guard;
pub mod jwt;
pub mod password;
pub mod rbac;
pub mod scope;
pub mod session;

pub use guard::{Actor, Guard, GuardContext};
pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::{PasswordHasher, PasswordValidator};
pub use rbac::RoleAliasTable;
pub use scope::{Scope, ScopeHelper, ScopeResolver};
pub use session::{IssuedSession, SessionCookie, SessionManager};
