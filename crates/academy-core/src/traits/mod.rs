//! Core traits defined in `academy-core` and implemented by other crates.

pub mod clock;

pub use clock::Clock;
