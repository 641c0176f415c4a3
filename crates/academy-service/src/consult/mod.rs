//! Peer-to-peer consult messaging.

pub mod service;

pub use service::ConsultService;
