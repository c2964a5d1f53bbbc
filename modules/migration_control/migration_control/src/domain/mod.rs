pub mod error;
pub mod fallback;
pub mod lifecycle;
pub mod payload;
pub mod ports;
pub mod service;
pub mod store;
pub mod traffic;
