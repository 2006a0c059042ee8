//! Backend providers for the Simmer cache layer
//!
//! Implementations of the `simmer-domain` ports:
//!
//! - [`cache`] — Redis (distributed), Moka (in-process fallback), and
//!   Null cache backends
//! - [`sync`] — Redis pub/sub, in-process broadcast, and Null sync
//!   transports

pub mod cache;
pub mod sync;
