//! Infrastructure layer for the Simmer cache coordination layer
//!
//! Sits between request handlers and the primary data store:
//!
//! - [`cache::SafeCache`] — failure-isolated cache access; callers never
//!   handle cache errors
//! - [`cache::CacheInvalidator`] — the collaborator-facing invalidation
//!   interface
//! - [`cache::ReadThrough`] — opt-in response caching keyed by a static
//!   route policy table
//! - [`sync::SyncChannel`] — cross-instance invalidation broadcast
//! - [`config`] — figment-based configuration loading
//! - [`logging`] — tracing subscriber setup
//!
//! [`bootstrap::CacheLayer`] wires it all together from an `AppConfig`
//! and owns the explicit shutdown path.

pub mod bootstrap;
pub mod cache;
pub mod config;
pub mod constants;
pub mod logging;
pub mod sync;
