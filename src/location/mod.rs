//! Company coordinate resolution with a three-tier lookup.
//!
//! Lookups go in-process cache → persistent store → geocoding service. Every outcome,
//! including failures, is written back to both cache tiers so a company is geocoded at most
//! once per run.

mod cache;
mod record;
mod resolver;
mod status;


pub use cache::LocationCache;
pub use record::LocationRecord;
pub use resolver::LocationResolver;
pub use status::LocationStatus;
