pub mod config;
pub mod logging;

pub mod cache;
pub mod checksum;
pub mod descriptor;
pub mod error;
pub mod fetch;
pub mod resolver;
pub mod url_model;

pub use error::{Failure, NetworkReason};
pub use resolver::{Acquisition, MappingsResolver, ResolverSettings, Source};
