//! Shared process plumbing.
//!
//! - [`config`]: [`Config`], settings common to both process types;
//! - [`lifecycle`]: the `Stopped`/`Running` state machine, timer ownership and
//!   notification publishing used by every arrival process.

mod config;
pub(crate) mod lifecycle;

pub use config::Config;
