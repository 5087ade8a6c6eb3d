//! # Proxenos Discovery
//!
//! Discovery resolution and action URL construction for the Proxenos WOPI
//! host.
//!
//! The editor vendor publishes a discovery document describing which URL
//! template and file extensions each application supports. This crate
//! fetches and parses that document once per [`DiscoveryResolver`] instance,
//! indexes it for fast `(action, extension)` lookups, and constructs the
//! session URLs browsers navigate to:
//!
//! - [`DiscoveryResolver`] - Init-once fetch/parse with concurrent callers
//!   awaiting a single in-flight fetch
//! - [`DiscoveryIndex`] - `(action, extension)` lookup table, first-seen wins
//! - [`build_action_url`] - Session URL construction from a template

#![doc(html_root_url = "https://docs.rs/proxenos-discovery/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod document;
mod error;
mod index;
mod resolver;
mod url;

pub use document::{ActionEntry, AppEntry, DiscoveryDocument};
pub use error::{DiscoveryError, DiscoveryResult};
pub use index::{Action, ActionName, Application, DiscoveryIndex};
pub use resolver::{DiscoveryFetcher, DiscoveryResolver, HttpDiscoveryFetcher};
pub use url::{build_action_url, map_locale, UrlOptions};
