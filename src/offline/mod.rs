//! Offline cache controller for the site's progressive web app.
//!
//! The controller sits between the page and the network. Platform events
//! (install, activate, fetch, push, notification click) are delivered by
//! whatever hosts it through the methods on [`OfflineCacheController`]:
//!
//! - API requests always go to the network.
//! - HTML navigations are network-first with a cached or shell fallback.
//! - Everything else is cache-first.
//!
//! Cache generations are named after the deployed version; activating a new
//! version deletes every generation that does not belong to it.

mod controller;
mod http;
mod policy;
mod push;
mod storage;

pub use controller::*;
pub use http::*;
pub use policy::*;
pub use push::*;
pub use storage::*;
