//! Scoutline client side
//!
//! Typed API client, admin table state, registration wizard, upload progress,
//! translation fallbacks, and the small web server that republishes SEO
//! metadata.

#![forbid(unsafe_code)]

pub mod admin_table;
pub mod api_client;
pub mod i18n;
pub mod routes;
pub mod seo;
pub mod server;
pub mod state;
pub mod upload;
pub mod wizard;

pub use api_client::{ApiClient, ClientError, Environment, Session};
pub use server::build_app;
pub use state::WebState;
