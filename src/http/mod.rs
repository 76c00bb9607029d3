//! HTTP surface for the hosting UI
//!
//! Exposes the session control operations, read-only session accessors,
//! and the media ingest path through which the external capture widget
//! delivers frames into the process.

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
