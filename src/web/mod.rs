//! Browser-facing pages and form actions.
//!
//! `GET /` renders the page; the form posts below run one controller action
//! each and redirect back to `/`, carrying the current query along so the
//! search results stay on screen.

mod handler;
mod routes;

pub use routes::routes;
