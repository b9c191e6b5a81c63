//! Favorites REST endpoint
//!
//! The server side of server-mode favorites. Mounted under `/api/favorites`:
//!
//! - `GET /` lists every favorite, oldest first
//! - `POST /` creates one from `{title, author, previewLink?, imageUrl?}` and
//!   returns it with its assigned id
//! - `DELETE /:id` removes one
//!
//! Responses wrap payloads as `{"data": ...}` and failures as `{"error": ...}`.

mod handler;
mod routes;

pub use handler::CreateFavorite;
pub use routes::routes;
