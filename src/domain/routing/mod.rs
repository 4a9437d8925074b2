//! Named routes and URL generation. Request dispatch is out of scope.

mod routes;
mod url_builder;

pub use routes::{Route, Routes};
pub use url_builder::{Language, UrlBuilder, build_query};
