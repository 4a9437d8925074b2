pub mod assets;
pub mod config;
pub mod encoding;
pub mod error;
pub mod gatekeeper;
pub mod request;
pub mod routing;
pub mod session;
pub mod signer;

pub use assets::AssetManifests;
pub use config::Config;
pub use error::AppError;
pub use gatekeeper::{Gatekeeper, LoginStatus, User};
pub use request::{Cookies, Headers, Request};
pub use routing::{Language, Route, Routes, UrlBuilder};
pub use session::Session;
pub use signer::Signer;
