//! porter: request-scoped accessors for config, sessions, routes, auth adapters and
//! versioned front-end assets.
//!
//! An [`Application`] owns the application-scoped services (config, container and
//! asset manifests). Each request gets an [`AppContext`] built from the application,
//! the [`Request`], a [`UrlBuilder`], its [`Session`] and a [`Gatekeeper`].

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

pub use app::{AppContext, Application, ApplicationBuilder, Container};
pub use domain::{
    AppError, AssetManifests, Config, Cookies, Gatekeeper, Headers, Language, LoginStatus,
    Request, Route, Routes, Session, Signer, UrlBuilder, User,
};
