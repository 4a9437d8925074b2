mod application;
pub mod cli;
mod container;
mod context;

pub use application::{
    Application, ApplicationBuilder, BASE_URL_KEY, CLEAN_URLS_KEY, DISPLAY_ERRORS_KEY,
    ROUTES_GROUP, SECRET_KEY, SESSION_COOKIE_KEY, SESSION_TTL_KEY,
};
pub use container::Container;
pub use context::{AppContext, TURBO_FRAME_HEADER};
