mod auth_adapter;
mod session_store;
mod user_repository;

pub use auth_adapter::AuthAdapter;
pub use session_store::{SessionData, SessionStore};
pub use user_repository::UserRepository;
