mod file_session_store;
mod memory_session_store;
mod memory_user_repository;
pub mod session_auth_adapter;

pub use file_session_store::FileSessionStore;
pub use memory_session_store::MemorySessionStore;
pub use memory_user_repository::MemoryUserRepository;
pub use session_auth_adapter::SessionAuthAdapter;
