pub mod api;
pub mod error;
pub mod render;
pub mod session;
pub mod storage;

pub use api::ForumClient;
pub use error::ClientError;
pub use render::ForumContext;
pub use storage::LocalStorage;
