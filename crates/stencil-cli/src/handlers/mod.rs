pub mod cache;
pub mod init;

pub use cache::CacheHandler;
pub use init::InitHandler;
