pub mod package_linker;
pub mod path_resolver;
pub mod store_manager;

pub use package_linker::PackageLinker;
pub use path_resolver::PathResolver;
pub use store_manager::StoreManager;

pub use package_linker::link_package;
pub use path_resolver::cache_path_for;
pub use store_manager::store_package;
