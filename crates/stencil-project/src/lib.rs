pub mod io;
pub mod package_json;

pub use io::{find_package_dir, read_package_json};
pub use package_json::PackageJson;
