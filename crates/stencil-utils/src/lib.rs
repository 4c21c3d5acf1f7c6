pub mod name_utils;
pub mod package_spec;
pub mod path_utils;

pub use name_utils::*;
pub use package_spec::parse_pkg_spec;
pub use path_utils::*;
