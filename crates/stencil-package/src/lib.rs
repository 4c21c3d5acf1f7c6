pub mod package;

pub use package::{Package, PackageOptions};
