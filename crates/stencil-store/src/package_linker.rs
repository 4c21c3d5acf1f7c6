use std::{fs, io, path::Path};

pub struct PackageLinker;

impl PackageLinker {
    /// Points `<store_dir>/<package_name>` at a cache entry, replacing any
    /// previous link so the plain name always resolves to the newest install.
    pub fn link_package(store_dir: &Path, package_name: &str, cache_path: &Path) -> io::Result<()> {
        let dest = store_dir.join(package_name);

        Self::ensure_parent_directory_exists(&dest)?;
        Self::remove_existing_link(&dest)?;
        Self::create_symlink(cache_path, &dest)?;
        Ok(())
    }

    fn ensure_parent_directory_exists(dest: &Path) -> io::Result<()> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    fn remove_existing_link(dest: &Path) -> io::Result<()> {
        // symlink_metadata so dangling links are found too
        let Ok(metadata) = fs::symlink_metadata(dest) else {
            return Ok(());
        };

        if metadata.file_type().is_symlink() || metadata.is_file() {
            // directory links on windows only go away through remove_dir
            #[cfg(target_family = "windows")]
            if fs::remove_dir(dest).is_ok() {
                return Ok(());
            }
            fs::remove_file(dest)
        } else {
            fs::remove_dir_all(dest)
        }
    }

    fn create_symlink(source: &Path, dest: &Path) -> io::Result<()> {
        #[cfg(target_family = "unix")]
        std::os::unix::fs::symlink(source, dest)?;

        #[cfg(target_family = "windows")]
        std::os::windows::fs::symlink_dir(source, dest)?;

        Ok(())
    }
}

pub fn link_package(store_dir: &Path, package_name: &str, cache_path: &Path) -> io::Result<()> {
    PackageLinker::link_package(store_dir, package_name, cache_path)
}
