use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::path_resolver::PathResolver;

pub struct StoreManager;

impl StoreManager {
    /// Extracts a gzipped package tarball into the cache entry for
    /// `package_name@version` under `store_dir`.
    ///
    /// The archive is unpacked into a temporary directory next to the entry
    /// and renamed into place, so the entry either appears complete or not
    /// at all. An entry that already exists is left untouched.
    pub fn store_package(
        store_dir: &Path,
        package_name: &str,
        version: &str,
        tarball_bytes: &[u8],
    ) -> io::Result<PathBuf> {
        let path = PathResolver::cache_path_for(store_dir, package_name, version);

        if path.exists() {
            return Ok(path);
        }

        let parent = path.parent().unwrap_or(store_dir);
        fs::create_dir_all(parent)?;

        let temp_dir = tempfile::Builder::new()
            .prefix(".stencil-tmp-")
            .tempdir_in(parent)?;
        let extracted = Self::extract_tarball(temp_dir.path(), tarball_bytes)?;

        Self::move_into_place(&extracted, path)
    }

    fn move_into_place(extracted: &Path, path: PathBuf) -> io::Result<PathBuf> {
        match fs::rename(extracted, &path) {
            Ok(()) => Ok(path),
            // Another process finished the same entry first.
            Err(_) if path.exists() => Ok(path),
            Err(e) => Err(e),
        }
    }

    /// Unpacks the archive and returns the directory holding the package files.
    fn extract_tarball(temp_dir: &Path, tarball_bytes: &[u8]) -> io::Result<PathBuf> {
        let unpack_dir = temp_dir.join("unpack");
        fs::create_dir_all(&unpack_dir)?;

        let tar = flate2::read::GzDecoder::new(tarball_bytes);
        let mut archive = tar::Archive::new(tar);
        archive.unpack(&unpack_dir)?;

        let entries: Vec<_> = fs::read_dir(&unpack_dir)?.collect::<Result<Vec<_>, _>>()?;

        // npm tarballs wrap everything in a single `package/` directory.
        match entries.as_slice() {
            [single] if single.file_type()?.is_dir() => Ok(single.path()),
            [] => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "package tarball is empty",
            )),
            _ => Ok(unpack_dir),
        }
    }
}

pub fn store_package(
    store_dir: &Path,
    package_name: &str,
    version: &str,
    tarball_bytes: &[u8],
) -> io::Result<PathBuf> {
    StoreManager::store_package(store_dir, package_name, version, tarball_bytes)
}
