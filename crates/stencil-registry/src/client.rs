use serde_json::Value;
use std::path::Path;
use std::time::Duration;

use crate::package_info::PackageInfo;
use crate::{PackageSpec, Registry};
use stencil_constants::{MAX_ATTEMPTS, USER_AGENT};
use stencil_error::{Result, StencilError};
use stencil_store::{link_package, store_package};

#[derive(Clone)]
pub struct NpmRegistry {
    client: reqwest::Client,
    registry_url: String,
}

impl NpmRegistry {
    #[must_use]
    pub fn new(registry_url: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .pool_idle_timeout(Duration::from_secs(90))
                .timeout(Duration::from_secs(45))
                .connect_timeout(Duration::from_secs(20))
                .tcp_keepalive(Some(Duration::from_secs(60)))
                .user_agent(USER_AGENT)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            registry_url: registry_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetches the registry document of `name`, retrying transient failures.
    pub async fn fetch_package_info(&self, name: &str) -> Result<PackageInfo> {
        self.fetch_package_info_from(&self.registry_url, name).await
    }

    async fn fetch_package_info_from(&self, registry_url: &str, name: &str) -> Result<PackageInfo> {
        let unavailable = |reason: String| StencilError::RegistryUnavailable(name.to_string(), reason);

        let encoded_name = urlencoding::encode(name);
        let url = format!("{}/{encoded_name}", registry_url.trim_end_matches('/'));

        let mut attempts = 0;

        loop {
            attempts += 1;

            let resp_result = self
                .client
                .get(&url)
                .header("Accept", "application/json")
                .send()
                .await;

            let resp = match resp_result {
                Ok(resp) => resp,
                Err(e) => {
                    if attempts < MAX_ATTEMPTS {
                        let delay = std::cmp::min(1000 * u64::from(attempts), 5000);
                        tokio::time::sleep(Duration::from_millis(delay)).await;
                        continue;
                    }
                    return Err(unavailable(if e.is_timeout() {
                        format!("request timed out after {attempts} attempts")
                    } else if e.is_connect() {
                        format!("connection failed: {e}")
                    } else {
                        format!("network error: {e}")
                    }));
                }
            };

            let resp = match resp.error_for_status() {
                Ok(resp) => resp,
                Err(e) => {
                    if attempts < MAX_ATTEMPTS
                        && matches!(
                            e.status(),
                            Some(
                                reqwest::StatusCode::TOO_MANY_REQUESTS
                                    | reqwest::StatusCode::INTERNAL_SERVER_ERROR
                                    | reqwest::StatusCode::SERVICE_UNAVAILABLE
                            )
                        )
                    {
                        tokio::time::sleep(Duration::from_millis(1000 * u64::from(attempts)))
                            .await;
                        continue;
                    }
                    return Err(unavailable(format!("HTTP error: {e}")));
                }
            };

            let text = match resp.text().await {
                Ok(text) => text,
                Err(e) => {
                    if attempts < MAX_ATTEMPTS {
                        tokio::time::sleep(Duration::from_millis(500 * u64::from(attempts))).await;
                        continue;
                    }
                    return Err(unavailable(format!("failed to read response: {e}")));
                }
            };

            let json: Value = serde_json::from_str(&text).map_err(|e| {
                unavailable(format!(
                    "invalid JSON (response length: {}): {e}",
                    text.len()
                ))
            })?;

            return PackageInfo::from_json(&json)
                .map_err(|e| unavailable(format!("invalid dist-tags: {e}")));
        }
    }

    async fn download_tarball(&self, url: &str) -> std::result::Result<Vec<u8>, String> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| format!("download failed: {e}"))?;

        if !resp.status().is_success() {
            return Err(format!("HTTP {} for {url}", resp.status()));
        }

        resp.bytes()
            .await
            .map(|bytes| bytes.to_vec())
            .map_err(|e| format!("failed to read tarball: {e}"))
    }

    async fn install_one(
        &self,
        registry_url: &str,
        store_dir: &Path,
        pkg: &PackageSpec,
    ) -> Result<()> {
        let failed = |reason: String| StencilError::InstallFailed(pkg.to_string(), reason);

        let info = self
            .fetch_package_info_from(registry_url, &pkg.name)
            .await
            .map_err(|e| failed(e.to_string()))?;
        let tarball_url = tarball_url_for(&info, pkg)?;

        let tarball_bytes = self.download_tarball(&tarball_url).await.map_err(failed)?;

        let cache_path = store_package(store_dir, &pkg.name, &pkg.version, &tarball_bytes)
            .map_err(|e| failed(format!("failed to store package: {e}")))?;
        link_package(store_dir, &pkg.name, &cache_path)
            .map_err(|e| failed(format!("failed to link package: {e}")))?;

        Ok(())
    }
}

fn tarball_url_for(info: &PackageInfo, pkg: &PackageSpec) -> Result<String> {
    info.tarball_url(&pkg.version)
        .map(str::to_string)
        .ok_or_else(|| StencilError::InstallFailed(pkg.to_string(), "version not published".to_string()))
}

impl Registry for NpmRegistry {
    fn registry_url(&self) -> &str {
        &self.registry_url
    }

    async fn latest_version(&self, name: &str) -> Result<String> {
        let info = self.fetch_package_info(name).await?;
        info.latest_version().ok_or_else(|| {
            StencilError::RegistryUnavailable(name.to_string(), "no published versions".to_string())
        })
    }

    async fn install_packages(
        &self,
        root: &Path,
        store_dir: &Path,
        registry_url: &str,
        pkgs: &[PackageSpec],
    ) -> Result<()> {
        for dir in [root, store_dir] {
            std::fs::create_dir_all(dir).map_err(|e| {
                StencilError::InstallFailed(dir.display().to_string(), e.to_string())
            })?;
        }

        for pkg in pkgs {
            self.install_one(registry_url, store_dir, pkg).await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_registry_url_is_normalized() {
        let registry = NpmRegistry::new("https://registry.npmjs.org/");
        assert_eq!(registry.registry_url(), "https://registry.npmjs.org");
    }

    #[test]
    fn test_tarball_url_for_published_version() {
        let info = PackageInfo::from_json(&json!({
            "versions": {
                "2.3.0": { "dist": { "tarball": "https://registry.example.test/tmpl-basic/-/tmpl-basic-2.3.0.tgz" } }
            }
        }))
        .unwrap();

        let url = tarball_url_for(&info, &PackageSpec::new("tmpl-basic", "2.3.0")).unwrap();
        assert!(url.ends_with("tmpl-basic-2.3.0.tgz"));
    }

    #[test]
    fn test_missing_tarball_is_install_failure() {
        let info = PackageInfo::from_json(&json!({
            "versions": { "2.3.0": { "dist": {} } }
        }))
        .unwrap();

        for version in ["2.3.0", "9.9.9"] {
            let err = tarball_url_for(&info, &PackageSpec::new("tmpl-basic", version)).unwrap_err();
            assert!(matches!(
                err,
                StencilError::InstallFailed(ref spec, ref reason)
                    if *spec == format!("tmpl-basic@{version}") && reason == "version not published"
            ));
        }
    }

    #[tokio::test]
    async fn test_install_from_unreachable_registry_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let store_dir = dir.path().join("node_modules");
        let registry = NpmRegistry::new("https://registry.npmjs.org");

        let err = registry
            .install_packages(
                dir.path(),
                &store_dir,
                "http://127.0.0.1:9",
                &[PackageSpec::new("tmpl-basic", "2.3.0")],
            )
            .await
            .unwrap_err();

        assert!(matches!(err, StencilError::InstallFailed(ref spec, _) if spec == "tmpl-basic@2.3.0"));
        assert!(store_dir.is_dir());
        assert_eq!(std::fs::read_dir(&store_dir).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_unreachable_registry_is_reported() {
        // Port 9 (discard) on localhost refuses connections.
        let registry = NpmRegistry::new("http://127.0.0.1:9");
        let err = registry.latest_version("tmpl-basic").await.unwrap_err();
        assert!(matches!(err, StencilError::RegistryUnavailable(ref name, _) if name == "tmpl-basic"));
    }
}
