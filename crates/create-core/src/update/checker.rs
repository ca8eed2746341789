//! Registry query classifying the local version's freshness

use crate::product::ProductConfig;
use anyhow::{Context, Result};
use semver::Version;
use serde::Deserialize;
use url::Url;

/// How the local version compares to the latest published one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Latest,
    Outdated,
    /// Version strings could not be compared; treated like `Latest`
    Unknown,
}

/// Per-invocation result of an update check; never persisted
#[derive(Debug, Clone)]
pub struct VersionInfo {
    pub current: Option<Version>,
    pub latest: Option<Version>,
    pub classification: Freshness,
}

impl VersionInfo {
    pub fn is_outdated(&self) -> bool {
        self.classification == Freshness::Outdated
    }

    /// Latest version for display, falling back to the raw tag
    pub fn latest_display(&self) -> String {
        self.latest
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_else(|| "latest".to_string())
    }
}

/// `GET <registry>/<package>/latest` response; only the version matters
#[derive(Debug, Deserialize)]
struct DistTag {
    version: String,
}

/// Queries the package registry for the latest published version
pub struct UpdateChecker {
    registry: Url,
    client: reqwest::Client,
}

impl UpdateChecker {
    pub fn new(registry: Url, user_agent: &str) -> Self {
        Self {
            registry,
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    /// Create a checker from a product config, honoring the env override
    pub fn from_config<C: ProductConfig>(config: &C) -> Result<Self> {
        let url_str = std::env::var(config.registry_url_env())
            .unwrap_or_else(|_| config.default_registry_url().to_string());
        let url =
            Url::parse(&url_str).with_context(|| format!("Invalid registry URL: {}", url_str))?;
        Ok(Self::new(url, config.user_agent()))
    }

    /// Build a URL by appending path segments, preserving the base path
    fn build_url(base: &Url, segments: &[&str]) -> Result<Url> {
        let mut url = base.clone();
        {
            let mut parts = url
                .path_segments_mut()
                .map_err(|_| anyhow::anyhow!("URL cannot have path segments: {}", base))?;
            parts.pop_if_empty();
            for segment in segments {
                parts.push(segment);
            }
        }
        Ok(url)
    }

    /// Fetch the latest published version of `package` and classify
    /// `current` against it. Transport failures propagate as errors; the
    /// calling flow treats them the same as `Latest` (proceed, no upgrade).
    pub async fn fetch_latest(&self, package: &str, current: &str) -> Result<VersionInfo> {
        let url = Self::build_url(&self.registry, &[package, "latest"])?;
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to query registry at {}", url))?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Failed to query registry for {}: HTTP {}",
                package,
                response.status()
            );
        }

        let tag: DistTag = response
            .json()
            .await
            .context("Failed to parse registry response")?;

        Ok(classify(current, &tag.version))
    }
}

/// Pure comparison: `latest > current` means outdated
pub fn classify(current: &str, latest: &str) -> VersionInfo {
    let current = Version::parse(current.trim().trim_start_matches('v')).ok();
    let latest = Version::parse(latest.trim().trim_start_matches('v')).ok();

    let classification = match (&current, &latest) {
        (Some(cur), Some(lat)) if lat > cur => Freshness::Outdated,
        (Some(_), Some(_)) => Freshness::Latest,
        _ => Freshness::Unknown,
    };

    VersionInfo {
        current,
        latest,
        classification,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_release_is_outdated() {
        assert_eq!(classify("0.2.1", "0.3.0").classification, Freshness::Outdated);
        assert_eq!(classify("0.2.1", "1.0.0").classification, Freshness::Outdated);
    }

    #[test]
    fn same_or_older_release_is_latest() {
        assert_eq!(classify("0.2.1", "0.2.1").classification, Freshness::Latest);
        assert_eq!(classify("0.3.0", "0.2.1").classification, Freshness::Latest);
    }

    #[test]
    fn unparseable_versions_are_unknown() {
        assert_eq!(classify("0.2.1", "not-a-version").classification, Freshness::Unknown);
        assert_eq!(classify("dev", "0.3.0").classification, Freshness::Unknown);
    }

    #[test]
    fn leading_v_prefix_is_tolerated() {
        assert_eq!(classify("v0.2.1", "v0.3.0").classification, Freshness::Outdated);
    }

    #[tokio::test]
    async fn fetch_latest_reads_the_dist_tag() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/forgelab/latest")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"version": "0.9.0", "name": "forgelab"}"#)
            .create_async()
            .await;

        let checker = UpdateChecker::new(Url::parse(&server.url()).unwrap(), "test");
        let info = checker.fetch_latest("forgelab", "0.2.1").await.unwrap();

        mock.assert_async().await;
        assert_eq!(info.classification, Freshness::Outdated);
        assert_eq!(info.latest_display(), "0.9.0");
    }

    #[tokio::test]
    async fn fetch_latest_surfaces_http_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/forgelab/latest")
            .with_status(500)
            .create_async()
            .await;

        let checker = UpdateChecker::new(Url::parse(&server.url()).unwrap(), "test");
        assert!(checker.fetch_latest("forgelab", "0.2.1").await.is_err());
    }

    #[tokio::test]
    async fn fetch_latest_surfaces_malformed_bodies() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/forgelab/latest")
            .with_status(200)
            .with_body("<html>registry maintenance</html>")
            .create_async()
            .await;

        let checker = UpdateChecker::new(Url::parse(&server.url()).unwrap(), "test");
        assert!(checker.fetch_latest("forgelab", "0.2.1").await.is_err());
    }
}
