//! Template fetching from the remote template registry
//!
//! Templates are published as zip archives with a single top-level directory
//! (the archive layout produced by GitHub's codeload endpoint). Extraction
//! strips that directory so the template's files land directly in the target.

use crate::error::Error;
use crate::product::ProductConfig;
use anyhow::{Context, Result};
use std::io::{Cursor, Read};
use std::path::{Component, Path, PathBuf};
use url::Url;
use zip::ZipArchive;

/// Downloads and extracts named project templates
pub struct TemplateFetcher {
    base: Url,
    client: reqwest::Client,
}

impl TemplateFetcher {
    pub fn new(base: Url, user_agent: &str) -> Self {
        Self {
            base,
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    /// Create a fetcher from a product config, honoring the env override
    pub fn from_config<C: ProductConfig>(config: &C) -> Result<Self> {
        let url_str = std::env::var(config.template_url_env())
            .unwrap_or_else(|_| config.default_template_url().to_string());
        let url =
            Url::parse(&url_str).with_context(|| format!("Invalid template URL: {}", url_str))?;
        Ok(Self::new(url, config.user_agent()))
    }

    /// Archive URL for a template: `<base>/<template>/zip/refs/heads/main`
    fn archive_url(&self, template: &str) -> Result<Url> {
        let mut url = self.base.clone();
        {
            let mut parts = url
                .path_segments_mut()
                .map_err(|_| anyhow::anyhow!("URL cannot have path segments: {}", self.base))?;
            parts.pop_if_empty();
            for segment in [template, "zip", "refs", "heads", "main"] {
                parts.push(segment);
            }
        }
        Ok(url)
    }

    /// Download `template` and extract it into `dest`, returning the number
    /// of files written. Transport, archive, and extraction failures are all
    /// wrapped as `Error::Download` tagged with the template id.
    pub async fn fetch(&self, template: &str, dest: &Path) -> Result<usize, Error> {
        let wrap = |source: anyhow::Error| Error::Download {
            template: template.to_string(),
            source: source.into(),
        };

        let url = self.archive_url(template).map_err(wrap)?;
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))
            .map_err(wrap)?;

        if !response.status().is_success() {
            return Err(wrap(anyhow::anyhow!(
                "HTTP {} fetching {}",
                response.status(),
                url
            )));
        }

        let bytes = response
            .bytes()
            .await
            .context("Failed to read template archive body")
            .map_err(wrap)?;

        extract_archive(&bytes, dest)
            .with_context(|| format!("Failed to extract template archive into {}", dest.display()))
            .map_err(wrap)
    }
}

/// Extract a zip archive into `dest`, stripping the single top-level
/// directory every entry is nested under.
fn extract_archive(bytes: &[u8], dest: &Path) -> Result<usize> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).context("Invalid zip archive")?;

    let mut written = 0;
    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if file.is_dir() {
            continue;
        }

        let Some(relative) = strip_archive_root(file.name()) else {
            continue;
        };

        let target = dest.join(&relative);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)?;
        std::fs::write(&target, &contents)
            .with_context(|| format!("Failed to write file: {}", target.display()))?;
        written += 1;
    }

    if written == 0 {
        anyhow::bail!("Template archive contained no files");
    }
    Ok(written)
}

/// Drop the archive's top-level directory and refuse entries that would
/// escape the target directory.
fn strip_archive_root(entry: &str) -> Option<PathBuf> {
    let path = Path::new(entry);
    if path
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return None;
    }
    let mut components = path.components();
    components.next()?;
    let relative: PathBuf = components.collect();
    if relative.as_os_str().is_empty() {
        None
    } else {
        Some(relative)
    }
}
