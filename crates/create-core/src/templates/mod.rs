//! Template acquisition
//!
//! Downloads a named project template archive from the template registry and
//! extracts it into the target directory. Every failure along the way is
//! reported as a single recoverable `Error::Download`.

pub mod fetcher;

pub use fetcher::TemplateFetcher;
