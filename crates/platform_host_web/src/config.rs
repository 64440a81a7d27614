//! Configuration document adapter backed by `fetch`.

use platform_host::{ConfigSource, ConfigSourceFuture};

use crate::bridge;

/// Default location of the desktop configuration document, relative to the page.
pub const CONFIG_DOCUMENT_URL: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Browser config source that fetches the document over HTTP.
///
/// A missing document (404) loads as `Ok(None)`; other HTTP failures are errors.
pub struct WebConfigSource {
    url: String,
}

impl WebConfigSource {
    /// Creates a source for `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Document URL this source fetches.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for WebConfigSource {
    fn default() -> Self {
        Self::new(CONFIG_DOCUMENT_URL)
    }
}

impl ConfigSource for WebConfigSource {
    fn load_raw(&self) -> ConfigSourceFuture<'_, Result<Option<String>, String>> {
        Box::pin(async move { bridge::fetch_text(&self.url).await })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_source_targets_page_relative_document() {
        assert_eq!(WebConfigSource::default().url(), "config.json");
    }

    #[test]
    fn native_builds_load_no_document() {
        let source = WebConfigSource::new("/missing.json");
        assert_eq!(block_on(source.load_raw()), Ok(None));
    }
}
