//! Desktop configuration document: owner profile and categorized link collections.

use std::collections::BTreeMap;

use leptos::logging;
use platform_host::ConfigSource;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
/// Owner profile shown on the desktop.
pub struct Profile {
    pub name: String,
    pub role: String,
    pub email: String,
    /// External profile URL.
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkEntry {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
/// Parsed configuration. Every field is optional; missing pieces render nothing.
pub struct DesktopConfig {
    pub profile: Option<Profile>,
    /// Link collections keyed by category name.
    pub links: BTreeMap<String, Vec<LinkEntry>>,
}

impl DesktopConfig {
    /// Link entries with both a label and a URL, grouped by category.
    pub fn usable_links(&self) -> impl Iterator<Item = (&str, Vec<&LinkEntry>)> {
        self.links.iter().filter_map(|(category, entries)| {
            let usable: Vec<_> = entries
                .iter()
                .filter(|entry| !entry.label.trim().is_empty() && !entry.url.trim().is_empty())
                .collect();
            (!usable.is_empty()).then_some((category.as_str(), usable))
        })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("configuration source failed: {0}")]
    Source(String),
}

/// Parses a configuration document.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] for malformed JSON or mistyped fields.
pub fn parse_desktop_config(raw: &str) -> Result<DesktopConfig, ConfigError> {
    Ok(serde_json::from_str(raw)?)
}

/// Loads configuration from `source`, falling back to the empty default on any failure.
pub async fn load_desktop_config(source: &dyn ConfigSource) -> DesktopConfig {
    let loaded = match source.load_raw().await {
        Ok(Some(raw)) => parse_desktop_config(&raw),
        Ok(None) => return DesktopConfig::default(),
        Err(err) => Err(ConfigError::Source(err)),
    };
    loaded.unwrap_or_else(|err| {
        logging::warn!("desktop config unavailable: {err}");
        DesktopConfig::default()
    })
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use platform_host::{MemoryConfigSource, NoopConfigSource};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_profile_and_link_collections() {
        let config = parse_desktop_config(
            r#"{
                "profile": {"name": "Ada", "role": "Engineer", "email": "ada@example.com",
                            "link": "https://example.com/ada"},
                "links": {"projects": [{"label": "Engine", "url": "https://example.com/engine"}]}
            }"#,
        )
        .expect("parse");

        assert_eq!(config.profile.as_ref().map(|p| p.name.as_str()), Some("Ada"));
        assert_eq!(
            config.links.get("projects"),
            Some(&vec![LinkEntry {
                label: "Engine".to_string(),
                url: "https://example.com/engine".to_string(),
            }])
        );
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = parse_desktop_config(r#"{"profile": {"name": "Ada"}}"#).expect("parse");
        let profile = config.profile.expect("profile");
        assert_eq!(profile.name, "Ada");
        assert_eq!(profile.email, "");
        assert!(config.links.is_empty());

        assert_eq!(parse_desktop_config("{}").expect("empty"), DesktopConfig::default());
    }

    #[test]
    fn malformed_documents_are_rejected() {
        assert!(matches!(
            parse_desktop_config("{not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            parse_desktop_config(r#"{"links": []}"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn usable_links_skip_incomplete_entries() {
        let config = parse_desktop_config(
            r#"{"links": {
                "empty": [{"label": "", "url": "https://example.com"}],
                "social": [{"label": "Blog", "url": "https://example.com/blog"}, {"label": "x"}]
            }}"#,
        )
        .expect("parse");

        let usable: Vec<_> = config
            .usable_links()
            .map(|(category, entries)| (category.to_string(), entries.len()))
            .collect();
        assert_eq!(usable, vec![("social".to_string(), 1)]);
    }

    #[test]
    fn loader_degrades_to_default() {
        let missing = block_on(load_desktop_config(&NoopConfigSource));
        assert_eq!(missing, DesktopConfig::default());

        let broken = block_on(load_desktop_config(&MemoryConfigSource::new("[1, 2")));
        assert_eq!(broken, DesktopConfig::default());

        let valid = block_on(load_desktop_config(&MemoryConfigSource::new(
            r#"{"profile": {"role": "Designer"}}"#,
        )));
        assert_eq!(valid.profile.map(|p| p.role), Some("Designer".to_string()));
    }
}
