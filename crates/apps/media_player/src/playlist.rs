use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Track streamed through the remote provider.
pub struct Track {
    /// Provider track id.
    pub id: String,
    /// Display title.
    pub title: String,
}

impl Track {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Locally served file played once the remote provider is abandoned.
pub struct FallbackTrack {
    pub url: String,
    pub title: String,
}

const DEFAULT_PLAYLIST: [(&str, &str); 3] = [
    ("jfKfPfyJRdk", "Lofi Radio"),
    ("4xDzrJKXOOY", "Synthwave Radio"),
    ("rUxyKA_-grg", "Chillhop Radio"),
];

pub fn default_playlist() -> Vec<Track> {
    DEFAULT_PLAYLIST
        .iter()
        .map(|(id, title)| Track::new(*id, *title))
        .collect()
}

pub fn default_fallback_track() -> FallbackTrack {
    FallbackTrack {
        url: "assets/audio/offline-mix.mp3".to_string(),
        title: "Offline Mix".to_string(),
    }
}
