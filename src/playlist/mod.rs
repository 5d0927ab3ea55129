use crate::browser::types::MediaTags;
use crate::error::Result;
use std::sync::{Mutex, MutexGuard};

/// Receives streams picked in a browser.
pub trait PlaylistSink: Send + Sync {
    /// Replaces current playback with this stream.
    fn play_media(
        &self,
        player_id: &str,
        url: Option<&str>,
        name: Option<&str>,
        tags: MediaTags,
    ) -> Result<()>;

    /// Appends this stream to the active queue.
    fn queue_media(
        &self,
        player_id: &str,
        url: Option<&str>,
        name: Option<&str>,
        tags: MediaTags,
    ) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub player_id: String,
    /// `None` when the station exposed no usable stream.
    pub url: Option<String>,
    pub name: Option<String>,
    pub tags: MediaTags,
}

#[derive(Debug, Default)]
struct Entries {
    entries: Vec<PlaylistEntry>,
    current_index: Option<usize>,
}

#[derive(Debug, Default)]
pub struct Playlist {
    inner: Mutex<Entries>,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Add an entry to the end of the playlist
    pub fn add(&self, entry: PlaylistEntry) {
        self.lock().entries.push(entry);
    }

    /// Add an entry and make it the current one
    pub fn play(&self, entry: PlaylistEntry) {
        let mut inner = self.lock();
        inner.entries.push(entry);
        inner.current_index = Some(inner.entries.len() - 1);
    }

    #[allow(dead_code)]
    pub fn current(&self) -> Option<PlaylistEntry> {
        let inner = self.lock();
        inner.current_index.and_then(|i| inner.entries.get(i).cloned())
    }

    pub fn current_index(&self) -> Option<usize> {
        self.lock().current_index
    }

    pub fn entries(&self) -> Vec<PlaylistEntry> {
        self.lock().entries.clone()
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }
}

impl PlaylistSink for Playlist {
    fn play_media(
        &self,
        player_id: &str,
        url: Option<&str>,
        name: Option<&str>,
        tags: MediaTags,
    ) -> Result<()> {
        self.play(PlaylistEntry {
            player_id: player_id.to_string(),
            url: url.map(str::to_string),
            name: name.map(str::to_string),
            tags,
        });
        Ok(())
    }

    fn queue_media(
        &self,
        player_id: &str,
        url: Option<&str>,
        name: Option<&str>,
        tags: MediaTags,
    ) -> Result<()> {
        self.add(PlaylistEntry {
            player_id: player_id.to_string(),
            url: url.map(str::to_string),
            name: name.map(str::to_string),
            tags,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_entry(id: &str) -> PlaylistEntry {
        PlaylistEntry {
            player_id: "player".to_string(),
            url: Some(format!("http://stream.example/{id}")),
            name: Some(format!("Station {id}")),
            tags: MediaTags::default(),
        }
    }

    #[test]
    fn test_add_does_not_change_current() {
        let playlist = Playlist::new();
        assert!(playlist.is_empty());

        playlist.add(make_entry("1"));
        assert_eq!(playlist.len(), 1);
        assert!(playlist.current().is_none());
    }

    #[test]
    fn test_play_becomes_current() {
        let playlist = Playlist::new();
        playlist.add(make_entry("1"));
        playlist.play(make_entry("2"));
        playlist.add(make_entry("3"));

        assert_eq!(playlist.len(), 3);
        assert_eq!(playlist.current_index(), Some(1));
        assert_eq!(playlist.current().unwrap().name.as_deref(), Some("Station 2"));
    }

    #[test]
    fn test_sink_accepts_missing_stream() {
        let playlist = Playlist::new();
        playlist
            .play_media("player", None, Some("Silent"), MediaTags::default())
            .unwrap();
        let current = playlist.current().unwrap();
        assert_eq!(current.url, None);
        assert_eq!(current.name.as_deref(), Some("Silent"));
    }
}
