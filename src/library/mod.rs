//! Media library: the index that remembers favorite stations.
//!
//! Media rows are keyed by `(player_id, path, media_name)`, the identity of the
//! stream itself, and also record which browser item they came from so that
//! listings can find them again by `(browser_id, station_id)`.

use crate::browser::types::MediaTags;
use crate::error::Result;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MediaFlags(u32);

impl MediaFlags {
    #[allow(dead_code)]
    pub const NONE: MediaFlags = MediaFlags(0);
    pub const FAVORITE: MediaFlags = MediaFlags(1 << 0);

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub fn contains(self, other: MediaFlags) -> bool {
        self.0 & other.0 == other.0
    }

    #[allow(dead_code)]
    pub fn with(self, other: MediaFlags) -> Self {
        Self(self.0 | other.0)
    }

    pub fn without(self, other: MediaFlags) -> Self {
        Self(self.0 & !other.0)
    }
}

/// A stream to record in the library.
#[derive(Debug, Clone)]
pub struct NewMedia<'a> {
    pub player_id: &'a str,
    pub path: &'a str,
    pub media_name: &'a str,
    pub browser_id: &'a str,
    pub station_id: &'a str,
    pub tags: &'a MediaTags,
    pub flags: MediaFlags,
}

pub trait LibrarySink: Send + Sync {
    /// Library id of the media recorded for a browser item, if any.
    fn lookup_media_id(&self, browser_id: &str, station_id: &str) -> Result<Option<i64>>;

    fn get_flags(&self, media_id: i64) -> Result<MediaFlags>;

    fn set_flags(&self, media_id: i64, flags: MediaFlags) -> Result<()>;

    /// Inserts the media, or merges `flags` into the existing row.
    fn add_media(&self, media: &NewMedia<'_>) -> Result<i64>;
}

pub struct Library {
    conn: Mutex<Connection>,
}

impl Library {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
        }

        let conn = Connection::open(path).with_context(|| format!("open {}", path.display()))?;
        let lib = Self {
            conn: Mutex::new(conn),
        };
        lib.init_schema().context("init schema")?;
        Ok(lib)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let lib = Self {
            conn: Mutex::new(Connection::open_in_memory()?),
        };
        lib.init_schema()?;
        Ok(lib)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn().execute_batch(
            r#"
CREATE TABLE IF NOT EXISTS media (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  player_id TEXT NOT NULL,
  path TEXT NOT NULL,
  media_name TEXT NOT NULL,
  browser_id TEXT NOT NULL,
  station_id TEXT NOT NULL,
  title TEXT,
  cover TEXT,
  flags INTEGER NOT NULL DEFAULT 0,
  UNIQUE(player_id, path, media_name)
);

CREATE INDEX IF NOT EXISTS idx_media_browser ON media(browser_id, station_id);
"#,
        )?;
        Ok(())
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Number of media rows, favorite or not.
    pub fn len(&self) -> Result<usize> {
        let n: i64 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM media", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    /// Titles of the media currently flagged as favorite.
    pub fn favorites(&self) -> Result<Vec<String>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT COALESCE(title, media_name) FROM media WHERE (flags & ?1) != 0 ORDER BY id",
        )?;
        let names = stmt
            .query_map(params![MediaFlags::FAVORITE.bits()], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }
}

impl LibrarySink for Library {
    fn lookup_media_id(&self, browser_id: &str, station_id: &str) -> Result<Option<i64>> {
        let id = self
            .conn()
            .query_row(
                "SELECT id FROM media WHERE browser_id=?1 AND station_id=?2 ORDER BY id DESC LIMIT 1",
                params![browser_id, station_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    fn get_flags(&self, media_id: i64) -> Result<MediaFlags> {
        let bits: Option<u32> = self
            .conn()
            .query_row(
                "SELECT flags FROM media WHERE id=?1",
                params![media_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(bits.map(MediaFlags::from_bits).unwrap_or_default())
    }

    fn set_flags(&self, media_id: i64, flags: MediaFlags) -> Result<()> {
        self.conn().execute(
            "UPDATE media SET flags=?2 WHERE id=?1",
            params![media_id, flags.bits()],
        )?;
        Ok(())
    }

    fn add_media(&self, media: &NewMedia<'_>) -> Result<i64> {
        let conn = self.conn();
        conn.execute(
            r#"
INSERT INTO media(player_id, path, media_name, browser_id, station_id, title, cover, flags)
VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
ON CONFLICT(player_id, path, media_name) DO UPDATE SET
  browser_id=excluded.browser_id,
  station_id=excluded.station_id,
  title=COALESCE(excluded.title, media.title),
  cover=COALESCE(excluded.cover, media.cover),
  flags=media.flags | excluded.flags
"#,
            params![
                media.player_id,
                media.path,
                media.media_name,
                media.browser_id,
                media.station_id,
                media.tags.title,
                media.tags.cover,
                media.flags.bits()
            ],
        )?;
        let id = conn.query_row(
            "SELECT id FROM media WHERE player_id=?1 AND path=?2 AND media_name=?3",
            params![media.player_id, media.path, media.media_name],
            |row| row.get(0),
        )?;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BrowseError;

    fn new_media<'a>(tags: &'a MediaTags, station_id: &'a str, flags: MediaFlags) -> NewMedia<'a> {
        NewMedia {
            player_id: "player",
            path: "http://stream.example/live",
            media_name: station_id,
            browser_id: "browser",
            station_id,
            tags,
            flags,
        }
    }

    #[test]
    fn test_flags_bits() {
        let f = MediaFlags::NONE.with(MediaFlags::FAVORITE);
        assert!(f.contains(MediaFlags::FAVORITE));
        assert!(!f.without(MediaFlags::FAVORITE).contains(MediaFlags::FAVORITE));
        assert_eq!(MediaFlags::from_bits(f.bits()), f);
    }

    #[test]
    fn test_lookup_missing() {
        let lib = Library::open_in_memory().unwrap();
        assert_eq!(lib.lookup_media_id("browser", "1").unwrap(), None);
        assert_eq!(lib.get_flags(42).unwrap(), MediaFlags::NONE);
    }

    #[test]
    fn test_add_then_lookup() {
        let lib = Library::open_in_memory().unwrap();
        let tags = MediaTags {
            title: Some("Rock FM".into()),
            cover: None,
        };
        let id = lib
            .add_media(&new_media(&tags, "1", MediaFlags::FAVORITE))
            .unwrap();

        assert_eq!(lib.lookup_media_id("browser", "1").unwrap(), Some(id));
        assert!(lib.get_flags(id).unwrap().contains(MediaFlags::FAVORITE));
        assert_eq!(lib.favorites().unwrap(), vec!["Rock FM".to_string()]);
    }

    #[test]
    fn test_add_twice_merges_row() {
        let lib = Library::open_in_memory().unwrap();
        let tags = MediaTags::default();
        let first = lib.add_media(&new_media(&tags, "1", MediaFlags::NONE)).unwrap();
        let second = lib
            .add_media(&new_media(&tags, "1", MediaFlags::FAVORITE))
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(lib.len().unwrap(), 1);
        assert!(lib.get_flags(first).unwrap().contains(MediaFlags::FAVORITE));
    }

    #[test]
    fn test_favorites_reports_bad_rows() {
        let lib = Library::open_in_memory().unwrap();
        lib.conn()
            .execute(
                "INSERT INTO media(player_id, path, media_name, browser_id, station_id, title, flags)
                 VALUES('player', 'http://a', 'live', 'browser', '1', X'00FF', 1)",
                [],
            )
            .unwrap();
        assert!(matches!(lib.favorites(), Err(BrowseError::Library(_))));
    }

    #[test]
    fn test_clearing_flag_keeps_row() {
        let lib = Library::open_in_memory().unwrap();
        let tags = MediaTags::default();
        let id = lib
            .add_media(&new_media(&tags, "1", MediaFlags::FAVORITE))
            .unwrap();

        let flags = lib.get_flags(id).unwrap().without(MediaFlags::FAVORITE);
        lib.set_flags(id, flags).unwrap();

        assert_eq!(lib.len().unwrap(), 1);
        assert!(lib.favorites().unwrap().is_empty());
        assert_eq!(lib.lookup_media_id("browser", "1").unwrap(), Some(id));
    }
}
