//! Reshaping catalog JSON into media lists.
//!
//! The catalog has answered with three different shapes over its API
//! generations; each is decoded once into a [`Payload`] and then sliced and
//! mapped with its own rules. Entries that lack a required field are dropped
//! without failing the page.

use super::types::{Action, MediaItem, MediaListResponse, PageRequest};
use crate::error::{BrowseError, Result};
use crate::library::{LibrarySink, MediaFlags};
use serde_json::Value;
use tracing::warn;

/// Logo fields, biggest first.
const LOGO_FIELDS: [&str; 4] = ["logo300x300", "logo175x175", "logo100x100", "logo44x44"];

#[derive(Debug, Clone, Copy)]
pub enum Payload<'a> {
    /// Bare array of category entries.
    Categories(&'a [Value]),
    /// `categories[0].matches` of the legacy station-list and search endpoints.
    Matches(&'a [Value]),
    /// `playables` of the current station-list and search endpoints.
    Playables(&'a [Value]),
}

impl<'a> Payload<'a> {
    pub fn decode(v: &'a Value) -> Result<Self> {
        if let Some(entries) = v.as_array() {
            return Ok(Payload::Categories(entries));
        }

        let Some(obj) = v.as_object() else {
            return Err(BrowseError::MalformedUpstreamResponse(
                "expected an array or an object".into(),
            ));
        };

        if let Some(playables) = obj.get("playables").and_then(|p| p.as_array()) {
            return Ok(Payload::Playables(playables));
        }

        if obj.contains_key("categories") {
            return v
                .pointer("/categories/0/matches")
                .and_then(|m| m.as_array())
                .map(|m| Payload::Matches(m))
                .ok_or_else(|| {
                    BrowseError::MalformedUpstreamResponse("no categories[0].matches".into())
                });
        }

        Err(BrowseError::MalformedUpstreamResponse(
            "no playables or categories".into(),
        ))
    }
}

pub struct Transformer<'a> {
    pub asset_base: &'a str,
    pub browser_id: &'a str,
    pub library: &'a dyn LibrarySink,
}

impl Transformer<'_> {
    pub fn transform(&self, payload: &Value, page: PageRequest) -> Result<MediaListResponse> {
        Ok(match Payload::decode(payload)? {
            Payload::Categories(entries) => self.categories(entries, page),
            Payload::Matches(entries) => self.matches(entries, page),
            Payload::Playables(entries) => self.playables(entries, page),
        })
    }

    /// Category values, sliced directly by offset and count.
    pub fn categories(&self, entries: &[Value], page: PageRequest) -> MediaListResponse {
        let start = (page.offset as usize).min(entries.len());
        let end = start.saturating_add(page.count as usize).min(entries.len());

        let items = entries[start..end]
            .iter()
            .filter_map(|entry| {
                let id = first_str(entry, &["systemName", "systemEnglish"])?;
                let name = first_str(entry, &["name", "localized"]).unwrap_or(id);
                Some(MediaItem::folder(id, name))
            })
            .collect();
        MediaListResponse::new(items, page.offset)
    }

    fn matches(&self, entries: &[Value], page: PageRequest) -> MediaListResponse {
        let items = page_slice(entries, page)
            .iter()
            .filter_map(|entry| {
                let id = entry.get("id")?.as_i64()?;
                let name = entry.pointer("/name/value")?.as_str()?;
                let mut item = MediaItem::media(id.to_string(), name)
                    .with_cover(cover_ref(entry, self.asset_base));
                item.actions = vec![Action::PLAY, Action::ADD];
                Some(item)
            })
            .collect();
        MediaListResponse::new(items, page.offset)
    }

    fn playables(&self, entries: &[Value], page: PageRequest) -> MediaListResponse {
        let items = page_slice(entries, page)
            .iter()
            .filter_map(|entry| {
                let id = id_string(entry.get("id")?)?;
                let name = entry.get("name")?.as_str()?;
                let favorite = self.is_favorite(&id);

                let mut item =
                    MediaItem::media(id, name).with_cover(cover_ref(entry, self.asset_base));
                item.favorite = Some(favorite);
                item.actions = vec![
                    Action::PLAY,
                    Action::ADD,
                    if favorite {
                        Action::UNSET_FAVORITE
                    } else {
                        Action::SET_FAVORITE
                    },
                ];
                Some(item)
            })
            .collect();
        MediaListResponse::new(items, page.offset)
    }

    fn is_favorite(&self, station_id: &str) -> bool {
        let lookup = self
            .library
            .lookup_media_id(self.browser_id, station_id)
            .and_then(|id| match id {
                Some(id) => self.library.get_flags(id).map(Some),
                None => Ok(None),
            });
        match lookup {
            Ok(flags) => flags.is_some_and(|f| f.contains(MediaFlags::FAVORITE)),
            Err(e) => {
                warn!(station_id, error = %e, "favorite lookup failed");
                false
            }
        }
    }
}

/// Trims a page fetched with a widened window back to the requested one.
///
/// Requests that start on a page boundary have `skip == 0` and only get
/// clamped to `count`.
fn page_slice(entries: &[Value], page: PageRequest) -> &[Value] {
    let skip = (page.offset % page.count) as usize;
    if skip >= entries.len() {
        return &[];
    }
    let end = skip.saturating_add(page.count as usize).min(entries.len());
    &entries[skip..end]
}

/// Cover reference of a station: its biggest logo, relative to the asset base.
pub fn cover_ref(entry: &Value, asset_base: &str) -> Option<String> {
    let logo = LOGO_FIELDS
        .iter()
        .find_map(|field| entry.get(*field).and_then(|v| v.as_str()))?;
    logo.strip_prefix(asset_base)
        .filter(|rest| !rest.is_empty())
        .map(str::to_string)
}

fn first_str<'v>(entry: &'v Value, fields: &[&str]) -> Option<&'v str> {
    fields
        .iter()
        .find_map(|f| entry.get(*f).and_then(|v| v.as_str()))
        .filter(|s| !s.is_empty())
}

fn id_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => n.as_i64().map(|n| n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::types::{ActionType, ItemKind, MediaTags};
    use crate::library::{Library, NewMedia};
    use serde_json::json;

    const ASSET: &str = "https://static.example/images/broadcasts/";

    fn page(offset: u32, count: u32) -> PageRequest {
        PageRequest::new(offset, count).unwrap()
    }

    fn with_transformer<R>(library: &Library, f: impl FnOnce(&Transformer<'_>) -> R) -> R {
        let t = Transformer {
            asset_base: ASSET,
            browser_id: "test.browser",
            library,
        };
        f(&t)
    }

    fn matches_doc(n: usize) -> Value {
        let matches: Vec<Value> = (0..n)
            .map(|i| json!({"id": 100 + i, "name": {"value": format!("Station {i}")}}))
            .collect();
        json!({"categories": [{"matches": matches}]})
    }

    #[test]
    fn test_decode_shapes() {
        assert!(matches!(
            Payload::decode(&json!([])).unwrap(),
            Payload::Categories(_)
        ));
        assert!(matches!(
            Payload::decode(&json!({"playables": []})).unwrap(),
            Payload::Playables(_)
        ));
        assert!(matches!(
            Payload::decode(&matches_doc(1)).unwrap(),
            Payload::Matches(_)
        ));
    }

    #[test]
    fn test_decode_missing_shape_is_malformed() {
        for doc in [
            json!({"categories": []}),
            json!({"categories": [{"other": 1}]}),
            json!({"totalCount": 3}),
            json!("text"),
        ] {
            assert!(
                matches!(
                    Payload::decode(&doc),
                    Err(BrowseError::MalformedUpstreamResponse(_))
                ),
                "doc {doc}"
            );
        }
    }

    #[test]
    fn test_categories_slice_is_clipped() {
        let library = Library::open_in_memory().unwrap();
        let entries: Vec<Value> = (0..5)
            .map(|i| json!({"systemEnglish": format!("c{i}"), "localized": format!("C{i}")}))
            .collect();

        with_transformer(&library, |t| {
            let resp = t.categories(&entries, page(3, 10));
            assert_eq!(resp.count, 2);
            assert_eq!(resp.offset, 3);
            assert_eq!(resp.items[0].id, "c3");
            assert_eq!(resp.items[0].name, "C3");
            assert_eq!(resp.items[0].kind, ItemKind::Folder);

            let resp = t.categories(&entries, page(9, 10));
            assert!(resp.items.is_empty());
        });
    }

    #[test]
    fn test_categories_skip_entries_without_id() {
        let library = Library::open_in_memory().unwrap();
        let entries = vec![
            json!({"systemName": "rock", "name": "Rock"}),
            json!({"name": "No id"}),
            json!({"systemName": "pop"}),
        ];
        with_transformer(&library, |t| {
            let resp = t.categories(&entries, page(0, 10));
            let ids: Vec<_> = resp.items.iter().map(|i| i.id.as_str()).collect();
            assert_eq!(ids, ["rock", "pop"]);
            assert_eq!(resp.items[1].name, "pop");
            assert_eq!(resp.count, 2);
        });
    }

    #[test]
    fn test_matches_skip_past_end_is_empty_page() {
        let library = Library::open_in_memory().unwrap();
        with_transformer(&library, |t| {
            // offset 7, count 10 -> skip 7, but only 5 matches
            let resp = t.transform(&matches_doc(5), page(7, 10)).unwrap();
            assert!(resp.items.is_empty());
            assert_eq!(resp.count, 0);
            assert_eq!(resp.offset, 7);
        });
    }

    #[test]
    fn test_matches_misaligned_window() {
        let library = Library::open_in_memory().unwrap();
        with_transformer(&library, |t| {
            // offset 13, count 5 -> page of 10 fetched, skip 3
            let resp = t.transform(&matches_doc(10), page(13, 5)).unwrap();
            let ids: Vec<_> = resp.items.iter().map(|i| i.id.as_str()).collect();
            assert_eq!(ids, ["103", "104", "105", "106", "107"]);
            assert!(resp.items.iter().all(|i| i.kind == ItemKind::Media));
            assert_eq!(resp.items[0].actions, vec![Action::PLAY, Action::ADD]);
        });
    }

    #[test]
    fn test_matches_skip_bad_entries() {
        let library = Library::open_in_memory().unwrap();
        let doc = json!({"categories": [{"matches": [
            {"id": 1, "name": {"value": "One"}},
            {"id": "two", "name": {"value": "Two"}},
            {"id": 3},
            {"id": 4, "name": {"value": "Four"}},
        ]}]});
        with_transformer(&library, |t| {
            let resp = t.transform(&doc, page(0, 10)).unwrap();
            let ids: Vec<_> = resp.items.iter().map(|i| i.id.as_str()).collect();
            assert_eq!(ids, ["1", "4"]);
            assert_eq!(resp.count, 2);
        });
    }

    #[test]
    fn test_cover_prefers_biggest_logo() {
        let entry = json!({
            "logo44x44": format!("{ASSET}t/44.png"),
            "logo300x300": format!("{ASSET}t/300.png"),
        });
        assert_eq!(cover_ref(&entry, ASSET).as_deref(), Some("t/300.png"));

        let entry = json!({
            "logo100x100": format!("{ASSET}t/100.png"),
            "logo44x44": format!("{ASSET}t/44.png"),
        });
        assert_eq!(cover_ref(&entry, ASSET).as_deref(), Some("t/100.png"));
    }

    #[test]
    fn test_cover_outside_asset_base_is_dropped() {
        let entry = json!({"logo300x300": "https://elsewhere.example/a.png"});
        assert_eq!(cover_ref(&entry, ASSET), None);
        assert_eq!(cover_ref(&json!({}), ASSET), None);
    }

    #[test]
    fn test_playables_keep_order_and_favorites() {
        let library = Library::open_in_memory().unwrap();
        let tags = MediaTags::default();
        library
            .add_media(&NewMedia {
                player_id: "player",
                path: "http://stream.example",
                media_name: "b",
                browser_id: "test.browser",
                station_id: "b",
                tags: &tags,
                flags: MediaFlags::FAVORITE,
            })
            .unwrap();

        let doc = json!({"playables": [
            {"id": "a", "name": "Alpha"},
            {"id": "b", "name": "Bravo", "logo175x175": format!("{ASSET}b.png")},
            {"id": 7, "name": "Seven"},
            {"name": "No id"},
        ]});
        with_transformer(&library, |t| {
            let resp = t.transform(&doc, page(0, 10)).unwrap();
            let ids: Vec<_> = resp.items.iter().map(|i| i.id.as_str()).collect();
            assert_eq!(ids, ["a", "b", "7"]);

            assert_eq!(resp.items[0].favorite, Some(false));
            assert!(resp.items[0].allows(ActionType::SetFavorite));
            assert!(!resp.items[0].allows(ActionType::UnsetFavorite));

            assert_eq!(resp.items[1].favorite, Some(true));
            assert!(resp.items[1].allows(ActionType::UnsetFavorite));
            assert!(!resp.items[1].allows(ActionType::SetFavorite));
            assert_eq!(resp.items[1].cover.as_deref(), Some("b.png"));
        });
    }
}
