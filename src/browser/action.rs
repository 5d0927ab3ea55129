//! Station actions: resolve a station to its stream, then hand it to the
//! playlist or the library.

use super::transform::cover_ref;
use super::types::{ActionRequest, ActionType, MediaTags, StationDetail};
use crate::error::{BrowseError, Result};
use crate::library::{LibrarySink, MediaFlags, NewMedia};
use crate::playlist::PlaylistSink;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Reads a station-detail response, either a bare object or a one-element
/// array depending on the API generation.
pub fn parse_station_detail(v: &Value, asset_base: &str) -> Result<StationDetail> {
    let station = match v {
        Value::Object(_) => v,
        Value::Array(list) => list.first().filter(|s| s.is_object()).ok_or_else(|| {
            BrowseError::MalformedUpstreamResponse("empty station detail list".into())
        })?,
        _ => {
            return Err(BrowseError::MalformedUpstreamResponse(
                "station detail is not an object".into(),
            ));
        }
    };

    let name = station
        .get("name")
        .and_then(|n| n.as_str().or_else(|| n.get("value").and_then(|v| v.as_str())))
        .map(str::to_string);

    Ok(StationDetail {
        name,
        stream_url: first_stream_url(station),
        cover: cover_ref(station, asset_base),
    })
}

/// First stream entry with a usable URL, in upstream order.
fn first_stream_url(station: &Value) -> Option<String> {
    let candidates = [("streams", "url"), ("streamUrls", "streamUrl")];
    candidates.iter().find_map(|(list, field)| {
        station
            .get(*list)?
            .as_array()?
            .iter()
            .find_map(|s| s.get(*field).and_then(|u| u.as_str()).filter(|u| !u.is_empty()))
            .map(str::to_string)
    })
}

/// Splits a stream URL at its last separator into `(path, media_name)`.
pub fn split_stream_url(url: &str) -> (&str, &str) {
    match url.rsplit_once('/') {
        Some((path, name)) => (path, name),
        None => ("", url),
    }
}

pub struct Dispatcher<'a> {
    pub player_id: &'a str,
    pub browser_id: &'a str,
    pub playlist: &'a dyn PlaylistSink,
    pub library: &'a dyn LibrarySink,
}

impl Dispatcher<'_> {
    pub fn dispatch(&self, request: &ActionRequest, detail: StationDetail) -> Result<()> {
        let StationDetail {
            name,
            stream_url,
            cover,
        } = detail;
        let tags = MediaTags {
            title: name.clone(),
            cover,
        };

        if stream_url.is_none() {
            warn!(station_id = %request.station_id, "station has no usable stream");
        }
        let url = stream_url.as_deref();
        let name = name.as_deref();

        match request.action {
            ActionType::Play => {
                info!(station_id = %request.station_id, ?url, "play radio");
                self.playlist.play_media(self.player_id, url, name, tags)
            }
            ActionType::Add => {
                info!(station_id = %request.station_id, ?url, "queue radio");
                self.playlist.queue_media(self.player_id, url, name, tags)
            }
            ActionType::SetFavorite => {
                let Some(url) = url else {
                    return Ok(());
                };
                let (path, media_name) = split_stream_url(url);
                let id = self.library.add_media(&NewMedia {
                    player_id: self.player_id,
                    path,
                    media_name,
                    browser_id: self.browser_id,
                    station_id: &request.station_id,
                    tags: &tags,
                    flags: MediaFlags::FAVORITE,
                })?;
                info!(station_id = %request.station_id, media_id = id, "favorite set");
                Ok(())
            }
            ActionType::UnsetFavorite => {
                let Some(id) = self
                    .library
                    .lookup_media_id(self.browser_id, &request.station_id)?
                else {
                    debug!(station_id = %request.station_id, "not in library");
                    return Ok(());
                };
                let flags = self.library.get_flags(id)?;
                self.library.set_flags(id, flags.without(MediaFlags::FAVORITE))?;
                info!(station_id = %request.station_id, media_id = id, "favorite unset");
                Ok(())
            }
            ActionType::Remove | ActionType::Custom => Err(BrowseError::UnsupportedAction(
                request.action.as_str().to_string(),
            )),
        }
    }
}
