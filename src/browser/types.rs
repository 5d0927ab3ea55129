use crate::error::{BrowseError, Result};
use serde::Serialize;

/// The five taxonomy keys the catalog can be browsed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    Genres,
    Topics,
    Countries,
    Languages,
    Cities,
}

impl CategoryType {
    pub const ALL: [CategoryType; 5] = [
        CategoryType::Genres,
        CategoryType::Topics,
        CategoryType::Countries,
        CategoryType::Languages,
        CategoryType::Cities,
    ];

    /// Path segment and taxonomy document key.
    pub fn key(self) -> &'static str {
        match self {
            CategoryType::Genres => "genres",
            CategoryType::Topics => "topics",
            CategoryType::Countries => "countries",
            CategoryType::Languages => "languages",
            CategoryType::Cities => "cities",
        }
    }

    /// Value of the `tagType` parameter of the station-list endpoint.
    pub fn tag_type(self) -> &'static str {
        match self {
            CategoryType::Genres => "genre",
            CategoryType::Topics => "topic",
            CategoryType::Countries => "country",
            CategoryType::Languages => "language",
            CategoryType::Cities => "city",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            CategoryType::Genres => "Genres",
            CategoryType::Topics => "Topics",
            CategoryType::Countries => "Countries",
            CategoryType::Languages => "Languages",
            CategoryType::Cities => "Cities",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            CategoryType::Genres => "fa:guitar",
            CategoryType::Topics => "fa:comment",
            CategoryType::Countries => "fa:flag",
            CategoryType::Languages => "fa:globe-europe",
            CategoryType::Cities => "fa:city",
        }
    }

    pub fn parse(key: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.key() == key)
            .ok_or_else(|| BrowseError::UnsupportedCategory(key.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: u32,
    pub count: u32,
}

impl PageRequest {
    pub fn new(offset: u32, count: u32) -> Result<Self> {
        if count == 0 {
            return Err(BrowseError::InvalidQuery("count must be positive".into()));
        }
        Ok(Self { offset, count })
    }

    /// Upstream page covering this request.
    ///
    /// The catalog only serves whole pages, so a request that does not start
    /// on a page boundary asks for a page twice as large and trims `skip`
    /// leading entries afterwards.
    ///
    /// Fails when the page number or the widened size does not fit in `u32`.
    pub fn window(&self) -> Result<PageWindow> {
        let page_index = self.offset / self.count;
        let skip = self.offset % self.count;
        let out_of_range =
            || BrowseError::InvalidQuery(format!("page out of range: {}+{}", self.offset, self.count));

        let page_number = page_index.checked_add(1).ok_or_else(out_of_range)?;
        let size = if skip == 0 {
            self.count
        } else {
            self.count.checked_mul(2).ok_or_else(out_of_range)?
        };
        Ok(PageWindow {
            page_index,
            page_number,
            size,
            skip,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page_index: u32,
    /// 1-based, as the catalog counts pages.
    pub page_number: u32,
    pub size: u32,
    pub skip: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedIntent {
    Root,
    CategoryList {
        category: CategoryType,
    },
    StationList {
        category: CategoryType,
        value: String,
        page: PageRequest,
    },
    Search {
        query: String,
        page: PageRequest,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Play,
    Add,
    /// Offered by hosts for other browsers; rejected here.
    #[allow(dead_code)]
    Remove,
    SetFavorite,
    UnsetFavorite,
    #[allow(dead_code)]
    Custom,
}

impl ActionType {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionType::Play => "play",
            ActionType::Add => "add",
            ActionType::Remove => "remove",
            ActionType::SetFavorite => "set_favorite",
            ActionType::UnsetFavorite => "unset_favorite",
            ActionType::Custom => "custom",
        }
    }
}

/// An action offered on a listed item, with its UI label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub kind: ActionType,
    pub name: &'static str,
    pub icon: &'static str,
}

impl Action {
    pub const PLAY: Action = Action {
        kind: ActionType::Play,
        name: "Play radio",
        icon: "fa:play",
    };
    pub const ADD: Action = Action {
        kind: ActionType::Add,
        name: "Add radio to playlist",
        icon: "fa:plus",
    };
    pub const SET_FAVORITE: Action = Action {
        kind: ActionType::SetFavorite,
        name: "Add radio to favorites",
        icon: "fa:star",
    };
    pub const UNSET_FAVORITE: Action = Action {
        kind: ActionType::UnsetFavorite,
        name: "Remove radio from favorites",
        icon: "fa:star-o",
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Folder,
    Media,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaItem {
    pub id: String,
    pub name: String,
    pub kind: ItemKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<Action>,
}

impl MediaItem {
    pub fn folder(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: ItemKind::Folder,
            cover: None,
            favorite: None,
            actions: Vec::new(),
        }
    }

    pub fn media(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: ItemKind::Media,
            ..Self::folder(id, name)
        }
    }

    pub fn with_cover(mut self, cover: Option<String>) -> Self {
        self.cover = cover;
        self
    }

    #[cfg(test)]
    pub fn allows(&self, kind: ActionType) -> bool {
        self.actions.iter().any(|a| a.kind == kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaListResponse {
    pub items: Vec<MediaItem>,
    pub offset: u32,
    pub count: u32,
}

impl MediaListResponse {
    pub fn new(items: Vec<MediaItem>, offset: u32) -> Self {
        let count = items.len() as u32;
        Self {
            items,
            offset,
            count,
        }
    }
}

/// Metadata attached to a stream handed to the playlist or library.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MediaTags {
    pub title: Option<String>,
    pub cover: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationDetail {
    pub name: Option<String>,
    pub stream_url: Option<String>,
    pub cover: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    pub station_id: String,
    pub action: ActionType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserRequest {
    GetMediaList {
        query: String,
        offset: u32,
        count: u32,
    },
    DoAction {
        path: String,
        action: ActionType,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BrowserResponse {
    MediaList(MediaListResponse),
}

/// Static description of a browser, as shown by the host application.
#[derive(Debug, Clone, Serialize)]
pub struct BrowserInfo {
    pub id: String,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub supports_search: bool,
}
