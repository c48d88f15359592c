//! Bookmark tree domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fallback title for folder rows stored without one.
pub const UNTITLED_FOLDER_TITLE: &str = "Untitled";

/// Storage type codes for bookmark rows.
///
/// `Separator` and `DynamicContainer` exist in storage but never surface
/// through the tree; decoding one is an error, not a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeType {
    Bookmark = 1,
    Folder = 2,
    Separator = 3,
    DynamicContainer = 4,
}

impl NodeType {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(NodeType::Bookmark),
            2 => Some(NodeType::Folder),
            3 => Some(NodeType::Separator),
            4 => Some(NodeType::DynamicContainer),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        self as i64
    }
}

/// Storage codes for the kind of site icon a favicon row describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IconType {
    Icon = 0,
    AppleIcon = 1,
    AppleIconPrecomposed = 2,
    Guess = 3,
}

impl IconType {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(IconType::Icon),
            1 => Some(IconType::AppleIcon),
            2 => Some(IconType::AppleIconPrecomposed),
            3 => Some(IconType::Guess),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        self as i64
    }
}

/// Site icon metadata, attached to an item when the favicon join matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favicon {
    /// Location the icon was fetched from
    pub url: String,
    /// When the icon was last fetched
    pub date: DateTime<Utc>,
    /// What kind of icon this is
    pub icon_type: IconType,
}

/// A leaf of the tree: one bookmarked page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookmarkItem {
    /// Stable identity across storage operations
    pub guid: String,
    /// Storage surrogate key, present once persisted
    pub id: Option<i64>,
    /// Display title; falls back to the URL when the row has none
    pub title: String,
    /// Bookmarked page URL
    pub url: String,
    /// Icon metadata when the favicon join matched
    pub favicon: Option<Favicon>,
}

/// An interior node of the tree. Children are not part of the node's
/// identity; a folder is materialized with its children by a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookmarkFolder {
    /// Stable identity across storage operations
    pub guid: String,
    /// Storage surrogate key, present once persisted
    pub id: Option<i64>,
    /// Display title; falls back to [`UNTITLED_FOLDER_TITLE`]
    pub title: String,
}

/// One node of the bookmark tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BookmarkNode {
    Item(BookmarkItem),
    Folder(BookmarkFolder),
}

impl BookmarkNode {
    pub fn guid(&self) -> &str {
        match self {
            BookmarkNode::Item(item) => &item.guid,
            BookmarkNode::Folder(folder) => &folder.guid,
        }
    }

    pub fn id(&self) -> Option<i64> {
        match self {
            BookmarkNode::Item(item) => item.id,
            BookmarkNode::Folder(folder) => folder.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            BookmarkNode::Item(item) => &item.title,
            BookmarkNode::Folder(folder) => &folder.title,
        }
    }

    pub fn as_item(&self) -> Option<&BookmarkItem> {
        match self {
            BookmarkNode::Item(item) => Some(item),
            BookmarkNode::Folder(_) => None,
        }
    }

    pub fn as_folder(&self) -> Option<&BookmarkFolder> {
        match self {
            BookmarkNode::Item(_) => None,
            BookmarkNode::Folder(folder) => Some(folder),
        }
    }
}

/// Payload for sharing a page into the mobile bookmarks folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareItem {
    pub url: String,
    /// Optional page title; the URL stands in when absent
    pub title: Option<String>,
    pub favicon: Option<Favicon>,
}

/// Null-title fallback shared by the row decoder and `share_item`.
pub(crate) fn title_or(title: Option<String>, fallback: &str) -> String {
    title.unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_type_codes_round_trip() {
        assert_eq!(NodeType::from_code(1), Some(NodeType::Bookmark));
        assert_eq!(NodeType::from_code(2), Some(NodeType::Folder));
        assert_eq!(NodeType::from_code(3), Some(NodeType::Separator));
        assert_eq!(NodeType::from_code(4), Some(NodeType::DynamicContainer));
        assert_eq!(NodeType::from_code(0), None);
        assert_eq!(NodeType::from_code(99), None);
        assert_eq!(NodeType::Folder.code(), 2);
    }

    #[test]
    fn test_icon_type_codes() {
        assert_eq!(IconType::from_code(0), Some(IconType::Icon));
        assert_eq!(IconType::from_code(3), Some(IconType::Guess));
        assert_eq!(IconType::from_code(-1), None);
        assert_eq!(IconType::from_code(7), None);
    }

    #[test]
    fn test_title_fallback() {
        assert_eq!(title_or(None, "https://example.com"), "https://example.com");
        assert_eq!(title_or(Some("Kept".into()), "fallback"), "Kept");
        // An empty stored title is a real value, not a missing one
        assert_eq!(title_or(Some(String::new()), "fallback"), "");
    }

    #[test]
    fn test_node_accessors() {
        let node = BookmarkNode::Item(BookmarkItem {
            guid: "item-guid".into(),
            id: Some(7),
            title: "Example".into(),
            url: "https://example.com".into(),
            favicon: None,
        });
        assert_eq!(node.guid(), "item-guid");
        assert_eq!(node.id(), Some(7));
        assert_eq!(node.title(), "Example");
        assert!(node.as_item().is_some());
        assert!(node.as_folder().is_none());
    }
}
