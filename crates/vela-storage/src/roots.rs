//! Well-known bookmark rows.
//!
//! The synthetic root and the "Mobile Bookmarks" folder are seeded by the
//! initial migration and referenced by id/guid everywhere else. The root
//! row is its own parent, so child queries must exclude it explicitly.

/// Surrogate id of the synthetic root folder.
pub const ROOT_ID: i64 = 0;

/// Stable guid of the synthetic root folder.
pub const ROOT_GUID: &str = "root________";

/// Surrogate id of the "Mobile Bookmarks" folder, the default parent for
/// shared items.
pub const MOBILE_ID: i64 = 1;

/// Stable guid of the "Mobile Bookmarks" folder.
pub const MOBILE_GUID: &str = "mobile______";

/// Display title of the "Mobile Bookmarks" folder.
pub const MOBILE_TITLE: &str = "Mobile Bookmarks";
