//! Blog search results

use serde::{Deserialize, Serialize};

use crate::markup;

/// A blog post returned by the blog search API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    /// Title, possibly containing highlight markup
    pub title: String,
    /// Post URL
    pub link: String,
    /// Excerpt, possibly containing highlight markup
    pub description: String,
    /// Author display name
    pub blogger_name: String,
    /// Publication date as `YYYYMMDD`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_date: Option<String>,
}

impl BlogPost {
    /// Title without markup
    #[must_use]
    pub fn display_title(&self) -> String {
        markup::to_plain_text(&self.title)
    }

    /// Excerpt without markup
    #[must_use]
    pub fn display_description(&self) -> String {
        markup::to_plain_text(&self.description)
    }
}
