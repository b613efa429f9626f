//! Article records — the items being clustered.

use serde::{Deserialize, Serialize};

/// Minimal structured representation of a scholarly article.
///
/// Produced by an external metadata-extraction step and immutable from
/// then on. `text_repr` is the cleaned text the embedder consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// Unique id, usually the original filename.
    pub id: String,
    /// Absolute path to the source document.
    pub src_path: String,
    pub title: String,
    pub abstract_text: String,
    pub keywords: String,
    pub year: Option<u16>,
    /// Concatenation of title + abstract + keywords used for embedding.
    pub text_repr: String,
}

impl ArticleRecord {
    /// Build a record, deriving `text_repr` from the metadata fields.
    pub fn new(
        id: impl Into<String>,
        src_path: impl Into<String>,
        title: impl Into<String>,
        abstract_text: impl Into<String>,
        keywords: impl Into<String>,
        year: Option<u16>,
    ) -> Self {
        let title = title.into();
        let abstract_text = abstract_text.into();
        let keywords = keywords.into();
        let text_repr = format!("{}. {}. {}", title, abstract_text, keywords)
            .trim()
            .to_string();
        Self {
            id: id.into(),
            src_path: src_path.into(),
            title,
            abstract_text,
            keywords,
            year,
            text_repr,
        }
    }
}
