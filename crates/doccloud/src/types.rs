//! Resource records exchanged with the DocumentCloud API.
//!
//! Generic operations pass `serde_json::Value` through untouched; the types
//! here are typed views over the records the review workflow reads or writes.
//! Fields the API adds later land in `extra` instead of being dropped.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type DocumentId = u64;
pub type ProjectId = u64;
pub type UserId = u64;
pub type NoteId = u64;

/// Integer or string identifier, rendered verbatim into request paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId(String);

impl ResourceId {
    /// The `me` alias for the authenticated user.
    pub fn me() -> Self {
        Self("me".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

macro_rules! resource_id_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for ResourceId {
            fn from(id: $t) -> Self {
                Self(id.to_string())
            }
        })*
    };
}

resource_id_from_int!(i32, i64, u32, u64);

/// One page of a paginated collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T = Value> {
    /// Total across all pages. Cursor-paginated endpoints omit it.
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// `count` when reported, otherwise the size of this page.
    pub fn total(&self) -> u64 {
        self.count.unwrap_or(self.results.len() as u64)
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Public,
    Private,
    Organization,
}

/// Membership record returned by `/projects/{id}/documents/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDocument {
    pub document: DocumentId,
    #[serde(default)]
    pub edit_access: bool,
}

/// An annotation on one page of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub page_number: u32,
    #[serde(default)]
    pub access: Option<AccessLevel>,
    #[serde(default)]
    pub x1: Option<f64>,
    #[serde(default)]
    pub x2: Option<f64>,
    #[serde(default)]
    pub y1: Option<f64>,
    #[serde(default)]
    pub y2: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Page {}: {} - {}",
            self.page_number,
            self.title,
            self.content.as_deref().unwrap_or_default()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Only present when the user fetches their own record.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Page region a note is anchored to, as fractions of page width/height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteRegion {
    pub x1: f64,
    pub x2: f64,
    pub y1: f64,
    pub y2: f64,
}

/// Body for creating a note. Without a region the note covers the whole page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewNote {
    pub title: String,
    pub page_number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access: Option<AccessLevel>,
    #[serde(flatten)]
    pub region: Option<NoteRegion>,
}

impl NewNote {
    pub fn new(title: impl Into<String>, page_number: u32) -> Self {
        Self {
            title: title.into(),
            page_number,
            content: None,
            access: None,
            region: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into()).filter(|c| !c.is_empty());
        self
    }

    pub fn with_access(mut self, access: AccessLevel) -> Self {
        self.access = Some(access);
        self
    }

    pub fn with_region(mut self, region: NoteRegion) -> Self {
        self.region = Some(region);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub private: bool,
}

impl NewProject {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            private: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn private(mut self, private: bool) -> Self {
        self.private = private;
        self
    }
}

/// Body for creating a document, either from a public URL or for direct upload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewDocument {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access: Option<AccessLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl NewDocument {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            file_url: None,
            access: None,
            source: None,
            description: None,
            language: None,
        }
    }

    pub fn with_file_url(mut self, url: impl Into<String>) -> Self {
        self.file_url = Some(url.into());
        self
    }

    pub fn with_access(mut self, access: AccessLevel) -> Self {
        self.access = Some(access);
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollaboratorAccess {
    #[default]
    View,
    Edit,
    Admin,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_id_renders_ints_and_names() {
        assert_eq!(ResourceId::from(42).to_string(), "42");
        assert_eq!(ResourceId::from(7u64).as_str(), "7");
        assert_eq!(ResourceId::from("me"), ResourceId::me());
    }

    #[test]
    fn page_total_falls_back_to_results() {
        let page: Page = serde_json::from_str(r#"{"results": [{"id": 1}, {"id": 2}]}"#).unwrap();
        assert_eq!(page.count, None);
        assert_eq!(page.total(), 2);

        let page: Page<ProjectDocument> =
            serde_json::from_str(r#"{"count": 0, "next": null, "results": []}"#).unwrap();
        assert!(page.is_empty());
    }

    #[test]
    fn note_keeps_unknown_fields() {
        let note: Note = serde_json::from_value(serde_json::json!({
            "id": 9,
            "title": "Redaction",
            "content": "Names visible",
            "page_number": 3,
            "access": "private",
            "user": 12
        }))
        .unwrap();

        assert_eq!(note.access, Some(AccessLevel::Private));
        assert_eq!(note.extra["user"], 12);
        assert_eq!(note.to_string(), "Page 3: Redaction - Names visible");
    }

    #[test]
    fn user_api_key_optional() {
        let user: User = serde_json::from_str(r#"{"id": 1, "username": "reviewer"}"#).unwrap();
        assert_eq!(user.username, "reviewer");
        assert!(user.api_key.is_none());
    }

    #[test]
    fn new_note_without_region_serializes_minimal() {
        let note = NewNote::new("Check page", 2).with_content("");
        insta::assert_json_snapshot!("new_note_minimal", note);
    }

    #[test]
    fn new_note_region_is_flattened() {
        let note = NewNote::new("Signature", 1).with_region(NoteRegion {
            x1: 0.25,
            x2: 0.75,
            y1: 0.5,
            y2: 0.625,
        });
        let value = serde_json::to_value(&note).unwrap();
        assert_eq!(value["x1"], 0.25);
        assert_eq!(value["y2"], 0.625);
        assert!(value.get("region").is_none());
        assert!(value.get("content").is_none());
    }

    #[test]
    fn new_project_serializes_all_fields() {
        let project = NewProject::new("Sensitive")
            .with_description("Flagged documents")
            .private(true);
        insta::assert_json_snapshot!("new_project", project);
    }

    #[test]
    fn new_document_skips_unset_fields() {
        let doc = NewDocument::new("Contract").with_file_url("https://example.com/a.pdf");
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"title": "Contract", "file_url": "https://example.com/a.pdf"})
        );
    }
}
