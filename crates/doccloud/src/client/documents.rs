//! Documents, notes, uploads and oEmbed.

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use super::{DocumentCloudClient, api_path};
use crate::error::{ApiError, Result};
use crate::query::EmbedOptions;
use crate::types::{AccessLevel, DocumentId, NewDocument, NewNote, Note, NoteId, Page};

impl DocumentCloudClient {
    pub async fn get_document(&self, document: DocumentId) -> Result<Value> {
        self.get(&api_path(&[&"documents", &document])).await
    }

    /// Notes on a document, optionally narrowed to one access level.
    ///
    /// The filter is applied to the returned page only; `count` still
    /// reflects the unfiltered collection.
    pub async fn get_document_notes(
        &self,
        document: DocumentId,
        access: Option<AccessLevel>,
    ) -> Result<Page<Note>> {
        let mut page: Page<Note> = self
            .get(&api_path(&[&"documents", &document, &"notes"]))
            .await?;

        if let Some(access) = access {
            page.results.retain(|note| note.access == Some(access));
        }

        Ok(page)
    }

    pub async fn create_note(&self, document: DocumentId, note: &NewNote) -> Result<Note> {
        self.send_json(
            Method::POST,
            &api_path(&[&"documents", &document, &"notes"]),
            note,
        )
        .await
    }

    /// Replace a note (PUT).
    pub async fn update_note<B>(
        &self,
        document: DocumentId,
        note: NoteId,
        payload: &B,
    ) -> Result<Note>
    where
        B: Serialize + ?Sized,
    {
        self.send_json(
            Method::PUT,
            &api_path(&[&"documents", &document, &"notes", &note]),
            payload,
        )
        .await
    }

    /// Create a document that the service fetches from `file_url`.
    pub async fn upload_document_by_url(&self, document: &NewDocument) -> Result<Value> {
        self.send_json(Method::POST, &api_path(&[&"documents"]), document)
            .await
    }

    /// Create a document and upload its file through the returned presigned URL.
    ///
    /// The presigned PUT carries no API credentials. Returns the created
    /// document record.
    pub async fn upload_document_file(
        &self,
        document: &NewDocument,
        file: impl Into<reqwest::Body>,
    ) -> Result<Value> {
        let created: Value = self
            .send_json(Method::POST, &api_path(&[&"documents"]), document)
            .await?;

        let Some(presigned_url) = created.get("presigned_url").and_then(Value::as_str) else {
            return Err(ApiError::MissingField {
                endpoint: self.endpoint("/documents/"),
                field: "presigned_url",
            });
        };

        self.limiter.acquire().await;
        tracing::debug!(document = ?created.get("id"), "Uploading file to presigned URL");

        let response = self
            .plain_http
            .put(presigned_url)
            .body(file)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: presigned_url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status.as_u16(), "Presigned upload failed");
            return Err(ApiError::Status {
                endpoint: presigned_url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(created)
    }

    /// oEmbed description of a DocumentCloud URL.
    pub async fn oembed(&self, url: &str, options: &EmbedOptions) -> Result<Value> {
        self.execute(Method::GET, &api_path(&[&"oembed"]), |r| {
            r.query(&[("url", url)]).query(options)
        })
        .await
    }
}
