use std::collections::HashSet;

use tracing::{debug, info};

use super::{
    Decision, LoginPrompt, ReviewCounts, ReviewItem, ReviewProjects, ReviewSummary, Reviewer,
    Verdict,
};
use crate::client::DocumentCloudClient;
use crate::error::Result;
use crate::query::ProjectDocumentsFilter;
use crate::types::{DocumentId, ProjectDocument, ProjectId, ResourceId};

/// Drives a review queue over one client.
#[derive(Clone)]
pub struct ReviewWorkflow {
    client: DocumentCloudClient,
    projects: ReviewProjects,
}

impl ReviewWorkflow {
    pub fn new(client: DocumentCloudClient, projects: ReviewProjects) -> Self {
        Self { client, projects }
    }

    pub fn client(&self) -> &DocumentCloudClient {
        &self.client
    }

    pub fn projects(&self) -> &ReviewProjects {
        &self.projects
    }

    pub async fn login_prompt(&self) -> Result<LoginPrompt> {
        if !self.client.is_logged_in().await {
            return Ok(LoginPrompt::LoggedOut {
                login_url: self.client.login_url(),
                signup_url: self.client.signup_url(),
            });
        }
        let me = self.client.fetch_user(ResourceId::me()).await?;
        Ok(LoginPrompt::LoggedIn {
            username: me.username,
        })
    }

    /// First document in the unreviewed project that is in neither
    /// downstream project, or `None` once everything has been reviewed.
    pub async fn next_unreviewed(&self) -> Result<Option<ProjectDocument>> {
        self.next_unreviewed_excluding(&HashSet::new()).await
    }

    /// Like [`next_unreviewed`](Self::next_unreviewed), passing over `excluded`.
    pub async fn next_unreviewed_excluding(
        &self,
        excluded: &HashSet<DocumentId>,
    ) -> Result<Option<ProjectDocument>> {
        let mut page_number = 1;
        loop {
            let filter = ProjectDocumentsFilter {
                page: (page_number > 1).then_some(page_number),
                ..Default::default()
            };
            let page = self
                .client
                .list_project_documents(self.projects.unreviewed, &filter)
                .await?;

            for candidate in page.results {
                if excluded.contains(&candidate.document) {
                    continue;
                }
                if !self.is_reviewed(candidate.document).await? {
                    debug!(document = candidate.document, "Found unreviewed document");
                    return Ok(Some(candidate));
                }
            }

            if page.next.is_none() {
                return Ok(None);
            }
            page_number += 1;
        }
    }

    /// Whether `document` already sits in either downstream project.
    pub async fn is_reviewed(&self, document: DocumentId) -> Result<bool> {
        Ok(self.contains(self.projects.non_sensitive, document).await?
            || self.contains(self.projects.sensitive, document).await?)
    }

    async fn contains(&self, project: ProjectId, document: DocumentId) -> Result<bool> {
        let page = self
            .client
            .list_project_documents(project, &ProjectDocumentsFilter::document(document))
            .await?;
        Ok(!page.is_empty())
    }

    /// File `document` under the project for `verdict`.
    pub async fn classify(
        &self,
        document: DocumentId,
        verdict: Verdict,
    ) -> Result<ProjectDocument> {
        let project = self.projects.target(verdict);
        let added = self
            .client
            .add_document_to_project(project, document, true)
            .await?;
        info!(document, project, verdict = verdict.as_str(), "Document classified");
        Ok(added)
    }

    pub async fn counts(&self) -> Result<ReviewCounts> {
        let all = ProjectDocumentsFilter::default();
        let non_sensitive = self
            .client
            .list_project_documents(self.projects.non_sensitive, &all)
            .await?
            .total();
        let sensitive = self
            .client
            .list_project_documents(self.projects.sensitive, &all)
            .await?
            .total();
        Ok(ReviewCounts {
            non_sensitive,
            sensitive,
        })
    }

    /// Gather the notes and viewer URL for a candidate.
    pub async fn prepare(&self, candidate: ProjectDocument) -> Result<ReviewItem> {
        let document = candidate.document;
        let notes = self.client.get_document_notes(document, None).await?;
        Ok(ReviewItem {
            document,
            membership: candidate,
            notes: notes.results,
            embed_url: self.client.embed_url(document),
        })
    }

    /// Review documents until the queue is empty or the reviewer quits.
    pub async fn run(&self, reviewer: &dyn Reviewer) -> Result<ReviewSummary> {
        let mut summary = ReviewSummary::default();
        let mut skipped = HashSet::new();

        loop {
            reviewer.show_counts(&self.counts().await?).await;

            let Some(candidate) = self.next_unreviewed_excluding(&skipped).await? else {
                info!("No unreviewed documents left");
                summary.exhausted = true;
                return Ok(summary);
            };

            let item = self.prepare(candidate).await?;
            match reviewer.decide(&item).await {
                Decision::Classify(verdict) => {
                    self.classify(item.document, verdict).await?;
                    match verdict {
                        Verdict::Sensitive => summary.sensitive += 1,
                        Verdict::NonSensitive => summary.non_sensitive += 1,
                    }
                }
                Decision::Skip => {
                    debug!(document = item.document, "Document skipped");
                    skipped.insert(item.document);
                    summary.skipped += 1;
                }
                Decision::Quit => {
                    info!(classified = summary.classified(), "Review stopped");
                    return Ok(summary);
                }
            }
        }
    }
}
