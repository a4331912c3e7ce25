//! Projects, their documents and their collaborators.

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use super::{DocumentCloudClient, api_path};
use crate::error::Result;
use crate::query::{ProjectDocumentsFilter, ProjectFilter};
use crate::types::{
    CollaboratorAccess, DocumentId, NewProject, Page, ProjectDocument, ProjectId, UserId,
};

#[derive(Serialize)]
struct AddDocument {
    document: DocumentId,
    edit_access: bool,
}

#[derive(Serialize)]
struct AddCollaborator<'a> {
    email: &'a str,
    access: CollaboratorAccess,
}

impl DocumentCloudClient {
    pub async fn list_projects(&self, filter: &ProjectFilter) -> Result<Page> {
        self.get_query(&api_path(&[&"projects"]), filter).await
    }

    pub async fn create_project(&self, project: &NewProject) -> Result<Value> {
        self.send_json(Method::POST, &api_path(&[&"projects"]), project)
            .await
    }

    pub async fn get_project(&self, project: ProjectId) -> Result<Value> {
        self.get(&api_path(&[&"projects", &project])).await
    }

    /// Replace a project's fields (PUT).
    pub async fn update_project<B>(&self, project: ProjectId, payload: &B) -> Result<Value>
    where
        B: Serialize + ?Sized,
    {
        self.send_json(Method::PUT, &api_path(&[&"projects", &project]), payload)
            .await
    }

    pub async fn delete_project(&self, project: ProjectId) -> Result<()> {
        self.delete(&api_path(&[&"projects", &project])).await
    }

    pub async fn list_project_documents(
        &self,
        project: ProjectId,
        filter: &ProjectDocumentsFilter,
    ) -> Result<Page<ProjectDocument>> {
        self.get_query(&api_path(&[&"projects", &project, &"documents"]), filter)
            .await
    }

    pub async fn add_document_to_project(
        &self,
        project: ProjectId,
        document: DocumentId,
        edit_access: bool,
    ) -> Result<ProjectDocument> {
        let body = AddDocument {
            document,
            edit_access,
        };
        self.send_json(
            Method::POST,
            &api_path(&[&"projects", &project, &"documents"]),
            &body,
        )
        .await
    }

    pub async fn remove_document_from_project(
        &self,
        project: ProjectId,
        document: DocumentId,
    ) -> Result<()> {
        self.delete(&api_path(&[&"projects", &project, &"documents", &document]))
            .await
    }

    pub async fn list_project_collaborators(&self, project: ProjectId) -> Result<Page> {
        self.get(&api_path(&[&"projects", &project, &"users"])).await
    }

    pub async fn add_collaborator_to_project(
        &self,
        project: ProjectId,
        email: &str,
        access: CollaboratorAccess,
    ) -> Result<Value> {
        let body = AddCollaborator { email, access };
        self.send_json(
            Method::POST,
            &api_path(&[&"projects", &project, &"users"]),
            &body,
        )
        .await
    }

    pub async fn remove_collaborator_from_project(
        &self,
        project: ProjectId,
        user: UserId,
    ) -> Result<()> {
        self.delete(&api_path(&[&"projects", &project, &"users", &user]))
            .await
    }
}
