//! Generic resource verbs over `/{resource}/[{id}/][{sub}/[{sub_id}/]]`.

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use super::{DocumentCloudClient, api_path};
use crate::error::Result;
use crate::query::{ListQuery, SearchOptions};
use crate::types::{Page, ResourceId};

impl DocumentCloudClient {
    pub async fn list_resources(&self, resource: &str, query: &ListQuery) -> Result<Page> {
        self.get_query(&api_path(&[&resource]), query).await
    }

    pub async fn get_resource(&self, resource: &str, id: impl Into<ResourceId>) -> Result<Value> {
        let id: ResourceId = id.into();
        self.get(&api_path(&[&resource, &id])).await
    }

    pub async fn create_resource<B>(&self, resource: &str, payload: &B) -> Result<Value>
    where
        B: Serialize + ?Sized,
    {
        self.send_json(Method::POST, &api_path(&[&resource]), payload)
            .await
    }

    /// Partial update (PATCH).
    pub async fn update_resource<B>(
        &self,
        resource: &str,
        id: impl Into<ResourceId>,
        payload: &B,
    ) -> Result<Value>
    where
        B: Serialize + ?Sized,
    {
        let id: ResourceId = id.into();
        self.send_json(Method::PATCH, &api_path(&[&resource, &id]), payload)
            .await
    }

    pub async fn delete_resource(&self, resource: &str, id: impl Into<ResourceId>) -> Result<()> {
        let id: ResourceId = id.into();
        self.delete(&api_path(&[&resource, &id])).await
    }

    /// Fetch a nested collection, or one item of it when `sub_id` is given.
    pub async fn get_sub_resource(
        &self,
        resource: &str,
        id: impl Into<ResourceId>,
        sub_resource: &str,
        sub_id: Option<ResourceId>,
    ) -> Result<Value> {
        let id: ResourceId = id.into();
        let path = match sub_id {
            Some(sub_id) => api_path(&[&resource, &id, &sub_resource, &sub_id]),
            None => api_path(&[&resource, &id, &sub_resource]),
        };
        self.get(&path).await
    }

    /// Full-text search over documents visible to the caller.
    pub async fn search_documents(&self, query: &str, options: &SearchOptions) -> Result<Page> {
        self.execute(Method::GET, "/documents/search", |r| {
            r.query(&[("q", query)]).query(options)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use crate::client::test_support::*;
    use crate::query::{ListQuery, SearchOptions};
    use crate::types::ResourceId;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn ok(body: serde_json::Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(body)
    }

    #[tokio::test]
    async fn list_sends_recognized_query_fields() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/documents/"))
            .and(query_param("page", "2"))
            .and(query_param("ordering", "-created_at"))
            .respond_with(ok(serde_json::json!({
                "count": 3,
                "next": null,
                "previous": "https://api.example/documents/?page=1",
                "results": [{"id": 3}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let query = ListQuery {
            ordering: Some("-created_at".to_string()),
            ..ListQuery::page(2)
        };
        let page = client.list_resources("documents", &query).await.unwrap();

        assert_eq!(page.count, Some(3));
        assert_eq!(page.results[0]["id"], 3);
    }

    #[tokio::test]
    async fn get_issues_single_get() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/documents/101/"))
            .respond_with(ok(serde_json::json!({"id": 101, "title": "Memo"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let doc = client.get_resource("documents", 101).await.unwrap();
        assert_eq!(doc["title"], "Memo");
    }

    #[tokio::test]
    async fn create_posts_json_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/projects/"))
            .and(body_json(serde_json::json!({"title": "Queue"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({"id": 7})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let created = client
            .create_resource("projects", &serde_json::json!({"title": "Queue"}))
            .await
            .unwrap();
        assert_eq!(created["id"], 7);
    }

    #[tokio::test]
    async fn update_patches_item_path() {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/projects/42/"))
            .and(body_json(serde_json::json!({"title": "x"})))
            .respond_with(ok(serde_json::json!({"id": 42, "title": "x"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let updated = client
            .update_resource("projects", 42, &serde_json::json!({"title": "x"}))
            .await
            .unwrap();
        assert_eq!(updated["title"], "x");
    }

    #[tokio::test]
    async fn delete_accepts_empty_no_content() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/projects/42/"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        client.delete_resource("projects", 42).await.unwrap();
    }

    #[tokio::test]
    async fn delete_fails_on_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/projects/42/"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.delete_resource("projects", 42).await.unwrap_err();
        assert_eq!(err.status(), Some(403));
    }

    #[tokio::test]
    async fn sub_resource_paths() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/documents/5/notes/"))
            .respond_with(ok(serde_json::json!({"results": []})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/documents/5/notes/9/"))
            .respond_with(ok(serde_json::json!({"id": 9})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let all = client
            .get_sub_resource("documents", 5, "notes", None)
            .await
            .unwrap();
        assert!(all["results"].is_array());

        let one = client
            .get_sub_resource("documents", 5, "notes", Some(ResourceId::from(9)))
            .await
            .unwrap();
        assert_eq!(one["id"], 9);
    }

    #[tokio::test]
    async fn search_sends_query_and_options() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/documents/search"))
            .and(query_param("q", "budget memo"))
            .and(query_param("per_page", "5"))
            .respond_with(ok(serde_json::json!({"count": 1, "results": [{"id": 1}]})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let options = SearchOptions {
            per_page: Some(5),
            ..Default::default()
        };
        let page = client.search_documents("budget memo", &options).await.unwrap();
        assert_eq!(page.total(), 1);
    }

    #[tokio::test]
    async fn error_payload_fails_every_verb() {
        let server = MockServer::start().await;

        Mock::given(wiremock::matchers::any())
            .respond_with(ok(serde_json::json!({"error": "bad input"})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let body = serde_json::json!({"title": "x"});

        assert!(client.list_resources("projects", &ListQuery::default()).await.is_err());
        assert!(client.get_resource("projects", 1).await.is_err());
        assert!(client.create_resource("projects", &body).await.is_err());
        assert!(client.update_resource("projects", 1, &body).await.is_err());
        assert!(client.delete_resource("projects", 1).await.is_err());
        assert!(
            client
                .get_sub_resource("projects", 1, "users", None)
                .await
                .is_err()
        );
        assert!(
            client
                .search_documents("x", &SearchOptions::default())
                .await
                .is_err()
        );
    }
}
