//! HTTP client for the REST endpoints.

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

use taskboard_core::wire::{
    BulkUpdateRequest, BulkUpdateResponse, CreateProjectRequest, CreateTaskRequest,
    CreateWorkspaceRequest, ErrorResponse, JoinWorkspaceRequest, MoveTaskRequest,
    MoveTaskResponse, TaskQuery, WorkspaceQuery,
};
use taskboard_core::{
    ActingIdentity, Member, Project, ProjectId, Task, TaskId, Workspace, WorkspaceId,
};

use crate::error::ClientError;

/// HTTP client acting on behalf of one user.
#[derive(Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    base_url: String,
    identity: ActingIdentity,
}

impl HttpClient {
    /// Create a new HTTP client.
    pub fn new(base_url: &str, identity: ActingIdentity) -> Self {
        Self {
            inner: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            identity,
        }
    }

    /// The identity sent with every request.
    pub fn identity(&self) -> &ActingIdentity {
        &self.identity
    }

    /// Check if the server is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let url = format!("{}/health", self.base_url);
        debug!(url = %url, "Checking health");

        let response = self
            .inner
            .get(&url)
            .send()
            .await
            .map_err(|e| ClientError::Connection(e.to_string()))?;
        Ok(response.status().is_success())
    }

    pub async fn list_workspaces(&self) -> Result<Vec<Workspace>, ClientError> {
        self.send(self.request(Method::GET, "/v1/workspaces")).await
    }

    pub async fn create_workspace(
        &self,
        req: &CreateWorkspaceRequest,
    ) -> Result<Workspace, ClientError> {
        self.send(self.request(Method::POST, "/v1/workspaces").json(req))
            .await
    }

    pub async fn join_workspace(
        &self,
        workspace_id: &WorkspaceId,
        invite_code: &str,
    ) -> Result<Member, ClientError> {
        let path = format!("/v1/workspaces/{workspace_id}/join");
        let body = JoinWorkspaceRequest {
            invite_code: invite_code.to_string(),
        };
        self.send(self.request(Method::POST, &path).json(&body)).await
    }

    pub async fn list_members(
        &self,
        workspace_id: &WorkspaceId,
    ) -> Result<Vec<Member>, ClientError> {
        let path = format!("/v1/workspaces/{workspace_id}/members");
        self.send(self.request(Method::GET, &path)).await
    }

    pub async fn list_projects(
        &self,
        workspace_id: &WorkspaceId,
    ) -> Result<Vec<Project>, ClientError> {
        let query = WorkspaceQuery {
            workspace_id: workspace_id.clone(),
        };
        self.send(self.request(Method::GET, "/v1/projects").query(&query))
            .await
    }

    pub async fn create_project(&self, req: &CreateProjectRequest) -> Result<Project, ClientError> {
        self.send(self.request(Method::POST, "/v1/projects").json(req))
            .await
    }

    pub async fn create_task(&self, req: &CreateTaskRequest) -> Result<Task, ClientError> {
        self.send(self.request(Method::POST, "/v1/tasks").json(req))
            .await
    }

    pub async fn list_tasks(&self, query: &TaskQuery) -> Result<Vec<Task>, ClientError> {
        self.send(self.request(Method::GET, "/v1/tasks").query(query))
            .await
    }

    /// Every task of a project. Unlike [`list_tasks`](Self::list_tasks)
    /// this is never truncated, so it is safe to plan moves against.
    pub async fn project_board(&self, project_id: &ProjectId) -> Result<Vec<Task>, ClientError> {
        let path = format!("/v1/projects/{project_id}/board");
        self.send(self.request(Method::GET, &path)).await
    }

    /// Ask the server to plan and persist a move.
    pub async fn move_task(
        &self,
        task_id: &TaskId,
        req: &MoveTaskRequest,
    ) -> Result<MoveTaskResponse, ClientError> {
        let path = format!("/v1/tasks/{task_id}/move");
        self.send(self.request(Method::POST, &path).json(req)).await
    }

    /// Persist a locally planned batch.
    pub async fn bulk_update(
        &self,
        req: &BulkUpdateRequest,
    ) -> Result<BulkUpdateResponse, ClientError> {
        self.send(self.request(Method::POST, "/v1/tasks/bulk-update").json(req))
            .await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(method = %method, url = %url, "Request");

        let mut builder = self
            .inner
            .request(method, url)
            .header("x-user-id", self.identity.user_id.as_str());
        if let Some(name) = &self.identity.name {
            builder = builder.header("x-user-name", name);
        }
        if let Some(email) = &self.identity.email {
            builder = builder.header("x-user-email", email);
        }
        builder
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(decode_error(status.as_u16(), &body));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::Serialization(e.to_string()))
    }
}

/// Turn a non-2xx response body into a [`ClientError`].
pub fn decode_error(status: u16, body: &str) -> ClientError {
    let Ok(err) = serde_json::from_str::<ErrorResponse>(body) else {
        return ClientError::Api {
            status,
            code: "unknown".to_string(),
            message: body.to_string(),
        };
    };

    match (status, err.code.as_str()) {
        (404, _) => ClientError::NotFound(err.error),
        (_, "partial_update_failure") => ClientError::PartialUpdate {
            failed: err.failed.into_iter().map(TaskId::from).collect(),
            applied: err.applied.into_iter().map(TaskId::from).collect(),
            rejected: err.rejected,
        },
        _ => ClientError::Api {
            status,
            code: err.code,
            message: err.error,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_partial_failure() {
        let body = r#"{"error":"Partial update failure: 1 of 3 updates failed","code":"partial_update_failure","failed":["t2"],"applied":["t1","t3"],"rejected":[{"task_id":"t4","code":"invalid_column","error":"Invalid column: SOMEDAY"}]}"#;
        match decode_error(409, body) {
            ClientError::PartialUpdate {
                failed,
                applied,
                rejected,
            } => {
                assert_eq!(failed, vec![TaskId::new("t2")]);
                assert_eq!(applied.len(), 2);
                assert_eq!(rejected.len(), 1);
                assert_eq!(rejected[0].task_id, "t4");
                assert_eq!(rejected[0].code, "invalid_column");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_decode_not_found_and_api_errors() {
        let body = r#"{"error":"Task not found: x","code":"not_found"}"#;
        assert!(matches!(decode_error(404, body), ClientError::NotFound(msg) if msg == "Task not found: x"));

        let body = r#"{"error":"Invalid column: LATER","code":"invalid_column"}"#;
        match decode_error(400, body) {
            ClientError::Api { status, code, .. } => {
                assert_eq!(status, 400);
                assert_eq!(code, "invalid_column");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_decode_non_json_body() {
        match decode_error(502, "Bad Gateway") {
            ClientError::Api { code, message, .. } => {
                assert_eq!(code, "unknown");
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
