// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking Kubernetes API responses and git remotes.

use git2::{build::RepoBuilder, IndexAddOption, Oid, Repository, RepositoryInitOptions, Signature};
use http::{Method, Request, Response};
use k8s_openapi::api::core::v1::Secret;
use kube::client::Body;
use kube::Client;
use std::fs;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tempfile::TempDir;
use tower::Service;

/// Fake Kubernetes API answering GET requests from canned responses.
///
/// Routes match on the request path, longest prefix first. Every request
/// uri is recorded so tests can check the query that was sent.
#[derive(Clone, Default)]
pub struct MockService {
    routes: Arc<Mutex<Vec<(String, u16, String)>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer GET requests below `path` with `status` and a JSON `body`
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.routes
            .lock()
            .unwrap()
            .push((path.to_string(), status, body.to_string()));
        self
    }

    /// Handle for inspecting requests after the service moved into a client
    pub fn recorder(&self) -> Arc<Mutex<Vec<String>>> {
        self.requests.clone()
    }

    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    fn route(&self, path: &str) -> (u16, String) {
        self.routes
            .lock()
            .unwrap()
            .iter()
            .filter(|(prefix, _, _)| path.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _, _)| prefix.len())
            .map(|(_, status, body)| (*status, body.clone()))
            .unwrap_or_else(|| {
                (
                    404,
                    r#"{"kind":"Status","apiVersion":"v1","status":"Failure","message":"not found","reason":"NotFound","code":404}"#
                        .to_string(),
                )
            })
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        self.requests.lock().unwrap().push(req.uri().to_string());
        let (status, body) = if *req.method() == Method::GET {
            self.route(req.uri().path())
        } else {
            (405, String::new())
        };

        Box::pin(async move {
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// Create a mock SecretList JSON response
pub fn secret_list_json(secrets: &[Secret]) -> String {
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "SecretList",
        "metadata": { "resourceVersion": "1" },
        "items": secrets,
    })
    .to_string()
}

/// Create a local bare repository on branch `main` holding one commit with `files`.
/// Returns the scratch dir owning it and the remote url.
pub fn init_remote(files: &[(&str, &str)]) -> (TempDir, String) {
    let root = tempfile::tempdir().unwrap();
    let seed_path = root.path().join("seed");

    let mut opts = RepositoryInitOptions::new();
    opts.initial_head("main");
    let seed = Repository::init_opts(&seed_path, &opts).unwrap();
    for (path, content) in files {
        let full = seed_path.join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
    }

    let mut index = seed.index().unwrap();
    index
        .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
        .unwrap();
    index.write().unwrap();
    let tree = seed.find_tree(index.write_tree().unwrap()).unwrap();
    let sig = Signature::now("test", "test@example.com").unwrap();
    seed.commit(Some("HEAD"), &sig, &sig, "initial", &tree, &[])
        .unwrap();

    let remote_path = root.path().join("remote.git");
    RepoBuilder::new()
        .bare(true)
        .clone(seed_path.to_str().unwrap(), &remote_path)
        .unwrap();

    let url = remote_path.to_string_lossy().into_owned();
    (root, url)
}

/// Commit id of `refs/heads/main` in a bare remote
pub fn remote_head(url: &str) -> Oid {
    Repository::open_bare(url)
        .unwrap()
        .refname_to_id("refs/heads/main")
        .unwrap()
}

/// Content of `path` in the `main` branch of a bare remote
pub fn remote_file(url: &str, path: &str) -> Option<String> {
    let repo = Repository::open_bare(url).unwrap();
    let commit = repo.find_commit(remote_head(url)).unwrap();
    let entry = commit.tree().unwrap().get_path(std::path::Path::new(path)).ok()?;
    let blob = repo.find_blob(entry.id()).unwrap();
    Some(String::from_utf8(blob.content().to_vec()).unwrap())
}
