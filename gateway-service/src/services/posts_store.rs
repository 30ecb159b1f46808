//! The persisted posts snapshot: one JSON array file, overwritten in full on save.

use crate::errors::GatewayError;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Debug, Clone)]
pub struct PostsStore {
    path: PathBuf,
}

impl PostsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `posts` as pretty-printed JSON in a single write.
    ///
    /// No lock and no write-then-rename: concurrent saves are last-write-wins.
    pub async fn save(&self, posts: &[Value]) -> Result<(), GatewayError> {
        let body = serde_json::to_string_pretty(posts)
            .map_err(|e| GatewayError::FileWrite(std::io::Error::other(e)))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(GatewayError::FileWrite)?;
            }
        }

        fs::write(&self.path, body)
            .await
            .map_err(GatewayError::FileWrite)?;

        tracing::info!(
            path = %self.path.display(),
            count = posts.len(),
            "Posts snapshot written"
        );
        Ok(())
    }

    /// Reads and parses the file, whatever JSON value it holds.
    pub async fn load(&self) -> Result<Value, GatewayError> {
        let bytes = fs::read(&self.path).await.map_err(GatewayError::FileRead)?;
        let text = String::from_utf8_lossy(&bytes);

        serde_json::from_str(&text).map_err(|e| GatewayError::JsonParse(e.to_string()))
    }

    /// Like [`PostsStore::load`], but the content must be an array.
    pub async fn load_posts(&self) -> Result<Vec<Value>, GatewayError> {
        match self.load().await? {
            Value::Array(posts) => Ok(posts),
            other => Err(GatewayError::JsonParse(format!(
                "expected an array of posts, found {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
