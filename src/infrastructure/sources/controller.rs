use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

use crate::domain::{api_data::ApiDataMap, ports::ControllerSource};

/// Controller snapshot saved to disk: a JSON object mapping each connection
/// key to the controller's record for that link.
pub struct JsonControllerSource {
    path: PathBuf,
}

impl JsonControllerSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ControllerSource for JsonControllerSource {
    async fn fetch_connections(&self) -> Result<ApiDataMap> {
        let body = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read controller snapshot: {}", self.path.display()))?;
        let value: serde_json::Value = serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse controller JSON: {}", self.path.display()))?;
        let data = ApiDataMap::from_value(value)
            .with_context(|| format!("Unexpected controller snapshot shape: {}", self.path.display()))?;
        debug!(path = %self.path.display(), connections = data.len(), "controller snapshot loaded");
        Ok(data)
    }

    fn describe(&self) -> String {
        format!("json:{}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::api_data::PayloadShapeError;
    use crate::domain::value_objects::ConnectionKey;
    use std::io::Write;

    fn snapshot(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn keyed_records_are_loaded() {
        let file = snapshot(
            r#"{
                "leaf-01-et-0/0/1": {"server": {"label": "srv1"}},
                "leaf-02-et-0/0/3": {}
            }"#,
        );
        let data = JsonControllerSource::new(file.path())
            .fetch_connections()
            .await
            .unwrap();
        assert_eq!(data.len(), 2);
        assert!(data.contains(&ConnectionKey::from("leaf-02-et-0/0/3")));
    }

    #[tokio::test]
    async fn top_level_array_is_rejected() {
        let file = snapshot(r#"[{"server": {"label": "srv1"}}]"#);
        let err = JsonControllerSource::new(file.path())
            .fetch_connections()
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("shape"));
        assert_eq!(
            err.downcast_ref::<PayloadShapeError>(),
            Some(&PayloadShapeError::NotAMap("an array"))
        );
    }
}
