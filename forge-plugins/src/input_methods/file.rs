use crate::error::input_error;
use async_trait::async_trait;
use forge_model::{Blob, Resource, Source};
use forge_registry::{
    ConsumerIdentity, Credentials, InputMethodError, ProcessedResource, ProcessedSource,
    ResourceInputMethod, SourceInputMethod,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio_util::io::ReaderStream;
use tokio_util::sync::CancellationToken;

pub const TYPE_NAME: &str = "file";
pub const TYPE_VERSION: &str = "v1";

#[derive(Debug, Deserialize)]
struct FilePayload {
    path: String,
}

/// Reads a local file path relative to a configured base directory, streaming it from disk
/// rather than buffering it in memory (spec §4.7). Needs no credentials.
pub struct FileInputMethod {
    base_dir: PathBuf,
}

impl FileInputMethod {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    async fn read_blob(&self, identity: &str, relative: &str) -> Result<Blob, InputMethodError> {
        let resolved = resolve_within_base(&self.base_dir, relative)
            .ok_or_else(|| input_error(identity, TYPE_NAME, "path escapes base directory"))?;

        let file = tokio::fs::File::open(&resolved)
            .await
            .map_err(|e| input_error(identity, TYPE_NAME, e.to_string()))?;
        let metadata = file
            .metadata()
            .await
            .map_err(|e| input_error(identity, TYPE_NAME, e.to_string()))?;
        let media_type = guess_media_type(&resolved);
        let size = metadata.len();
        let stream = ReaderStream::new(file);

        let chunks: forge_model::BlobChunks = Box::pin(stream);
        let mut blob = Blob::new(
            forge_model::BlobMeta {
                media_type,
                size: Some(size),
                digest: None,
            },
            chunks,
        );
        blob.meta.size = Some(size);
        Ok(blob)
    }
}

fn resolve_within_base(base: &Path, relative: &str) -> Option<PathBuf> {
    if Path::new(relative).is_absolute() {
        return None;
    }
    let mut depth: i64 = 0;
    for component in Path::new(relative).components() {
        match component {
            std::path::Component::ParentDir => depth -= 1,
            std::path::Component::Normal(_) => depth += 1,
            std::path::Component::CurDir => {}
            _ => return None,
        }
        if depth < 0 {
            return None;
        }
    }
    Some(base.join(relative))
}

fn guess_media_type(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let media_type = match ext.as_str() {
        "txt" => "text/plain",
        "json" => "application/json",
        "yaml" | "yml" => "application/yaml",
        "wasm" => "application/wasm",
        "tar" => "application/x-tar",
        "gz" | "tgz" => "application/gzip",
        _ => return None,
    };
    Some(media_type.to_string())
}

#[async_trait]
impl ResourceInputMethod for FileInputMethod {
    fn credential_consumer_identity(&self, _resource: &Resource) -> ConsumerIdentity {
        ConsumerIdentity::NotNeeded
    }

    async fn process_resource(
        &self,
        resource: &Resource,
        _credentials: &Credentials,
        cancellation: &CancellationToken,
    ) -> Result<ProcessedResource, InputMethodError> {
        if cancellation.is_cancelled() {
            return Err(input_error(&resource.meta.name, TYPE_NAME, "cancelled"));
        }
        let spec = resource
            .access_or_input
            .input
            .as_ref()
            .ok_or_else(|| input_error(&resource.meta.name, TYPE_NAME, "resource has no input"))?;
        let payload: FilePayload = serde_json::from_value(spec.payload.clone())
            .map_err(|e| input_error(&resource.meta.name, TYPE_NAME, e.to_string()))?;
        let blob = self.read_blob(&resource.meta.name, &payload.path).await?;
        Ok(ProcessedResource::Blob(blob))
    }
}

#[async_trait]
impl SourceInputMethod for FileInputMethod {
    fn credential_consumer_identity(&self, _source: &Source) -> ConsumerIdentity {
        ConsumerIdentity::NotNeeded
    }

    async fn process_source(
        &self,
        source: &Source,
        _credentials: &Credentials,
        cancellation: &CancellationToken,
    ) -> Result<ProcessedSource, InputMethodError> {
        if cancellation.is_cancelled() {
            return Err(input_error(&source.meta.name, TYPE_NAME, "cancelled"));
        }
        let spec = source
            .access_or_input
            .input
            .as_ref()
            .ok_or_else(|| input_error(&source.meta.name, TYPE_NAME, "source has no input"))?;
        let payload: FilePayload = serde_json::from_value(spec.payload.clone())
            .map_err(|e| input_error(&source.meta.name, TYPE_NAME, e.to_string()))?;
        let blob = self.read_blob(&source.meta.name, &payload.path).await?;
        Ok(ProcessedSource::Blob(blob))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::assert;
    use forge_model::{AccessOrInput, ElementMeta, TypedSpec, TypedTag};
    use std::io::Write;

    fn resource_with_path(path: &str) -> Resource {
        Resource {
            meta: ElementMeta::new("cfg", "v1.0.0"),
            resource_type: "blob".to_string(),
            relation: None,
            source_refs: vec![],
            access_or_input: AccessOrInput::input(TypedSpec::new(
                TypedTag::new(TYPE_NAME, TYPE_VERSION),
                serde_json::json!({ "path": path }),
            )),
        }
    }

    #[tokio::test]
    async fn reads_a_file_relative_to_the_base_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("hello.txt");
        std::fs::File::create(&file_path)
            .unwrap()
            .write_all(b"hello")
            .unwrap();

        let method = FileInputMethod::new(dir.path());
        let resource = resource_with_path("hello.txt");
        let processed = method
            .process_resource(&resource, &Credentials::new(), &CancellationToken::new())
            .await
            .unwrap();
        match processed {
            ProcessedResource::Blob(blob) => {
                assert!(blob.meta.media_type.as_deref() == Some("text/plain"));
                assert!(blob.meta.size == Some(5));
            }
            ProcessedResource::Resource(_) => panic!("expected a blob"),
        }
    }

    #[tokio::test]
    async fn rejects_paths_that_escape_the_base_directory() {
        let dir = tempfile::tempdir().unwrap();
        let method = FileInputMethod::new(dir.path());
        let resource = resource_with_path("../escape.txt");
        let err = method
            .process_resource(&resource, &Credentials::new(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(err.message.contains("escapes base directory"));
    }
}
