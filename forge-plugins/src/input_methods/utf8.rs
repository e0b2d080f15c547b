use crate::error::input_error;
use async_trait::async_trait;
use bytes::Bytes;
use forge_model::{Blob, Resource, Source};
use forge_registry::{
    ConsumerIdentity, Credentials, ProcessedResource, ProcessedSource, ResourceInputMethod,
    SourceInputMethod,
};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

pub const TYPE_NAME: &str = "utf8";
pub const TYPE_VERSION: &str = "v2alpha1";

#[derive(Debug, Deserialize)]
struct Utf8Payload {
    text: String,
}

/// Takes inline UTF-8 text from the input spec and returns an in-memory blob (spec §4.7).
/// Needs no credentials — the text lives in the constructor document itself.
pub struct Utf8InputMethod;

fn payload_of(access_or_input: &forge_model::AccessOrInput) -> Option<&forge_model::TypedSpec> {
    access_or_input.input.as_ref()
}

#[async_trait]
impl ResourceInputMethod for Utf8InputMethod {
    fn credential_consumer_identity(&self, _resource: &Resource) -> ConsumerIdentity {
        ConsumerIdentity::NotNeeded
    }

    async fn process_resource(
        &self,
        resource: &Resource,
        _credentials: &Credentials,
        _cancellation: &CancellationToken,
    ) -> Result<ProcessedResource, forge_registry::InputMethodError> {
        let spec = payload_of(&resource.access_or_input).ok_or_else(|| {
            input_error(&resource.meta.name, TYPE_NAME, "resource has no input")
        })?;
        let payload: Utf8Payload = serde_json::from_value(spec.payload.clone())
            .map_err(|e| input_error(&resource.meta.name, TYPE_NAME, e.to_string()))?;
        let blob = Blob::from_bytes(
            Bytes::from(payload.text.into_bytes()),
            Some("text/plain".to_string()),
        );
        Ok(ProcessedResource::Blob(blob))
    }
}

#[async_trait]
impl SourceInputMethod for Utf8InputMethod {
    fn credential_consumer_identity(&self, _source: &Source) -> ConsumerIdentity {
        ConsumerIdentity::NotNeeded
    }

    async fn process_source(
        &self,
        source: &Source,
        _credentials: &Credentials,
        _cancellation: &CancellationToken,
    ) -> Result<ProcessedSource, forge_registry::InputMethodError> {
        let spec = payload_of(&source.access_or_input)
            .ok_or_else(|| input_error(&source.meta.name, TYPE_NAME, "source has no input"))?;
        let payload: Utf8Payload = serde_json::from_value(spec.payload.clone())
            .map_err(|e| input_error(&source.meta.name, TYPE_NAME, e.to_string()))?;
        let blob = Blob::from_bytes(
            Bytes::from(payload.text.into_bytes()),
            Some("text/plain".to_string()),
        );
        Ok(ProcessedSource::Blob(blob))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::assert;
    use forge_model::{AccessOrInput, ElementMeta, TypedSpec, TypedTag};

    fn resource_with_text(text: &str) -> Resource {
        Resource {
            meta: ElementMeta::new("cfg", "v1.0.0"),
            resource_type: "blob".to_string(),
            relation: None,
            source_refs: vec![],
            access_or_input: AccessOrInput::input(TypedSpec::new(
                TypedTag::new(TYPE_NAME, TYPE_VERSION),
                serde_json::json!({ "text": text }),
            )),
        }
    }

    #[tokio::test]
    async fn produces_a_text_plain_blob_of_the_expected_size() {
        let method = Utf8InputMethod;
        let resource = resource_with_text("hi");
        let processed = method
            .process_resource(&resource, &Credentials::new(), &CancellationToken::new())
            .await
            .unwrap();
        match processed {
            ProcessedResource::Blob(blob) => {
                assert!(blob.meta.media_type.as_deref() == Some("text/plain"));
                assert!(blob.meta.size == Some(2));
            }
            ProcessedResource::Resource(_) => panic!("expected a blob"),
        }
    }
}
