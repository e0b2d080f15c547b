use bytes::Bytes;
use futures::stream::{self, Stream};
use std::io;
use std::pin::Pin;

/// Independently optional attributes of a [`Blob`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlobMeta {
    pub media_type: Option<String>,
    pub size: Option<u64>,
    pub digest: Option<String>,
}

pub type BlobChunks = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send + Sync>>;

/// A read-only byte stream with optional media-type, size, and digest attributes. Blobs are
/// streamed; callers must not assume the content has been fully buffered.
pub struct Blob {
    pub meta: BlobMeta,
    chunks: BlobChunks,
}

impl Blob {
    pub fn new(meta: BlobMeta, chunks: BlobChunks) -> Self {
        Self { meta, chunks }
    }

    /// Build a blob from content already resident in memory (the common case for the `utf8`
    /// and in-memory-repository plug-ins); size is derived from the buffer.
    pub fn from_bytes(data: Bytes, media_type: Option<String>) -> Self {
        let size = data.len() as u64;
        let meta = BlobMeta {
            media_type,
            size: Some(size),
            digest: None,
        };
        Self {
            meta,
            chunks: Box::pin(stream::once(async move { Ok(data) })),
        }
    }

    pub fn into_chunks(self) -> BlobChunks {
        self.chunks
    }

    /// Drains the stream into a single buffer. Only used by plug-ins and tests that need the
    /// whole payload (e.g. to compute a digest); the engine itself never assumes this is cheap.
    pub async fn collect_to_bytes(self) -> io::Result<Bytes> {
        use futures::StreamExt;
        let mut buf = Vec::new();
        let mut chunks = self.chunks;
        while let Some(chunk) = chunks.next().await {
            buf.extend_from_slice(&chunk?);
        }
        Ok(Bytes::from(buf))
    }
}

impl std::fmt::Debug for Blob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Blob").field("meta", &self.meta).finish()
    }
}
