//! Artifact Decoder - 传输编码内容 → 本地可下载资源
//!
//! 服务端以标准 base64 字母表（带填充）传输翻译后的字幕，
//! 解码只做字节还原，不做任何转换

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::Arc;

use crate::application::ports::{ArtifactError, ArtifactStorePort, DownloadableResult};

/// 解码 base64 内容，忽略其中的 ASCII 空白（换行的 MIME 风格输出）
pub fn decode_content(encoded: &str) -> Result<Vec<u8>, ArtifactError> {
    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| ArtifactError::Decode(e.to_string()))
}

/// Artifact Decoder
pub struct ArtifactDecoder {
    store: Arc<dyn ArtifactStorePort>,
}

impl ArtifactDecoder {
    pub fn new(store: Arc<dyn ArtifactStorePort>) -> Self {
        Self { store }
    }

    /// 解码并物化为带内容类型标记的本地资源
    pub async fn decode(
        &self,
        encoded: &str,
        content_type: &str,
        output_name: &str,
    ) -> Result<DownloadableResult, ArtifactError> {
        let bytes = decode_content(encoded)?;
        tracing::debug!(
            encoded_len = encoded.len(),
            decoded_len = bytes.len(),
            output_name = %output_name,
            "Decoded translated content"
        );
        self.store.materialize(bytes, content_type, output_name).await
    }

    pub fn store(&self) -> &Arc<dyn ArtifactStorePort> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::InMemoryArtifactStore;

    #[test]
    fn test_decode_hello() {
        assert_eq!(decode_content("SGVsbG8=").unwrap(), b"Hello");
    }

    #[test]
    fn test_decoded_length_matches_input() {
        // 覆盖 0/1/2 个填充字符的情况
        for input in [&b""[..], b"a", b"ab", b"abc", b"\x00\xff\x10\x80binary"] {
            let encoded = STANDARD.encode(input);
            let decoded = decode_content(&encoded).unwrap();
            assert_eq!(decoded.len(), input.len());
            assert_eq!(decoded, input);
        }
    }

    #[test]
    fn test_decode_ignores_line_breaks() {
        assert_eq!(decode_content("SGVs\r\nbG8=\n").unwrap(), b"Hello");
    }

    #[test]
    fn test_malformed_input_is_an_error() {
        assert!(matches!(
            decode_content("not base64!"),
            Err(ArtifactError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_decode_materializes_artifact() {
        let store = Arc::new(InMemoryArtifactStore::new());
        let decoder = ArtifactDecoder::new(store.clone());

        let result = decoder
            .decode("SGVsbG8=", "application/x-subrip", "movie_german.srt")
            .await
            .unwrap();

        assert_eq!(result.size, 5);
        assert_eq!(result.content_type, "application/x-subrip");
        assert_eq!(result.file_name, "movie_german.srt");
        assert_eq!(store.read(&result.handle).await.unwrap(), b"Hello");
    }
}
