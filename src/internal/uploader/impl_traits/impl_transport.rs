//! 基于 reqwest 的传输层实现。

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Body, Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::internal::auth::structs::upload_token::ResolvedToken;
use crate::internal::uploader::structs::{ChunkResult, FileCreated, UploadError};
use crate::internal::uploader::traits::transport::UploadTransport;

const OCTET_STREAM: &str = "application/octet-stream";
const TEXT_PLAIN: &str = "text/plain";

/// 失败响应体，只关心 `error` 字段
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// 默认传输层：每个请求都带 `Authorization: UpToken <token>`。
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// 创建传输层；`request_timeout` 为单个请求的超时，`None` 表示不限。
    pub fn new(request_timeout: Option<Duration>) -> Result<Self, UploadError> {
        let mut builder = Client::builder();
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self { client })
    }

    /// 复用调用方已有的 reqwest 客户端（内部是Arc，clone 很便宜）。
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn post<T: DeserializeOwned>(
        &self,
        url: String,
        content_type: &'static str,
        token: &ResolvedToken,
        body: impl Into<Body>,
    ) -> Result<T, UploadError> {
        // 组装请求头
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers.insert(AUTHORIZATION, token.authorization().clone());

        debug!(%url, "发送上传请求");

        let res = self
            .client
            .post(&url)
            .headers(headers)
            .body(body)
            .send()
            .await?;

        let status = res.status();
        let payload = res.bytes().await?;

        if !status.is_success() {
            return Err(UploadError::Protocol {
                status: status.as_u16(),
                message: error_message(status, &payload),
            });
        }

        serde_json::from_slice(&payload)
            .map_err(|e| UploadError::InvalidResponse(format!("{url}: {e}")))
    }
}

/// 从失败响应中取出错误信息：优先 `error` 字段，其次原始响应体，最后是状态码描述。
fn error_message(status: StatusCode, payload: &[u8]) -> String {
    if let Ok(ErrorBody { error: Some(message) }) = serde_json::from_slice(payload) {
        if !message.is_empty() {
            return message;
        }
    }

    let text = String::from_utf8_lossy(payload).trim().to_string();
    if !text.is_empty() {
        return text;
    }

    status
        .canonical_reason()
        .unwrap_or("未知错误")
        .to_string()
}

#[async_trait]
impl UploadTransport for HttpTransport {
    async fn make_block(
        &self,
        host: &str,
        block_size: u64,
        first_chunk: Bytes,
        token: &ResolvedToken,
    ) -> Result<ChunkResult, UploadError> {
        let url = format!("{host}/mkblk/{block_size}");
        self.post(url, OCTET_STREAM, token, first_chunk).await
    }

    async fn put_chunk(
        &self,
        host: &str,
        ctx: &str,
        offset: u64,
        chunk: Bytes,
        token: &ResolvedToken,
    ) -> Result<ChunkResult, UploadError> {
        let url = format!("{host}/bput/{ctx}/{offset}");
        self.post(url, OCTET_STREAM, token, chunk).await
    }

    async fn make_file(
        &self,
        host: &str,
        file_size: u64,
        encoded_key: &str,
        ctx_list: String,
        token: &ResolvedToken,
    ) -> Result<FileCreated, UploadError> {
        let url = format!("{host}/mkfile/{file_size}/key/{encoded_key}");
        self.post(url, TEXT_PLAIN, token, ctx_list).await
    }
}
