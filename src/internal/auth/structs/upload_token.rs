use core::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::HeaderValue;
use sha2::{Digest, Sha256};

use crate::internal::uploader::structs::UploadError;

/// 异步获取上传凭证的能力（例如向业务服务端换取 token）。
///
/// 一次上传只会调用一次，结果在任何网络请求发出之前解析完毕。
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn fetch_token(&self) -> Result<String, String>;
}

/// 把闭包包装成 [`TokenProvider`]，供 [`UploadToken::provider`] 使用。
struct FnTokenProvider<F>(F);

#[async_trait]
impl<F, Fut> TokenProvider for FnTokenProvider<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String, String>> + Send + 'static,
{
    async fn fetch_token(&self) -> Result<String, String> {
        (self.0)().await
    }
}

/// 上传凭证来源：静态字符串，或异步获取函数。
#[derive(Clone)]
pub enum UploadToken {
    Static(String),
    Provider(Arc<dyn TokenProvider>),
}

impl UploadToken {
    /// 使用固定的 token 字符串。
    pub fn new(token: impl Into<String>) -> Self {
        Self::Static(token.into())
    }

    /// 使用异步闭包获取 token；闭包返回 `Err` 时本次上传以配置错误结束。
    pub fn provider<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, String>> + Send + 'static,
    {
        Self::Provider(Arc::new(FnTokenProvider(f)))
    }

    /// 使用自定义的 [`TokenProvider`] 实现。
    pub fn from_provider(provider: impl TokenProvider + 'static) -> Self {
        Self::Provider(Arc::new(provider))
    }

    /// 解析出最终可用的 token；提供函数只会被调用这一次。
    pub(crate) async fn resolve(&self) -> Result<ResolvedToken, UploadError> {
        let raw = match self {
            Self::Static(token) => token.clone(),
            Self::Provider(provider) => {
                provider.fetch_token().await.map_err(|e| {
                    UploadError::Configuration(format!("获取上传凭证失败: {e}"))
                })?
            }
        };
        ResolvedToken::new(&raw)
    }
}

impl From<&str> for UploadToken {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for UploadToken {
    fn from(value: String) -> Self {
        Self::Static(value)
    }
}

/// 防止debug泄漏凭证
impl fmt::Debug for UploadToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(_) => f.write_str("UploadToken::Static(<hidden>)"),
            Self::Provider(_) => f.write_str("UploadToken::Provider(..)"),
        }
    }
}

/// 已解析的上传凭证
///
/// - 内部只保存拼好的 `Authorization: UpToken <token>` 请求头（标记为敏感）
/// - 日志与比较统一使用 sha256 指纹，原文不会再出现
#[derive(Clone)]
pub struct ResolvedToken {
    authorization: HeaderValue,
    fingerprint: Arc<String>,
}

impl ResolvedToken {
    pub fn new(raw: &str) -> Result<Self, UploadError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(UploadError::Configuration("上传凭证为空".to_string()));
        }

        let mut authorization = HeaderValue::from_str(&format!("UpToken {raw}"))
            .map_err(|e| UploadError::Configuration(format!("上传凭证格式错误: {e}")))?;
        authorization.set_sensitive(true);

        let mut hasher = Sha256::new();
        hasher.update(raw.as_bytes());

        Ok(Self {
            authorization,
            fingerprint: Arc::new(format!("{:x}", hasher.finalize())),
        })
    }

    /// `Authorization` 请求头的值。
    pub fn authorization(&self) -> &HeaderValue {
        &self.authorization
    }

    /// token 的 sha256 指纹（十六进制），只用于日志与比较。
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// 日志里使用的短指纹
    pub(crate) fn short_fingerprint(&self) -> &str {
        &self.fingerprint[..12]
    }
}

impl PartialEq for ResolvedToken {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint == other.fingerprint
    }
}

impl Eq for ResolvedToken {}

impl fmt::Debug for ResolvedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedToken")
            .field("fingerprint", &self.short_fingerprint())
            .finish()
    }
}
