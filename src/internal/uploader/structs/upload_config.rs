use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::internal::auth::structs::upload_token::UploadToken;
use crate::internal::uploader::functions::encode_key::encode_key;
use crate::internal::uploader::functions::split_blocks::validate_sizes;

use super::source_file::SourceFile;
use super::upload_error::UploadError;

/// 默认上传地址
pub const DEFAULT_HOST: &str = "http://upload.qiniu.com";

/// 默认片大小：256KB
pub const DEFAULT_CHUNK_SIZE: u64 = 256 * 1024;

/// 默认块大小：4MB，同时也是服务端允许的块大小上限
pub const DEFAULT_BLOCK_SIZE: u64 = 4 * 1024 * 1024;

/// 服务端允许的块大小上限
pub const MAX_BLOCK_SIZE: u64 = DEFAULT_BLOCK_SIZE;

/// 默认单个请求超时（毫秒）
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 60_000;

/// key 生成函数：同一个文件必须得到同一个 key
pub type KeyFn = Arc<dyn Fn(&SourceFile) -> String + Send + Sync>;

/// 可序列化的上传选项（不含凭证与回调），便于从配置文件加载。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UploadSettings {
    /// 上传目标地址
    pub host: String,
    /// 下载域名，用于拼接下载地址
    pub domain: String,
    /// 片大小（字节）
    pub chunk_size: u64,
    /// 块大小（字节）
    pub block_size: u64,
    /// 单个请求超时（毫秒），`None` 表示不限
    pub request_timeout_ms: Option<u64>,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            domain: String::new(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            block_size: DEFAULT_BLOCK_SIZE,
            request_timeout_ms: Some(DEFAULT_REQUEST_TIMEOUT_MS),
        }
    }
}

/// 单个文件上传的完整配置：选项 + 凭证 + 可选的 key 生成函数。
///
/// clone 很便宜（凭证提供函数与 key 函数都在 Arc 里），批量上传时每个文件一份。
#[derive(Clone)]
pub struct UploadConfig {
    pub(crate) settings: UploadSettings,
    pub(crate) token: UploadToken,
    pub(crate) key_fn: Option<KeyFn>,
}

impl UploadConfig {
    /// 使用默认选项创建配置。
    pub fn new(token: impl Into<UploadToken>) -> Self {
        Self::from_settings(UploadSettings::default(), token)
    }

    /// 使用已加载的选项创建配置。
    pub fn from_settings(settings: UploadSettings, token: impl Into<UploadToken>) -> Self {
        Self {
            settings,
            token: token.into(),
            key_fn: None,
        }
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.settings.host = host.into();
        self
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.settings.domain = domain.into();
        self
    }

    pub fn chunk_size(mut self, chunk_size: u64) -> Self {
        self.settings.chunk_size = chunk_size;
        self
    }

    pub fn block_size(mut self, block_size: u64) -> Self {
        self.settings.block_size = block_size;
        self
    }

    /// 设置单个请求超时；传 `None` 表示不限。
    pub fn request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.settings.request_timeout_ms = timeout.map(|t| (t.as_millis() as u64).max(1));
        self
    }

    /// 设置 key 生成函数；不设置时 key 为空，由服务端决定。
    pub fn get_key<F>(mut self, f: F) -> Self
    where
        F: Fn(&SourceFile) -> String + Send + Sync + 'static,
    {
        self.key_fn = Some(Arc::new(f));
        self
    }

    pub fn settings(&self) -> &UploadSettings {
        &self.settings
    }

    pub(crate) fn request_timeout_duration(&self) -> Option<Duration> {
        self.settings.request_timeout_ms.map(Duration::from_millis)
    }

    /// 校验并规范化上传地址（去掉结尾的 `/`）。
    pub(crate) fn upload_host(&self) -> Result<String, UploadError> {
        let host = self.settings.host.trim();
        if host.is_empty() {
            return Err(UploadError::Configuration("上传地址为空".to_string()));
        }
        Url::parse(host)
            .map_err(|e| UploadError::Configuration(format!("上传地址格式错误 {host}: {e}")))?;
        Ok(host.trim_end_matches('/').to_string())
    }

    /// 校验块/片大小。
    pub(crate) fn validate_sizes(&self) -> Result<(), UploadError> {
        validate_sizes(self.settings.block_size, self.settings.chunk_size)?;
        if self.settings.block_size > MAX_BLOCK_SIZE {
            return Err(UploadError::Configuration(format!(
                "block_size ({}) 超出服务端上限 {MAX_BLOCK_SIZE}",
                self.settings.block_size
            )));
        }
        Ok(())
    }

    /// mkfile 路径中使用的 key：key 函数结果的 URL 安全 base64，未设置时为空。
    pub(crate) fn encoded_key(&self, source: &SourceFile) -> String {
        match &self.key_fn {
            Some(f) => encode_key(&f(source)),
            None => String::new(),
        }
    }
}

impl fmt::Debug for UploadConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadConfig")
            .field("settings", &self.settings)
            .field("token", &self.token)
            .field("key_fn", &self.key_fn.as_ref().map(|_| "<fn>"))
            .finish()
    }
}
