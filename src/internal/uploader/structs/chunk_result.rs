use serde::{Deserialize, Serialize};

/// 单片上传的响应（mkblk / bput 共用）。
///
/// - `ctx`：块级上传控制信息，只能由服务端解读，上传端不应修改；
///   每次返回的 ctx 只对应紧随其后的下一片，也用于最后的 mkfile
/// - `checksum` / `crc32`：上传块校验信息，这里只透传，不做本地校验
/// - `offset`：下一片在块中的偏移
/// - `host`：后续请求应发往的地址，可能为空
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkResult {
    pub ctx: String,
    #[serde(default)]
    pub checksum: String,
    #[serde(default)]
    pub crc32: u64,
    pub offset: u64,
    #[serde(default)]
    pub host: Option<String>,
}

impl ChunkResult {
    /// 服务端指定的后续上传地址；空字符串视为未指定。
    pub fn next_host(&self) -> Option<&str> {
        self.host
            .as_deref()
            .map(|h| h.trim_end_matches('/'))
            .filter(|h| !h.is_empty())
    }
}

/// mkfile 的响应。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCreated {
    pub hash: String,
    pub key: String,
}
