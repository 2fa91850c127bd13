use serde::{Deserialize, Serialize};

/// 上传成功后返回的文件信息，创建后不再变化。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub hash: String,
    pub key: String,
    pub name: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub mime_type: String,
    /// 下载地址：下载域名与 key 之间恰好一个 `/`
    pub url: String,
}
