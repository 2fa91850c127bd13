use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;

/// 对存储 key 做 URL 安全的 base64 编码（`+` → `-`，`/` → `_`，保留 `=` 填充），用于 mkfile 路径。
///
/// 空 key 编码后仍为空字符串，此时由服务端按上传策略决定最终 key。
pub fn encode_key(key: &str) -> String {
    URL_SAFE.encode(key.as_bytes())
}
