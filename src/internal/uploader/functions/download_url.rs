/// 拼接下载地址：下载域名与 key 之间恰好保留一个 `/`，不论域名本身是否以 `/` 结尾。
pub fn join_download_url(domain: &str, key: &str) -> String {
    format!("{}/{}", domain.trim_end_matches('/'), key)
}
