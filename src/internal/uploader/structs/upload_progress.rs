/// 上传进度：已确认上传的字节数与文件总大小。
///
/// 调用方通过上传器的 `progress()` 读取或监听；进度比例可用 [`UploadProgress::pct`] 获取。
///
/// 只统计已确认的片字节，不含 mkfile：所有片都传完但合成失败时，进度仍是满的，
/// 上传是否成功以 `status()` 为准。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadProgress {
    /// 已收到成功响应的片的字节数之和
    pub uploaded: u64,
    /// 文件总大小（字节），读取源文件之前为 0
    pub total: u64,
}

impl UploadProgress {
    /// 进度百分比（0～100）；总大小为 0 时返回 `f64::NAN`。
    pub fn pct(&self) -> f64 {
        if self.total == 0 {
            return f64::NAN;
        }
        (self.uploaded as f64 / self.total as f64) * 100.0
    }

    /// 所有片字节都已确认；不代表文件已合成。
    pub fn is_done(&self) -> bool {
        self.total > 0 && self.uploaded >= self.total
    }
}
