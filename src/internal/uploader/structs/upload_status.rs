/// 上传状态（由上传器内部维护，外部只读监听）
///
/// `Idle → TokenResolving → Chunking → BlocksInFlight → Finalizing → Completed`，
/// 任一步出错都进入 `Failed`。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UploadStatus {
    #[default]
    Idle,
    TokenResolving,
    Chunking,
    BlocksInFlight,
    Finalizing,
    Completed,
    Failed,
}

impl UploadStatus {
    /// 是否为终态
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}
