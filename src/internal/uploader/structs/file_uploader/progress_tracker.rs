//! 进度聚合：各块任务只负责上报本片字节数，累加与回调都在单独的分发任务里完成。
//!
//! 上报走无界通道，上传流水线不会被钩子阻塞；累加只在一个任务里发生，进度天然单调不减。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;

use crate::internal::uploader::structs::{UploadError, UploadHooksContainer, UploadProgress};

/// 块任务持有的上报端。
#[derive(Debug, Clone)]
pub(crate) struct ProgressSender {
    sender: mpsc::UnboundedSender<u64>,
}

impl ProgressSender {
    /// 上报一片上传成功的字节数。分发任务已退出时静默丢弃。
    pub(crate) fn record(&self, bytes: u64) {
        let _ = self.sender.send(bytes);
    }
}

pub(crate) struct ProgressTracker {
    sender: ProgressSender,
    discarded: Arc<AtomicBool>,
    dispatcher: JoinHandle<u64>,
}

impl ProgressTracker {
    /// 启动分发任务。
    pub(crate) fn spawn(
        total: u64,
        hooks: Arc<Mutex<UploadHooksContainer>>,
        state: Arc<watch::Sender<UploadProgress>>,
    ) -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<u64>();
        let discarded = Arc::new(AtomicBool::new(false));
        let discarded_flag = Arc::clone(&discarded);

        state.send_replace(UploadProgress { uploaded: 0, total });

        let dispatcher = tokio::spawn(async move {
            let mut uploaded: u64 = 0;
            while let Some(bytes) = receiver.recv().await {
                // 失败之后其余块迟到的进度一律丢弃
                if discarded_flag.load(Ordering::Acquire) {
                    continue;
                }
                uploaded += bytes;
                state.send_replace(UploadProgress { uploaded, total });
                hooks.lock().await.run_on_progress(uploaded, total);
            }
            uploaded
        });

        Self {
            sender: ProgressSender { sender },
            discarded,
            dispatcher,
        }
    }

    pub(crate) fn sender(&self) -> ProgressSender {
        self.sender.clone()
    }

    /// 所有块成功后调用：等待已上报的进度全部分发完毕，返回最终累计字节数。
    ///
    /// 调用前所有 [`ProgressSender`] 必须已经释放，否则会一直等待。
    pub(crate) async fn finish(self) -> Result<u64, UploadError> {
        let Self {
            sender, dispatcher, ..
        } = self;
        drop(sender);
        Ok(dispatcher.await?)
    }

    /// 失败后调用：不再等待，后续上报全部丢弃；分发任务在最后一个上报端释放后自行退出。
    pub(crate) fn discard(self) {
        self.discarded.store(true, Ordering::Release);
    }
}
