//! 文件上传器
//!
//! 本模块实现了七牛风格的分片上传（mkblk / bput / mkfile），一个上传器只负责一个文件。
//!
//! ## 功能特性
//!
//! - **块内串行**：同一块内的片严格按顺序上传，每一片都使用上一片响应里的 ctx
//! - **块间并发**：每块一个任务，不限并发数；任一块失败立即结束并尽力取消其余块
//! - **响应式进度**：通过 `progress()` / `status()` 获取可监听的进度与状态
//! - **钩子机制**：支持在上传各阶段插入自定义逻辑（开始前、状态切换、进度、完成后、失败）
//!
//! ## 使用示例
//!
//! ```rust,no_run
//! # use qiniu_chunk_upload::uploader::{FileUploader, SourceFile, UploadConfig};
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = UploadConfig::new("<upload token>").domain("https://cdn.example.com");
//! let source = SourceFile::from_path("large_file.zip").await?;
//!
//! let file = FileUploader::new(config)
//!     .with_on_progress_hook(|uploaded, total| println!("{uploaded}/{total}"))
//!     .send(&source)
//!     .await?;
//! println!("下载地址: {}", file.url);
//! # Ok(())
//! # }
//! ```
//!
//! ## 内部实现说明
//!
//! - `block_coordinator` 子模块：每块一个任务的并发调度与首错锁存
//! - `progress_tracker` 子模块：进度累加与非阻塞回调
//! - `finalize` 子模块：mkfile 请求与文件信息组装
//!
//! 失败不做任何重试，也不保存已完成块的 ctx，重新上传需从头开始。

mod block_coordinator;
mod finalize;
mod progress_tracker;

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use tokio::sync::{Mutex, watch};
use tracing::{info, warn};

use crate::internal::uploader::functions::split_blocks::split_blocks;
use crate::internal::uploader::impl_traits::impl_transport::HttpTransport;
use crate::internal::uploader::traits::transport::UploadTransport;
use crate::internal::uploader::traits::upload::{HookAbort, UploadHook};

use super::block_session::RequestContext;
use super::hook_adapters::{
    AfterCompleteHookAdapter, BeforeStartHookAdapter, OnErrorHookAdapter,
    OnProgressHookAdapter, OnStatusHookAdapter,
};
use super::{
    FileDescriptor, SourceFile, UploadConfig, UploadError, UploadHooksContainer,
    UploadProgress, UploadStatus,
};

use block_coordinator::{RunBlocksParams, run_blocks};
pub(crate) use finalize::{FinalizeParams, describe_file, finalize};
use progress_tracker::ProgressTracker;

/// 单文件上传器
///
/// 拥有响应式属性：上传进度（`progress()`）与状态机状态（`status()`）。
/// `send` 会消耗上传器本身，保证一个实例只上传一个文件。
pub struct FileUploader {
    config: UploadConfig,
    transport: Option<Arc<dyn UploadTransport>>,
    hooks: UploadHooksContainer,
    progress_state: Arc<watch::Sender<UploadProgress>>,
    status_state: Arc<watch::Sender<UploadStatus>>,
}

impl FileUploader {
    pub fn new(config: UploadConfig) -> Self {
        let (progress_state, _) = watch::channel(UploadProgress::default());
        let (status_state, _) = watch::channel(UploadStatus::Idle);
        Self {
            config,
            transport: None,
            hooks: UploadHooksContainer::default(),
            progress_state: Arc::new(progress_state),
            status_state: Arc::new(status_state),
        }
    }

    /// 指定传输层；不调用时按配置的超时创建默认的 [`HttpTransport`]。
    pub fn with_transport(mut self, transport: Arc<dyn UploadTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// 注册「开始前」钩子；闭包返回 `Err(HookAbort)` 会中止本次上传。
    pub fn with_before_start_hook<F, Fut>(mut self, f: F) -> Self
    where
        F: FnMut() -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<(), HookAbort>> + Send + 'static,
    {
        self.hooks.add(BeforeStartHookAdapter(f));
        self
    }

    /// 注册「状态切换」钩子。
    pub fn with_on_status_hook<F>(mut self, f: F) -> Self
    where
        F: FnMut(UploadStatus) + Send + Sync + 'static,
    {
        self.hooks.add(OnStatusHookAdapter(f));
        self
    }

    /// 注册「进度」钩子；参数为已上传字节数、文件总大小。
    pub fn with_on_progress_hook<F>(mut self, f: F) -> Self
    where
        F: FnMut(u64, u64) + Send + Sync + 'static,
    {
        self.hooks.add(OnProgressHookAdapter(f));
        self
    }

    /// 注册「完成后」钩子；上传成功后以文件信息调用。
    pub fn with_after_complete_hook<F, Fut>(mut self, f: F) -> Self
    where
        F: FnMut(FileDescriptor) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        self.hooks.add(AfterCompleteHookAdapter(f));
        self
    }

    /// 注册「失败」钩子；只会收到第一个错误。
    pub fn with_on_error_hook<F>(mut self, f: F) -> Self
    where
        F: FnMut(&UploadError) + Send + Sync + 'static,
    {
        self.hooks.add(OnErrorHookAdapter(f));
        self
    }

    /// 添加完整钩子，在上传各阶段插入逻辑。
    pub fn with_hook(mut self, hook: impl UploadHook + 'static) -> Self {
        self.hooks.add(hook);
        self
    }

    /// 内置的上传进度状态；`changed().await` 监听进度。
    pub fn progress(&self) -> watch::Receiver<UploadProgress> {
        self.progress_state.subscribe()
    }

    /// 内置的状态机状态。
    pub fn status(&self) -> watch::Receiver<UploadStatus> {
        self.status_state.subscribe()
    }

    /// 执行上传，成功返回文件信息；失败只返回遇到的第一个错误。
    pub async fn send(self, source: &SourceFile) -> Result<FileDescriptor, UploadError> {
        let run = UploadRun {
            config: self.config,
            transport: self.transport,
            hooks: Arc::new(Mutex::new(self.hooks)),
            progress_state: self.progress_state,
            status_state: self.status_state,
        };

        match run.execute(source).await {
            Ok(file) => {
                run.transition(UploadStatus::Completed).await;
                info!(file = source.name(), key = %file.key, "上传完成");
                run.hooks.lock().await.run_after_complete(&file).await;
                Ok(file)
            }
            Err(e) => {
                run.transition(UploadStatus::Failed).await;
                warn!(file = source.name(), error = %e, "上传失败");
                run.hooks.lock().await.run_on_error(&e);
                Err(e)
            }
        }
    }
}

/// 一次上传的运行期状态
struct UploadRun {
    config: UploadConfig,
    transport: Option<Arc<dyn UploadTransport>>,
    hooks: Arc<Mutex<UploadHooksContainer>>,
    progress_state: Arc<watch::Sender<UploadProgress>>,
    status_state: Arc<watch::Sender<UploadStatus>>,
}

impl UploadRun {
    async fn transition(&self, status: UploadStatus) {
        self.status_state.send_replace(status);
        info!(?status, "状态切换");
        self.hooks.lock().await.run_on_status(status);
    }

    fn transport(&self) -> Result<Arc<dyn UploadTransport>, UploadError> {
        match &self.transport {
            Some(t) => Ok(Arc::clone(t)),
            None => Ok(Arc::new(HttpTransport::new(
                self.config.request_timeout_duration(),
            )?)),
        }
    }

    async fn execute(&self, source: &SourceFile) -> Result<FileDescriptor, UploadError> {
        self.hooks.lock().await.run_before_start(source).await?;
        let host = self.config.upload_host()?;

        // 凭证只解析这一次，之后不会再调用提供函数
        self.transition(UploadStatus::TokenResolving).await;
        let token = self.config.token.resolve().await?;
        info!(
            file = source.name(),
            token = token.short_fingerprint(),
            "上传凭证已就绪"
        );

        self.transition(UploadStatus::Chunking).await;
        self.config.validate_sizes()?;
        let data = source.read_all().await?;
        let file_size = data.len() as u64;
        let blocks = split_blocks(&data, self.config.settings.block_size)?;
        info!(
            file = source.name(),
            size = file_size,
            blocks = blocks.len(),
            "分块完成"
        );

        let cx = RequestContext {
            transport: self.transport()?,
            token,
            host: Arc::from(host),
            cancel_requested: Arc::new(AtomicBool::new(false)),
        };

        self.transition(UploadStatus::BlocksInFlight).await;
        let tracker = ProgressTracker::spawn(
            file_size,
            Arc::clone(&self.hooks),
            Arc::clone(&self.progress_state),
        );
        let outcome = run_blocks(RunBlocksParams {
            blocks,
            chunk_size: self.config.settings.chunk_size,
            cx: cx.clone(),
            progress: tracker.sender(),
        })
        .await;

        let block_results = match outcome {
            Ok(results) => {
                tracker.finish().await?;
                results
            }
            Err(e) => {
                tracker.discard();
                return Err(e);
            }
        };

        self.transition(UploadStatus::Finalizing).await;
        let encoded_key = self.config.encoded_key(source);
        let created = finalize(
            &cx,
            FinalizeParams {
                block_results: &block_results,
                file_size,
                encoded_key: &encoded_key,
            },
        )
        .await?;

        Ok(describe_file(
            created,
            source,
            file_size,
            &self.config.settings.domain,
        ))
    }
}
