pub mod block_session;
pub mod byte_ranges;
pub mod chunk_result;
pub mod file_descriptor;
pub mod file_uploader;
pub mod hook_adapters;
pub mod source_file;
pub mod upload_config;
pub mod upload_error;
pub mod upload_hooks_container;
pub mod upload_progress;
pub mod upload_status;

// 重导出公共类型
pub use byte_ranges::{Block, Chunk};
pub use chunk_result::{ChunkResult, FileCreated};
pub use file_descriptor::FileDescriptor;
pub use file_uploader::FileUploader;
pub use source_file::SourceFile;
pub use upload_config::{UploadConfig, UploadSettings};
pub use upload_error::UploadError;
pub use upload_hooks_container::UploadHooksContainer;
pub use upload_progress::UploadProgress;
pub use upload_status::UploadStatus;
