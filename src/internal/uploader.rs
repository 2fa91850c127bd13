//! 分片上传领域模块：按块（block）与片（chunk）切分源文件，块内串行、块间并发上传，最后合成文件。
//!
//! 使用方式：`FileUploader::new(config).with_on_progress_hook(..).send(&source).await`
//! 对外导出以 [`crate::uploader`] 为准，此处仅做模块划分。

pub mod functions;
pub mod impl_traits;
pub mod structs;
pub mod traits;
