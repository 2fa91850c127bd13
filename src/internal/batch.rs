//! 批量上传：在单文件上传器外层做数量截断、类型过滤、大小上限与生命周期回调。

pub mod structs;
pub mod traits;
