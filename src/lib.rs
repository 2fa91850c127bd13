/// 内部导出的模块
mod internal;


pub mod auth {
    use crate::internal;
    pub use internal::auth::structs::upload_token::{ResolvedToken, TokenProvider, UploadToken};
}

/// 分片上传核心：切分、块内串行、块间并发、合成文件
pub mod uploader {
    use crate::internal;
    // 结构体模型
    pub use internal::uploader::structs::*;
    pub use internal::uploader::structs::upload_config::{
        DEFAULT_BLOCK_SIZE, DEFAULT_CHUNK_SIZE, DEFAULT_HOST, DEFAULT_REQUEST_TIMEOUT_MS,
        KeyFn, MAX_BLOCK_SIZE,
    };
    // 传输层与钩子
    pub use internal::uploader::impl_traits::impl_transport::HttpTransport;
    pub use internal::uploader::traits::transport::UploadTransport;
    pub use internal::uploader::traits::upload::{HookAbort, UploadHook};

    /// 纯函数工具，不能限制死在上传器中，以防有人自己要用
    pub mod functions {
        use crate::internal;
        pub use internal::uploader::functions::download_url::join_download_url;
        pub use internal::uploader::functions::encode_key::encode_key;
        pub use internal::uploader::functions::split_blocks::{
            split_blocks, split_chunks, validate_sizes,
        };
    }
}

/// 批量上传：数量截断、类型过滤、大小上限、生命周期回调
pub mod batch {
    use crate::internal;
    pub use internal::batch::structs::*;
    pub use internal::batch::structs::batch_uploader::{DEFAULT_LIMIT, DEFAULT_MAX_SIZE};
    pub use internal::batch::traits::batch_hook::BatchHook;
}
