pub mod accept_filter;
pub mod batch_hooks_container;
pub mod batch_uploader;

pub use accept_filter::AcceptFilter;
pub use batch_hooks_container::BatchHooksContainer;
pub use batch_uploader::BatchUploader;
