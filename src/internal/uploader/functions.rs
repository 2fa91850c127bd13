pub mod download_url;
pub mod encode_key;
pub mod split_blocks;
