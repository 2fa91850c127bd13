pub mod transport;
pub mod upload;
