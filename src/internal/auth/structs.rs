pub mod upload_token;
