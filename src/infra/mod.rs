pub mod http_client;
pub mod source_cache;
