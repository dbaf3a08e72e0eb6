pub mod http_client;
pub mod tracker_api;
