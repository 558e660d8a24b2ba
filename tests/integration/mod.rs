//! Integration tests with mock HTTP servers

pub mod mock_server;
pub mod proxy_routes;
pub mod remote_client;
