pub mod app;
pub mod http;
pub mod sse;
