pub mod broadcast;
pub mod stream;
