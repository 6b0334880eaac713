pub mod classifiers;
pub mod config;
pub mod http;
pub mod storage;
pub mod stream;
