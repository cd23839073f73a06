//! Translation API Adapter - 翻译服务客户端实现

pub mod dto;
mod fake_translation_client;
mod http_translation_client;

pub use fake_translation_client::FakeTranslationClient;
pub use http_translation_client::*;
