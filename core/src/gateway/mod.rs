pub mod gemini;

pub use gemini::{GatewayConfig, GeminiGateway, DEFAULT_MODEL};
