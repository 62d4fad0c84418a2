//! LLM服务层 - 统一的模型网关与研究工具集

pub mod client;
pub mod tools;

pub use client::{LLMClient, ModelGateway};
pub use tools::ToolKit;
