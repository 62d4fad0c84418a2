use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use crate::i18n::TargetLanguage;

/// LLM Provider类型
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum LLMProvider {
    #[serde(rename = "openai")]
    #[default]
    OpenAI,
    #[serde(rename = "moonshot")]
    Moonshot,
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "mistral")]
    Mistral,
    #[serde(rename = "openrouter")]
    OpenRouter,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "gemini")]
    Gemini,
    #[serde(rename = "ollama")]
    Ollama,
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::Moonshot => write!(f, "moonshot"),
            LLMProvider::DeepSeek => write!(f, "deepseek"),
            LLMProvider::Mistral => write!(f, "mistral"),
            LLMProvider::OpenRouter => write!(f, "openrouter"),
            LLMProvider::Anthropic => write!(f, "anthropic"),
            LLMProvider::Gemini => write!(f, "gemini"),
            LLMProvider::Ollama => write!(f, "ollama"),
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(LLMProvider::OpenAI),
            "moonshot" => Ok(LLMProvider::Moonshot),
            "deepseek" => Ok(LLMProvider::DeepSeek),
            "mistral" => Ok(LLMProvider::Mistral),
            "openrouter" => Ok(LLMProvider::OpenRouter),
            "anthropic" => Ok(LLMProvider::Anthropic),
            "gemini" => Ok(LLMProvider::Gemini),
            "ollama" => Ok(LLMProvider::Ollama),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// 目标语言
    pub target_language: TargetLanguage,

    /// 最终报告的输出文件路径，未设置时仅打印到标准输出
    pub output_path: Option<PathBuf>,

    /// LLM模型配置
    pub llm: LLMConfig,

    /// 研究编排配置
    pub research: ResearchConfig,

    /// 上下文压缩配置
    pub compression: CompressionConfig,

    /// 会话持久化配置
    pub session: SessionConfig,

    /// 研究工具配置
    pub tools: ToolsConfig,

    /// 是否启用详细日志
    pub verbose: bool,
}

/// LLM模型配置
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LLMConfig {
    /// LLM Provider类型
    pub provider: LLMProvider,

    /// LLM API KEY
    pub api_key: String,

    /// LLM API基地址
    pub api_base_url: String,

    /// 高能效模型，优先用于引擎的常规推理任务
    pub model_efficient: String,

    /// 高质量模型，优先用于引擎的复杂推理任务，以及作为efficient失效情况下的兜底
    pub model_powerful: String,

    /// 最大tokens
    pub max_tokens: u32,

    /// 温度
    pub temperature: f64,

    /// 重试次数
    pub retry_attempts: u32,

    /// 重试间隔（毫秒）
    pub retry_delay_ms: u64,

    /// 超时时间（秒）
    pub timeout_seconds: u64,
}

/// 研究编排配置
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ResearchConfig {
    /// 并行研究工作者数量上限，主管单轮委派超出部分会被截断
    pub max_concurrent_workers: usize,

    /// 主管的决策轮次上限，超出后强制进入结论
    pub max_supervisor_turns: u32,

    /// 单个工作者的研究循环次数上限
    pub max_worker_cycles: u32,

    /// 单个工作者允许的工具失败次数，超出后强制收尾
    pub tool_retry_budget: u32,
}

/// 上下文压缩配置
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CompressionConfig {
    /// 提示词上下文的token上限，超过即触发压缩
    pub max_prompt_tokens: usize,

    /// 压缩后内容的目标token数量
    pub target_tokens: usize,
}

/// 会话持久化配置
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SessionConfig {
    /// 是否启用会话持久化
    pub enabled: bool,

    /// 会话存储目录
    pub session_dir: PathBuf,

    /// 会话过期时间（小时）
    pub expire_hours: u64,
}

/// 研究工具配置
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ToolsConfig {
    /// 是否启用网络搜索工具
    pub enable_web_search: bool,

    /// 网络搜索API地址
    pub web_search_endpoint: String,

    /// 网络搜索API KEY
    pub web_search_api_key: String,

    /// 单次搜索请求的超时时间（秒）
    pub search_timeout_seconds: u64,

    /// 单次搜索返回的结果数量上限
    pub max_search_results: usize,

    /// 本地资料库根目录，未设置时不启用资料库浏览工具
    pub corpus_path: Option<PathBuf>,

    /// 资料库单文件读取大小限制（字节）
    pub max_document_bytes: u64,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_language: TargetLanguage::default(),
            output_path: None,
            llm: LLMConfig::default(),
            research: ResearchConfig::default(),
            compression: CompressionConfig::default(),
            session: SessionConfig::default(),
            tools: ToolsConfig::default(),
            verbose: false,
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::default(),
            api_key: std::env::var("QUAESTOR_LLM_API_KEY").unwrap_or_default(),
            api_base_url: String::from("https://api-inference.modelscope.cn/v1"),
            model_efficient: String::from("Qwen/Qwen3-Next-80B-A3B-Instruct"),
            model_powerful: String::from("Qwen/Qwen3-235B-A22B-Instruct-2507"),
            max_tokens: 131072,
            temperature: 0.1,
            retry_attempts: 5,
            retry_delay_ms: 5000,
            timeout_seconds: 300,
        }
    }
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            max_concurrent_workers: 3,
            max_supervisor_turns: 6,
            max_worker_cycles: 8,
            tool_retry_budget: 3,
        }
    }
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            max_prompt_tokens: 24 * 1024,
            target_tokens: 4096,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            session_dir: PathBuf::from(".quaestor/sessions"),
            expire_hours: 72,
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            enable_web_search: true,
            web_search_endpoint: String::from("https://api.tavily.com/search"),
            web_search_api_key: std::env::var("QUAESTOR_SEARCH_API_KEY").unwrap_or_default(),
            search_timeout_seconds: 30,
            max_search_results: 5,
            corpus_path: None,
            max_document_bytes: 64 * 1024, // 64KB
        }
    }
}

// Include tests
#[cfg(test)]
mod tests;
