use crate::config::{Config, LLMProvider};
use crate::i18n::TargetLanguage;
use clap::Parser;
use std::path::PathBuf;

/// Quaestor - 由Rust与AI驱动的多智能体深度研究引擎
#[derive(Parser, Debug)]
#[command(name = "Quaestor (deepquest-rs)")]
#[command(
    about = "AI-based multi-agent deep research engine. It clarifies ambiguous research questions, delegates sub-topics to concurrent research workers, and synthesizes cited findings into a final report."
)]
#[command(version)]
pub struct Args {
    /// 研究问题，或对上一轮澄清问题的回复
    pub question: String,

    /// 恢复指定的研究会话
    #[arg(short, long)]
    pub session: Option<String>,

    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 最终报告的输出文件路径
    #[arg(short, long)]
    pub output_path: Option<PathBuf>,

    /// 是否启用详细日志
    #[arg(short, long)]
    pub verbose: bool,

    /// 高能效模型，优先用于引擎的常规推理任务
    #[arg(long)]
    pub model_efficient: Option<String>,

    /// 高质量模型，优先用于引擎的复杂推理任务，以及作为efficient失效情况下的兜底
    #[arg(long)]
    pub model_powerful: Option<String>,

    /// LLM API基地址
    #[arg(long)]
    pub llm_api_base_url: Option<String>,

    /// LLM API KEY
    #[arg(long)]
    pub llm_api_key: Option<String>,

    /// 最大tokens数
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// 温度参数
    #[arg(long)]
    pub temperature: Option<f64>,

    /// 并行研究工作者数量上限
    #[arg(long)]
    pub max_workers: Option<usize>,

    /// LLM Provider (openai, mistral, openrouter, anthropic, deepseek)
    #[arg(long)]
    pub llm_provider: Option<String>,

    /// 目标语言 (zh, en, ja, ko, de, fr, ru)
    #[arg(long)]
    pub target_language: Option<String>,

    /// 本地资料库根目录，设置后启用资料库浏览工具
    #[arg(long)]
    pub corpus_path: Option<PathBuf>,

    /// 是否禁用网络搜索工具
    #[arg(long)]
    pub no_web_search: bool,

    /// 是否禁用会话持久化
    #[arg(long)]
    pub no_session: bool,
}

impl Args {
    /// 将CLI参数转换为配置
    pub fn into_config(self) -> Config {
        let mut config = if let Some(config_path) = &self.config {
            // 如果显式指定了配置文件路径，从该路径加载
            return Config::from_file(config_path).unwrap_or_else(|_| {
                panic!("⚠️ 警告: 无法读取配置文件 {:?}，使用默认配置", config_path)
            });
        } else {
            // 如果没有显式指定配置文件，尝试从默认位置加载
            let default_config_path = std::env::current_dir()
                .unwrap_or_else(|_| std::path::PathBuf::from("."))
                .join("quaestor.toml");

            if default_config_path.exists() {
                return Config::from_file(&default_config_path).unwrap_or_else(|_| {
                    panic!(
                        "⚠️ 警告: 无法读取默认配置文件 {:?}，使用默认配置",
                        default_config_path
                    )
                });
            } else {
                // 默认配置文件不存在，使用默认值
                Config::default()
            }
        };

        // 覆盖LLM配置
        if let Some(provider_str) = self.llm_provider {
            if let Ok(provider) = provider_str.parse::<LLMProvider>() {
                config.llm.provider = provider;
            } else {
                eprintln!(
                    "⚠️ 警告: 未知的provider: {}，使用默认provider",
                    provider_str
                );
            }
        }
        if let Some(llm_api_base_url) = self.llm_api_base_url {
            config.llm.api_base_url = llm_api_base_url;
        }
        if let Some(llm_api_key) = self.llm_api_key {
            config.llm.api_key = llm_api_key;
        }
        if let Some(model_efficient) = self.model_efficient {
            config.llm.model_efficient = model_efficient;
        }
        if let Some(model_powerful) = self.model_powerful {
            config.llm.model_powerful = model_powerful;
        } else {
            config.llm.model_powerful = config.llm.model_efficient.to_string();
        }
        if let Some(max_tokens) = self.max_tokens {
            config.llm.max_tokens = max_tokens;
        }
        if let Some(temperature) = self.temperature {
            config.llm.temperature = temperature;
        }

        // 研究编排配置
        if let Some(max_workers) = self.max_workers {
            config.research.max_concurrent_workers = max_workers;
        }

        // 目标语言配置
        if let Some(target_language_str) = self.target_language {
            if let Ok(target_language) = target_language_str.parse::<TargetLanguage>() {
                config.target_language = target_language;
            } else {
                eprintln!(
                    "⚠️ 警告: 未知的目标语言: {}，使用默认语言 (English)",
                    target_language_str
                );
            }
        }

        // 研究工具配置
        if let Some(corpus_path) = self.corpus_path {
            config.tools.corpus_path = Some(corpus_path);
        }
        if self.no_web_search {
            config.tools.enable_web_search = false;
        }

        // 会话配置
        if self.no_session {
            config.session.enabled = false;
        }

        // 其他配置
        if let Some(output_path) = self.output_path {
            config.output_path = Some(output_path);
        }
        config.verbose = self.verbose;

        config
    }
}

// Include tests
#[cfg(test)]
mod tests;
