//! 上下文压缩器
//!
//! 在拼装提示词之前把超出预算的上下文压缩到界内。随着研究过程推进，
//! 工具观察结果会快速堆积，一旦提示词超过模型的可靠区间，结构化输出
//! 的成功率会急剧下降，所以压缩必须在每次组装提示词前主动进行，而不是
//! 等调用失败后再补救。

use crate::config::CompressionConfig;
use crate::llm::client::ModelGateway;
use crate::utils::token_estimator::TokenEstimator;
use anyhow::Result;

/// 退化截断时追加在内容末尾的标记
pub const TRUNCATION_MARKER: &str = "\n\n...(内容过长，已截断)";

/// 一次压缩调用的结果
#[derive(Debug, Clone)]
pub struct CompressionOutcome {
    /// 压缩（或原样透传）后的内容
    pub content: String,
    /// 是否实际发生了压缩
    pub was_compressed: bool,
    /// 压缩前的估算token数
    pub original_tokens: usize,
    /// 压缩后的估算token数
    pub compressed_tokens: usize,
}

/// 上下文压缩器
///
/// 压缩本身永远不会让调用方失败：模型摘要不可用或摘要仍然超预算时，
/// 退化为按字符截断并保留截断标记。
pub struct ContextCompressor {
    config: CompressionConfig,
    estimator: TokenEstimator,
}

impl ContextCompressor {
    pub fn new(config: CompressionConfig) -> Self {
        Self {
            config,
            estimator: TokenEstimator::new(),
        }
    }

    /// 将任意长度的内容压缩到提示词预算以内
    ///
    /// 预算内的内容原样透传（幂等）；超出预算时先尝试一次模型摘要，
    /// 摘要要求保留关键结论与全部`[来源: ...]`标注、不得虚构。
    pub async fn compress<G: ModelGateway>(
        &self,
        gateway: &G,
        label: &str,
        content: &str,
    ) -> CompressionOutcome {
        let original_tokens = self.estimator.estimate_tokens(content);
        if original_tokens <= self.config.max_prompt_tokens {
            return CompressionOutcome {
                content: content.to_string(),
                was_compressed: false,
                original_tokens,
                compressed_tokens: original_tokens,
            };
        }

        println!(
            "   📊 「{}」超出提示词预算({} > {} tokens)，开始压缩...",
            label, original_tokens, self.config.max_prompt_tokens
        );

        let compressed = match self.summarize(gateway, label, content).await {
            Ok(summary)
                if !self
                    .estimator
                    .exceeds_limit(&summary, self.config.max_prompt_tokens) =>
            {
                summary
            }
            Ok(_) => {
                eprintln!("⚠️ 「{}」模型摘要仍超出预算，退化为截断", label);
                self.truncate(content)
            }
            Err(e) => {
                eprintln!("⚠️ 「{}」模型压缩失败: {}，退化为截断", label, e);
                self.truncate(content)
            }
        };

        let compressed_tokens = self.estimator.estimate_tokens(&compressed);
        println!(
            "   ✅ 压缩完成: {} -> {} tokens",
            original_tokens, compressed_tokens
        );

        CompressionOutcome {
            content: compressed,
            was_compressed: true,
            original_tokens,
            compressed_tokens,
        }
    }

    /// 单次模型摘要调用，指令强调"只归纳、不虚构、保留来源标注"
    async fn summarize<G: ModelGateway>(
        &self,
        gateway: &G,
        label: &str,
        content: &str,
    ) -> Result<String> {
        let system_prompt = "你是一个专业的研究资料整理助手，负责压缩研究过程中积累的上下文。\
压缩时只做归纳和删减，不得虚构原文中不存在的任何信息；原文中所有形如[来源: ...]的来源标注必须原样保留在对应结论旁边。";
        let user_prompt = format!(
            "请将以下{}压缩到大约{}个token以内，保留关键结论、数据和全部来源标注：\n\n{}",
            label, self.config.target_tokens, content
        );

        gateway.generate(system_prompt, &user_prompt).await
    }

    /// 按字符截断的兜底路径
    fn truncate(&self, content: &str) -> String {
        let max_chars = self.estimator.chars_for_budget(self.config.target_tokens);
        let truncated: String = content.chars().take(max_chars).collect();
        format!("{}{}", truncated, TRUNCATION_MARKER)
    }
}
