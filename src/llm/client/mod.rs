//! LLM客户端 - 提供统一的模型网关接口

use anyhow::Result;
use async_trait::async_trait;
use rig::completion::ToolDefinition;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::future::Future;

use crate::{config::Config, llm::client::utils::evaluate_befitting_model};

mod providers;
pub mod types;
pub mod utils;

pub use types::{ModelTurn, ToolInvocation};

use providers::ProviderClient;
use types::RawResearchTurn;

/// 模型网关 - 引擎访问LLM的唯一边界
///
/// 提供三种调用形态：固定结构提取、纯文本生成、带工具schema的研究轮次。
/// 引擎各阶段只依赖该trait，不感知具体的provider与重试策略。
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// 数据提取：要求模型输出符合T结构的JSON
    async fn extract<T>(&self, system_prompt: &str, user_prompt: &str) -> Result<T>
    where
        T: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static;

    /// 纯文本生成（不提供工具）
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;

    /// 研究轮次：向模型提供工具schema，提取其文本与工具调用意图
    async fn research_turn(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        tools: &[ToolDefinition],
    ) -> Result<ModelTurn>;

    /// 检查模型连接和功能是否正常
    async fn check_connection(&self) -> Result<()>;
}

/// LLM客户端 - 模型网关的rig默认实现
#[derive(Clone)]
pub struct LLMClient {
    config: Config,
    client: ProviderClient,
}

impl LLMClient {
    /// 创建新的LLM客户端
    pub fn new(config: Config) -> Result<Self> {
        let client = ProviderClient::new(&config.llm)?;
        Ok(Self { client, config })
    }

    /// 通用重试逻辑，用于处理异步操作的重试机制
    async fn retry_with_backoff<T, F, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, anyhow::Error>>,
    {
        let llm_config = &self.config.llm;
        let max_retries = llm_config.retry_attempts;
        let retry_delay_ms = llm_config.retry_delay_ms;
        let mut retries = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(err) => {
                    retries += 1;
                    eprintln!(
                        "❌ 调用模型服务出错，重试中 (第 {} / {}次尝试): {}",
                        retries, max_retries, err
                    );
                    if retries >= max_retries {
                        return Err(err);
                    }
                    tokio::time::sleep(std::time::Duration::from_millis(retry_delay_ms)).await;
                }
            }
        }
    }

    async fn extract_inner<T>(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        befitting_model: String,
        fallover_model: Option<String>,
    ) -> Result<T>
    where
        T: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static,
    {
        let llm_config = &self.config.llm;

        let extractor =
            self.client
                .create_extractor::<T>(&befitting_model, system_prompt, llm_config);

        self.retry_with_backoff(|| async {
            match extractor.extract(user_prompt).await {
                Ok(r) => Ok(r),
                Err(e) => match fallover_model {
                    Some(ref model) => {
                        eprintln!(
                            "❌ 调用模型服务出错，尝试 {} 次均失败，尝试使用备选模型{}...{}",
                            llm_config.retry_attempts, model, e
                        );
                        let user_prompt_with_fixer = format!("{}\n\n**注意事项**此前我调用大模型过程时存在错误，错误信息为“{}”，你注意你这一次要规避这个错误", user_prompt, e);
                        Box::pin(self.extract_inner(
                            system_prompt,
                            &user_prompt_with_fixer,
                            model.clone(),
                            None,
                        ))
                        .await
                    }
                    None => {
                        eprintln!(
                            "❌ 调用模型服务出错，尝试 {} 次均失败...{}",
                            llm_config.retry_attempts, e
                        );
                        Err(e)
                    }
                },
            }
        })
        .await
    }

    /// 将工具描述渲染为提示词中的工具清单
    fn render_tool_schemas(tools: &[ToolDefinition]) -> String {
        let mut rendered = String::from("## 可用工具\n");
        for tool in tools {
            rendered.push_str(&format!(
                "### {}\n{}\n参数schema:\n```json\n{}\n```\n",
                tool.name,
                tool.description,
                serde_json::to_string_pretty(&tool.parameters).unwrap_or_default()
            ));
        }
        rendered
    }
}

#[async_trait]
impl ModelGateway for LLMClient {
    /// 数据提取方法
    async fn extract<T>(&self, system_prompt: &str, user_prompt: &str) -> Result<T>
    where
        T: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static,
    {
        let (befitting_model, fallover_model) =
            evaluate_befitting_model(&self.config.llm, system_prompt, user_prompt);

        self.extract_inner(system_prompt, user_prompt, befitting_model, fallover_model)
            .await
    }

    /// 简化的单轮对话方法（不使用工具）
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let (befitting_model, _) =
            evaluate_befitting_model(&self.config.llm, system_prompt, user_prompt);
        let agent = self
            .client
            .create_agent(&befitting_model, system_prompt, &self.config.llm);

        self.retry_with_backoff(|| async { agent.prompt(user_prompt).await })
            .await
    }

    /// 研究轮次：工具清单随系统提示词下发，模型的调用意图以结构化JSON提取
    async fn research_turn(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        tools: &[ToolDefinition],
    ) -> Result<ModelTurn> {
        let system_with_tools = format!(
            "{}\n\n{}\n调用工具时，tool_calls中每一项的arguments必须是符合对应工具参数schema的JSON对象；不需要调用工具时，tool_calls输出空数组，并在answer中给出你的阶段性结论。",
            system_prompt,
            Self::render_tool_schemas(tools)
        );

        let raw: RawResearchTurn = self.extract(&system_with_tools, user_prompt).await?;
        Ok(raw.into())
    }

    /// 检查模型连接和功能是否正常
    async fn check_connection(&self) -> Result<()> {
        println!("🔄 正在检查模型连接...");
        // 使用一个简单的prompt来测试连接
        match self
            .generate("System: You are a helpful assistant.", "Hello")
            .await
        {
            Ok(_) => {
                println!("✅ 模型连接正常");
                Ok(())
            }
            Err(e) => {
                eprintln!("❌ 模型连接失败: {}", e);
                Err(e)
            }
        }
    }
}
