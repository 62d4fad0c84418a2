//! 范围界定阶段
//!
//! 判断用户请求是否已经明确到可以开展研究：不明确时提出一个澄清
//! 问题并挂起整个会话，明确时将对话提炼为一份研究简报。

use chrono::Utc;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::engine::agent_executor::{AgentExecuteParams, extract_decision};
use crate::engine::context::RunContext;
use crate::error::EngineError;
use crate::llm::client::ModelGateway;
use crate::types::{RunState, Speaker};

/// 范围界定的结构化决策
///
/// 决策必须通过结构化提取获得，不能从散文中解析控制信号。
#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScopeDecision {
    // 请求尚不明确，需要向用户追问
    NeedsClarification {
        // 向用户提出的单个澄清问题
        question: String,
    },
    // 范围已明确，可以开展研究
    Scoped {
        // 从对话中提炼出的独立研究问题
        question: String,
    },
}

/// 范围界定智能体
#[derive(Default)]
pub struct ScopeAnalyzer;

impl ScopeAnalyzer {
    /// 基于完整对话记录作出范围界定决策
    pub async fn execute<G: ModelGateway>(
        &self,
        context: &RunContext<G>,
        state: &RunState,
    ) -> Result<ScopeDecision, EngineError> {
        let prompt_sys = self.build_system_prompt(context);
        let prompt_user = format!(
            "## 对话记录\n{}\n\n请根据以上对话作出范围界定决策。",
            render_conversation(state)
        );

        extract_decision(
            context.gateway.as_ref(),
            AgentExecuteParams {
                prompt_sys,
                prompt_user,
                log_tag: "范围界定".to_string(),
            },
        )
        .await
    }

    fn build_system_prompt<G: ModelGateway>(&self, context: &RunContext<G>) -> String {
        let language_instruction = context.config.target_language.prompt_instruction();
        let system_prompt = format!(
            "你是深度研究系统的范围界定专员。你的职责是判断用户的研究请求是否已经明确到可以开展研究，并作出二选一的结构化决策：

1. needs_clarification：仅当请求确实缺少研究所必需的信息（范围含糊、缺少关键约束、研究目标无法判断）时选择，提出一个简洁的澄清问题。不要为了稳妥而过度追问，能合理推断的细节不要问，过度追问会显著损害使用体验。
2. scoped：请求已经可以开展研究时选择，将对话内容提炼为一个独立、完整、无歧义的研究问题。研究问题必须自包含，脱离对话上下文也能被理解；出现“最新”、“今年”这类相对时间表述时，结合当前日期换算为明确的时间范围。

当前日期: {}",
            Utc::now().format("%Y-%m-%d")
        );

        format!("{}\n\n{}", system_prompt, language_instruction)
    }
}

/// 将对话记录渲染为提示词片段
fn render_conversation(state: &RunState) -> String {
    state
        .conversation
        .iter()
        .map(|turn| match turn.speaker {
            Speaker::User => format!("用户: {}", turn.content),
            Speaker::Assistant => format!("助手: {}", turn.content),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
