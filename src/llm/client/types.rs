//! 模型网关边界的输入输出类型

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// 研究轮次中模型发起的一次工具调用
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInvocation {
    /// 工具名称
    pub name: String,
    /// 工具参数（JSON对象）
    pub arguments: serde_json::Value,
}

/// 一次研究轮次的模型产出
///
/// 文本与工具调用可以同时存在；两者皆空视为退化输出，由调用方处理。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelTurn {
    /// 模型的推理文本
    pub text: Option<String>,
    /// 模型请求执行的工具调用，按模型给出的顺序排列
    pub tool_calls: Vec<ToolInvocation>,
}

impl ModelTurn {
    /// 文本与工具调用皆空的退化输出
    pub fn is_degenerate(&self) -> bool {
        self.tool_calls.is_empty()
            && self
                .text
                .as_ref()
                .map(|t| t.trim().is_empty())
                .unwrap_or(true)
    }
}

/// 研究轮次的结构化提取载体
#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema)]
pub struct RawResearchTurn {
    // 本轮要执行的工具调用列表，不需要调用工具时为空数组
    pub tool_calls: Vec<RawToolCall>,
    // 本轮的推理或阶段性结论文本
    pub answer: Option<String>,
}

/// 结构化提取载体中的单个工具调用
#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema)]
pub struct RawToolCall {
    // 工具名称，必须是提供的工具列表之一
    pub tool: String,
    // 符合该工具参数schema的JSON对象
    pub arguments: serde_json::Value,
}

impl From<RawResearchTurn> for ModelTurn {
    fn from(raw: RawResearchTurn) -> Self {
        ModelTurn {
            text: raw.answer,
            tool_calls: raw
                .tool_calls
                .into_iter()
                .map(|call| ToolInvocation {
                    name: call.tool,
                    arguments: call.arguments,
                })
                .collect(),
        }
    }
}
