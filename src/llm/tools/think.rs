//! 思考记录工具

use rig::tool::Tool;
use serde::{Deserialize, Serialize};

/// 思考工具 - 让模型显式记录中间推理，写入研究过程但不产生外部副作用
#[derive(Debug, Clone, Default)]
pub struct AgentToolThink;

/// 思考参数
#[derive(Debug, Deserialize)]
pub struct ThinkArgs {
    pub reflection: String,
}

/// 思考结果
#[derive(Debug, Serialize)]
pub struct ThinkResult {
    pub reflection: String,
}

impl ThinkResult {
    pub fn render(&self) -> String {
        format!("思考记录: {}", self.reflection)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("think tool error")]
pub struct ThinkToolError;

impl AgentToolThink {
    pub fn new() -> Self {
        Self
    }

    pub(crate) fn tool_definition() -> rig::completion::ToolDefinition {
        rig::completion::ToolDefinition {
            name: Self::NAME.to_string(),
            description:
                "记录你对已有发现的阶段性思考，例如信息缺口、下一步计划。适合在连续搜索之间整理思路。"
                    .to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "reflection": {
                        "type": "string",
                        "description": "你的阶段性思考内容"
                    }
                },
                "required": ["reflection"]
            }),
        }
    }
}

impl Tool for AgentToolThink {
    const NAME: &'static str = "think";

    type Error = ThinkToolError;
    type Args = ThinkArgs;
    type Output = ThinkResult;

    async fn definition(&self, _prompt: String) -> rig::completion::ToolDefinition {
        Self::tool_definition()
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        println!("   🔧 tool called...think");

        Ok(ThinkResult {
            reflection: args.reflection,
        })
    }
}
