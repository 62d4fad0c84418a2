//! 研究完成信号工具

use rig::tool::Tool;
use serde::{Deserialize, Serialize};

/// 研究完成工具 - 模型调用它来宣告当前课题的研究已经充分
///
/// 该调用由研究工作者在执行前拦截作为收尾信号，不会真正执行外部操作。
#[derive(Debug, Clone, Default)]
pub struct AgentToolResearchComplete;

/// 完成信号参数
#[derive(Debug, Deserialize)]
pub struct ResearchCompleteArgs {
    pub summary: Option<String>,
}

/// 完成信号结果
#[derive(Debug, Serialize)]
pub struct ResearchCompleteResult {
    pub acknowledged: bool,
}

impl ResearchCompleteResult {
    pub fn render(&self) -> String {
        "研究完成信号已接收".to_string()
    }
}

#[derive(Debug, thiserror::Error)]
#[error("research complete tool error")]
pub struct ResearchCompleteToolError;

impl AgentToolResearchComplete {
    pub fn new() -> Self {
        Self
    }

    pub(crate) fn tool_definition() -> rig::completion::ToolDefinition {
        rig::completion::ToolDefinition {
            name: Self::NAME.to_string(),
            description:
                "当你认为当前课题的研究已经充分、可以提交研究发现时调用此工具，结束研究循环。"
                    .to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "summary": {
                        "type": "string",
                        "description": "对研究发现的一句话概括（可选）"
                    }
                },
                "required": []
            }),
        }
    }
}

impl Tool for AgentToolResearchComplete {
    const NAME: &'static str = "research_complete";

    type Error = ResearchCompleteToolError;
    type Args = ResearchCompleteArgs;
    type Output = ResearchCompleteResult;

    async fn definition(&self, _prompt: String) -> rig::completion::ToolDefinition {
        Self::tool_definition()
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        println!("   🔧 tool called...research_complete@{:?}", args.summary);

        Ok(ResearchCompleteResult { acknowledged: true })
    }
}
