//! 智能体执行辅助
//!
//! 各阶段的控制决策（范围界定、研究主管）都必须以结构化提取的方式
//! 从模型获得，这里提供统一的提取入口：解析失败时附带纠正指令重试
//! 一次，仍失败则作为 `MalformedDecision` 上浮，绝不把散文输出当作
//! 控制信号。

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::llm::client::ModelGateway;

/// 一次智能体调用的参数
pub struct AgentExecuteParams {
    pub prompt_sys: String,
    pub prompt_user: String,
    /// 日志标识，也用于失败时定位出错的决策点
    pub log_tag: String,
}

/// 提取结构化决策
pub async fn extract_decision<G, T>(
    gateway: &G,
    params: AgentExecuteParams,
) -> Result<T, EngineError>
where
    G: ModelGateway,
    T: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static,
{
    match gateway
        .extract::<T>(&params.prompt_sys, &params.prompt_user)
        .await
    {
        Ok(decision) => {
            println!("   ✅ [{}] 决策提取完成", params.log_tag);
            Ok(decision)
        }
        Err(first_err) => {
            eprintln!(
                "   ⚠️ [{}] 决策提取失败，附带纠正指令重试: {}",
                params.log_tag, first_err
            );
            let prompt_user_with_fixer = format!(
                "{}\n\n**注意事项**你上一次的输出未能通过结构校验，错误信息为“{}”，这一次必须输出严格符合schema的JSON，不要输出任何额外文字",
                params.prompt_user, first_err
            );
            match gateway
                .extract::<T>(&params.prompt_sys, &prompt_user_with_fixer)
                .await
            {
                Ok(decision) => {
                    println!("   ✅ [{}] 纠正后决策提取完成", params.log_tag);
                    Ok(decision)
                }
                Err(second_err) => Err(EngineError::MalformedDecision {
                    context: format!("{}: {}", params.log_tag, second_err),
                }),
            }
        }
    }
}
