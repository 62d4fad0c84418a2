//! 研究会话工作流
//!
//! 对外的唯一入口。驱动阶段推进：范围界定（必要时挂起等待澄清）、
//! 并发研究、报告合成。阶段字段只在这里写入，其余组件通过返回值
//! 请求推进。

use anyhow::Result;
use uuid::Uuid;

use crate::config::Config;
use crate::engine::context::RunContext;
use crate::engine::scope::{ScopeAnalyzer, ScopeDecision};
use crate::engine::{report, research};
use crate::error::EngineError;
use crate::llm::client::ModelGateway;
use crate::types::{Phase, ResearchBrief, RunState};

/// 一次会话调用的结果
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// 会话挂起，等待用户回复澄清问题
    ClarificationNeeded { session_id: String, question: String },
    /// 会话完成，产出最终报告
    Completed { session_id: String, report: String },
}

/// 启动研究工作流
pub async fn launch(config: &Config, message: &str, session_id: Option<&str>) -> Result<RunOutcome> {
    let context = RunContext::new(config.clone())?;

    // 启动时检查模型连接
    context.gateway.check_connection().await?;

    run(&context, message, session_id).await
}

/// 驱动一次会话：新建或恢复状态，推进到挂起或完成
pub async fn run<G>(
    context: &RunContext<G>,
    message: &str,
    session_id: Option<&str>,
) -> Result<RunOutcome>
where
    G: ModelGateway + 'static,
{
    let mut state = resume_or_create(context, message, session_id).await?;

    let analyzer = ScopeAnalyzer;
    let question = match analyzer.execute(context, &state).await? {
        ScopeDecision::NeedsClarification { question } => {
            // 挂起点：澄清问题作为一条普通的助手轮次落盘，等待用户回复
            state.append_assistant_turn(&question);
            state.phase = Phase::Clarifying;
            context.sessions.save(&state).await?;
            println!("❓ 等待用户澄清，会话已挂起: {}", state.session_id);
            return Ok(RunOutcome::ClarificationNeeded {
                session_id: state.session_id,
                question,
            });
        }
        ScopeDecision::Scoped { question } => question,
    };

    println!("✓ 研究范围已确定: {}", question);
    // brief一经创建即不可变，后续阶段只读
    let brief = ResearchBrief::new(question);
    state.brief = Some(brief.clone());
    state.phase = Phase::Scoped;
    context.sessions.save(&state).await?;

    state.phase = Phase::Researching;
    research::execute(context, &brief, &mut state).await?;

    state.phase = Phase::Synthesizing;
    let report = report::execute(context, &brief, &state).await?;

    state.report = Some(report.clone());
    state.phase = Phase::Done;
    context.sessions.save(&state).await?;

    if let Some(output_path) = &context.config.output_path {
        report::save_report(output_path, &report)?;
    }

    println!("✅ 研究会话完成: {}", state.session_id);
    Ok(RunOutcome::Completed {
        session_id: state.session_id,
        report,
    })
}

/// 新建会话，或按会话标识恢复挂起的会话
async fn resume_or_create<G: ModelGateway>(
    context: &RunContext<G>,
    message: &str,
    session_id: Option<&str>,
) -> Result<RunState> {
    let mut state = match session_id {
        Some(id) => {
            let mut existing = context
                .sessions
                .load(id)
                .await?
                .ok_or_else(|| EngineError::SessionNotFound(id.to_string()))?;
            println!("🔄 恢复会话: {}（上次阶段: {}）", id, existing.phase);
            // 用户回复到达，重新进入范围界定
            existing.phase = Phase::Clarifying;
            existing
        }
        None => {
            let state = RunState::new(Uuid::new_v4().to_string());
            println!("🚀 新建研究会话: {}", state.session_id);
            state
        }
    };

    state.append_user_turn(message);
    Ok(state)
}

// Include tests
#[cfg(test)]
mod tests;
