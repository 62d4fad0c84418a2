//! 研究主管
//!
//! 把研究简报分解为可并行调查的课题，并发派发研究工作者，在屏障处
//! 聚合全部笔记后再进入下一轮决策。派发给某个工作者的提示词只包含
//! 研究问题和它自己的课题，绝不包含其他并发工作者的研究记录。

use std::collections::HashMap;

use chrono::Utc;
use tokio::task::JoinSet;

use super::types::SupervisorDecision;
use super::worker::ResearchWorker;
use crate::engine::agent_executor::{AgentExecuteParams, extract_decision};
use crate::engine::context::RunContext;
use crate::error::EngineError;
use crate::llm::client::ModelGateway;
use crate::types::{DelegatedTask, NoteOutcome, ResearchBrief, ResearchNote, RunState, TaskStatus};

/// 研究主管
#[derive(Default)]
pub struct ResearchSupervisor;

impl ResearchSupervisor {
    /// 驱动研究阶段的主管决策循环
    ///
    /// 轮次耗尽或决策不可解析都会强制结束研究阶段，记录告警但不使
    /// 整个会话失败。
    pub async fn execute<G>(
        &self,
        context: &RunContext<G>,
        brief: &ResearchBrief,
        state: &mut RunState,
    ) -> Result<(), EngineError>
    where
        G: ModelGateway + 'static,
    {
        let max_turns = context.config.research.max_supervisor_turns;
        println!("🚀 研究主管启动，研究问题: {}", brief.question);

        for turn in 1..=max_turns {
            let decision = match self.next_decision(context, brief, state, turn).await {
                Ok(decision) => decision,
                Err(EngineError::SupervisorStalled) => {
                    eprintln!(
                        "⚠️ 研究主管停摆，强制结束研究阶段（已收集{}条笔记）",
                        state.research_notes.len()
                    );
                    return Ok(());
                }
                Err(e) => return Err(e),
            };

            match decision {
                SupervisorDecision::Conclude => {
                    println!(
                        "✓ 研究主管判定研究已充分（第{}轮，共{}条笔记）",
                        turn,
                        state.research_notes.len()
                    );
                    return Ok(());
                }
                SupervisorDecision::Delegate { topics } => {
                    if topics.is_empty() {
                        eprintln!("⚠️ 研究主管给出了空的课题列表，视为研究结束");
                        return Ok(());
                    }
                    let topics =
                        clamp_topics(topics, context.config.research.max_concurrent_workers);
                    self.dispatch_workers(context, brief, state, topics).await;
                }
            }
        }

        eprintln!(
            "⚠️ 研究主管轮次耗尽({}轮)，强制结束研究阶段，已收集{}条笔记",
            max_turns,
            state.research_notes.len()
        );
        Ok(())
    }

    /// 单轮主管决策：简报 + 压缩后的笔记汇总 → 结构化决策
    async fn next_decision<G: ModelGateway>(
        &self,
        context: &RunContext<G>,
        brief: &ResearchBrief,
        state: &RunState,
        turn: u32,
    ) -> Result<SupervisorDecision, EngineError> {
        let digest = if state.research_notes.is_empty() {
            "（尚无研究笔记，这是第一轮）".to_string()
        } else {
            let rendered = render_notes(&state.research_notes);
            context
                .compressor
                .compress(context.gateway.as_ref(), "研究笔记汇总", &rendered)
                .await
                .content
        };

        let prompt_user = format!(
            "## 研究问题\n{}\n\n## 决策进度\n第 {} / {} 轮\n\n## 已完成的研究笔记\n{}\n\n请作出本轮决策。",
            brief.question,
            turn,
            context.config.research.max_supervisor_turns,
            digest
        );

        extract_decision(
            context.gateway.as_ref(),
            AgentExecuteParams {
                prompt_sys: self.build_system_prompt(context),
                prompt_user,
                log_tag: "研究主管".to_string(),
            },
        )
        .await
        .map_err(|e| {
            eprintln!("   ⚠️ 研究主管决策不可解析: {}", e);
            EngineError::SupervisorStalled
        })
    }

    /// 并发派发本轮课题并在屏障处收齐全部笔记
    ///
    /// 笔记按工作者完成提交的顺序落盘，与派发顺序无关；异常终止的
    /// 工作者以合成失败笔记补位，保证派发集合与收齐集合一致。
    async fn dispatch_workers<G>(
        &self,
        context: &RunContext<G>,
        brief: &ResearchBrief,
        state: &mut RunState,
        topics: Vec<String>,
    ) where
        G: ModelGateway + 'static,
    {
        println!("   🔄 本轮并发派发 {} 个研究课题", topics.len());

        let mut join_set = JoinSet::new();
        let mut in_flight: HashMap<tokio::task::Id, DelegatedTask> = HashMap::new();

        for topic in topics {
            let mut task = DelegatedTask::new(topic);
            task.status = TaskStatus::Running;
            let worker = ResearchWorker::new(context.clone(), task.clone(), brief.question.clone());
            let handle = join_set.spawn(worker.run());
            in_flight.insert(handle.id(), task);
        }

        while let Some(joined) = join_set.join_next_with_id().await {
            match joined {
                Ok((id, note)) => {
                    in_flight.remove(&id);
                    state.commit_note(note);
                }
                Err(join_err) => {
                    if let Some(task) = in_flight.remove(&join_err.id()) {
                        let failure = EngineError::WorkerFailed {
                            task_id: task.id.clone(),
                            reason: join_err.to_string(),
                        };
                        eprintln!("   ❌ 课题「{}」工作者异常终止: {}", task.topic, failure);
                        state.commit_note(ResearchNote::failure(&task, failure.to_string()));
                    } else {
                        eprintln!("   ❌ 未能定位异常终止的工作者: {}", join_err);
                    }
                }
            }
        }

        println!(
            "   ✅ 本轮课题研究全部完成，累计 {} 条研究笔记",
            state.research_notes.len()
        );
    }

    fn build_system_prompt<G: ModelGateway>(&self, context: &RunContext<G>) -> String {
        let language_instruction = context.config.target_language.prompt_instruction();
        let system_prompt = format!(
            "你是深度研究系统的研究主管。你的职责是把研究问题分解为可独立调查的子课题，分派给研究工作者，并根据已完成的研究笔记作出二选一的结构化决策：

1. delegate：已有笔记尚不足以回答研究问题时选择，列出1到{}个新的研究课题。课题之间必须相互独立、可并行调查；不要重复已经研究过的课题，优先补足笔记中的明显缺口（包括标注为失败的课题）。
2. conclude：已有笔记足以支撑一份完整报告时选择，研究阶段随即结束。

每个工作者只能看到研究问题和分派给它的课题，课题描述必须自包含。

当前日期: {}",
            context.config.research.max_concurrent_workers,
            Utc::now().format("%Y-%m-%d")
        );

        format!("{}\n\n{}", system_prompt, language_instruction)
    }
}

/// 课题数量超过并发上限时截断，确保单轮并发有界
fn clamp_topics(mut topics: Vec<String>, max_concurrent: usize) -> Vec<String> {
    if topics.len() > max_concurrent {
        eprintln!(
            "   ⚠️ 研究主管提出 {} 个课题，超过并发上限 {}，只保留前 {} 个",
            topics.len(),
            max_concurrent,
            max_concurrent
        );
        topics.truncate(max_concurrent);
    }
    topics
}

/// 将已有研究笔记渲染为主管决策用的汇总
fn render_notes(notes: &[ResearchNote]) -> String {
    notes
        .iter()
        .map(|note| {
            format!(
                "### 课题: {}\n状态: {}\n{}",
                note.topic,
                outcome_label(note.outcome),
                note.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn outcome_label(outcome: NoteOutcome) -> &'static str {
    match outcome {
        NoteOutcome::Completed => "已完成",
        NoteOutcome::Incomplete => "不完整",
        NoteOutcome::Failed => "失败",
    }
}
