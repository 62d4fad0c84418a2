//! 研究工作者
//!
//! 对单个委派课题执行迭代式的工具调用研究循环。工作者持有自己的
//! 本地研究记录，与其他并发工作者不共享任何可变状态；所有内部错误
//! 都被吸收为降级的研究笔记，绝不向主管上浮。

use chrono::Utc;

use super::types::{TranscriptEntry, render_transcript};
use crate::engine::context::RunContext;
use crate::error::EngineError;
use crate::llm::client::{ModelGateway, ModelTurn};
use crate::llm::tools::ToolKit;
use crate::types::{DelegatedTask, NoteOutcome, ResearchNote, TaskStatus};

/// 研究工作者
pub struct ResearchWorker<G: ModelGateway> {
    context: RunContext<G>,
    task: DelegatedTask,
    brief_question: String,
    transcript: Vec<TranscriptEntry>,
    sources: Vec<String>,
    tool_trace: Vec<String>,
    tool_failures: u32,
}

impl<G: ModelGateway> ResearchWorker<G> {
    pub fn new(context: RunContext<G>, task: DelegatedTask, brief_question: String) -> Self {
        Self {
            context,
            task,
            brief_question,
            transcript: Vec::new(),
            sources: Vec::new(),
            tool_trace: Vec::new(),
            tool_failures: 0,
        }
    }

    /// 驱动整个研究循环直到产出一条研究笔记
    pub async fn run(mut self) -> ResearchNote {
        if self.context.config.verbose {
            println!("🤖 研究工作者启动，课题: {}", self.task.topic);
        }

        let max_cycles = self.context.config.research.max_worker_cycles;
        let tool_retry_budget = self.context.config.research.tool_retry_budget;
        let mut degenerate_retried = false;
        let mut final_answer: Option<String> = None;

        for cycle in 1..=max_cycles {
            let turn = match self.model_turn(cycle).await {
                Ok(turn) => turn,
                Err(e) => return self.failed_note(format!("研究轮次不可解析: {}", e)),
            };

            if turn.is_degenerate() {
                // 空响应先提醒重试一次，连续出现才视为失败
                if degenerate_retried {
                    return self.failed_note("模型连续返回空响应");
                }
                degenerate_retried = true;
                self.transcript.push(TranscriptEntry::Observation {
                    tool: "system".to_string(),
                    content: "上一轮既没有工具调用也没有结论。请调用可用工具继续研究，或在answer中给出最终结论。"
                        .to_string(),
                });
                continue;
            }

            if let Some(text) = &turn.text {
                if !text.trim().is_empty() {
                    self.transcript.push(TranscriptEntry::ModelNote(text.clone()));
                }
            }

            if turn.tool_calls.is_empty() {
                // 没有新的工具调用，本轮文本即为最终结论
                final_answer = turn.text;
                break;
            }

            match self.execute_tool_calls(&turn, tool_retry_budget).await {
                Ok(Some(answer)) => {
                    final_answer = Some(answer);
                    break;
                }
                Ok(None) => {}
                Err(reason) => return self.failed_note(reason),
            }
        }

        self.finish(final_answer).await
    }

    /// 单轮模型调用，解析失败时附带纠正指令重试一次
    async fn model_turn(&self, cycle: u32) -> Result<ModelTurn, EngineError> {
        let prompt_sys = self.build_system_prompt();
        let prompt_user = self.build_user_prompt(cycle).await;
        let tools = self.context.toolkit.definitions();

        match self
            .context
            .gateway
            .research_turn(&prompt_sys, &prompt_user, tools)
            .await
        {
            Ok(turn) => Ok(turn),
            Err(first_err) => {
                eprintln!(
                    "   ⚠️ 课题「{}」研究轮次解析失败，附带纠正指令重试: {}",
                    self.task.topic, first_err
                );
                let prompt_user_with_fixer = format!(
                    "{}\n\n**注意事项**你上一次的输出未能通过结构校验，错误信息为“{}”，这一次必须输出严格符合schema的JSON",
                    prompt_user, first_err
                );
                self.context
                    .gateway
                    .research_turn(&prompt_sys, &prompt_user_with_fixer, tools)
                    .await
                    .map_err(|second_err| EngineError::MalformedDecision {
                        context: format!("研究工作者[{}]: {}", self.task.topic, second_err),
                    })
            }
        }
    }

    /// 严格按模型返回顺序串行执行本轮工具调用
    ///
    /// 返回`Ok(Some(answer))`表示收到了研究完成信号；工具失败作为观察
    /// 喂回研究记录，超出失败预算时返回`Err`。
    async fn execute_tool_calls(
        &mut self,
        turn: &ModelTurn,
        tool_retry_budget: u32,
    ) -> Result<Option<String>, String> {
        for call in &turn.tool_calls {
            if ToolKit::is_completion_signal(&call.name) {
                let summary = call
                    .arguments
                    .get("summary")
                    .and_then(|v| v.as_str())
                    .map(str::to_string);
                return Ok(Some(
                    summary
                        .or_else(|| turn.text.clone())
                        .or_else(|| self.last_model_note())
                        .unwrap_or_else(|| "研究已完成，但模型未给出结论摘要。".to_string()),
                ));
            }

            self.tool_trace
                .push(format!("{}({})", call.name, call.arguments));

            match self
                .context
                .toolkit
                .execute(&call.name, call.arguments.clone())
                .await
            {
                Ok(execution) => {
                    for source in execution.sources {
                        if !self.sources.contains(&source) {
                            self.sources.push(source);
                        }
                    }
                    self.transcript.push(TranscriptEntry::Observation {
                        tool: call.name.clone(),
                        content: execution.content,
                    });
                }
                Err(e) => {
                    self.tool_failures += 1;
                    eprintln!(
                        "   ⚠️ 课题「{}」工具调用失败({}/{}): {}",
                        self.task.topic, self.tool_failures, tool_retry_budget, e
                    );
                    if self.tool_failures > tool_retry_budget {
                        return Err(format!(
                            "工具调用失败次数超出预算({})",
                            tool_retry_budget
                        ));
                    }
                    // 失败同样作为观察喂回，模型可调整参数或改用其他工具
                    self.transcript.push(TranscriptEntry::Observation {
                        tool: call.name.clone(),
                        content: format!("工具执行失败: {}。可以调整参数重试，或改用其他工具。", e),
                    });
                }
            }
        }

        Ok(None)
    }

    fn build_system_prompt(&self) -> String {
        let language_instruction = self.context.config.target_language.prompt_instruction();
        let system_prompt = format!(
            "你是深度研究系统的研究工作者，负责深入调查一个明确的研究课题。\
你在每一轮可以调用工具收集信息，也可以在信息充分时给出最终结论。工作要求：
1. 结论必须基于工具观察或你确有把握的事实，引用工具信息时原样保留其[来源: ...]标注；
2. 不要重复执行相同的查询，根据已有观察调整研究方向；
3. 信息已经足够回答课题时尽快收尾（调用research_complete，或让tool_calls为空并在answer中给出结论），不要为了凑轮次继续调用工具。

当前日期: {}",
            Utc::now().format("%Y-%m-%d")
        );

        format!("{}\n\n{}", system_prompt, language_instruction)
    }

    /// 组装本轮用户提示词，研究记录先经过压缩器保证落在预算内
    async fn build_user_prompt(&self, cycle: u32) -> String {
        let max_cycles = self.context.config.research.max_worker_cycles;
        let transcript = if self.transcript.is_empty() {
            "（尚无研究记录，这是第一轮）".to_string()
        } else {
            let rendered = render_transcript(&self.transcript);
            self.context
                .compressor
                .compress(self.context.gateway.as_ref(), "研究过程记录", &rendered)
                .await
                .content
        };

        format!(
            "## 总体研究问题\n{}\n\n## 你负责的研究课题\n{}\n\n## 研究进度\n第 {} / {} 轮\n\n## 研究过程记录\n{}\n\n请决定下一步行动。",
            self.brief_question, self.task.topic, cycle, max_cycles, transcript
        )
    }

    fn last_model_note(&self) -> Option<String> {
        self.transcript.iter().rev().find_map(|entry| match entry {
            TranscriptEntry::ModelNote(content) => Some(content.clone()),
            _ => None,
        })
    }

    /// 收尾：把完整研究记录压缩成一条有界的研究笔记
    async fn finish(mut self, final_answer: Option<String>) -> ResearchNote {
        let max_cycles = self.context.config.research.max_worker_cycles;
        let (outcome, answer) = match final_answer {
            Some(answer) => (NoteOutcome::Completed, answer),
            None => {
                eprintln!(
                    "   ⚠️ 课题「{}」达到最大研究轮次({})，强制收尾",
                    self.task.topic, max_cycles
                );
                let partial = self.last_model_note().unwrap_or_else(|| {
                    "研究因达到最大轮次而被中断，未能获得完整结论。".to_string()
                });
                (
                    NoteOutcome::Incomplete,
                    format!(
                        "{}\n\n[注意: 因达到最大研究轮次({})而被中断，结论可能不完整]",
                        partial, max_cycles
                    ),
                )
            }
        };

        let composed = format!(
            "## 课题结论\n{}\n\n## 研究过程纪要\n{}",
            answer,
            render_transcript(&self.transcript)
        );
        let content = self
            .context
            .compressor
            .compress(self.context.gateway.as_ref(), "研究笔记", &composed)
            .await
            .content;

        self.task.status = TaskStatus::Completed;
        if self.context.config.verbose {
            println!(
                "   ✅ 课题「{}」研究完成，共执行 {} 次工具调用",
                self.task.topic,
                self.tool_trace.len()
            );
        }

        ResearchNote {
            task_id: self.task.id,
            topic: self.task.topic,
            content,
            sources: self.sources,
            tool_trace: self.tool_trace,
            outcome,
            committed_at: Utc::now(),
        }
    }

    /// 把内部失败吸收为一条合成的失败笔记
    fn failed_note(mut self, reason: impl Into<String>) -> ResearchNote {
        let reason = reason.into();
        self.task.status = TaskStatus::Failed;
        eprintln!("   ❌ 课题「{}」研究失败: {}", self.task.topic, reason);

        let mut note = ResearchNote::failure(&self.task, reason);
        note.tool_trace = self.tool_trace;
        note
    }
}
