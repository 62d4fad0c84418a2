//! 报告合成阶段
//!
//! 基于研究简报和全部研究笔记合成最终报告。这是研究成果唯一的出口：
//! 合成失败没有兜底内容，作为会话的终止错误上浮。

use std::fs;
use std::path::Path;

use anyhow::Result;

use crate::engine::context::RunContext;
use crate::error::EngineError;
use crate::llm::client::ModelGateway;
use crate::types::{NoteOutcome, ResearchBrief, ResearchNote, RunState};

/// 报告撰写智能体
#[derive(Default)]
pub struct ReportComposer;

impl ReportComposer {
    /// 单次模型调用合成最终报告，不使用任何工具
    pub async fn execute<G: ModelGateway>(
        &self,
        context: &RunContext<G>,
        brief: &ResearchBrief,
        state: &RunState,
    ) -> Result<String, EngineError> {
        println!(
            "🖊️ 开始合成最终报告（{}条研究笔记）...",
            state.research_notes.len()
        );

        let rendered = render_notes(&state.research_notes);
        let digest = context
            .compressor
            .compress(context.gateway.as_ref(), "研究笔记全集", &rendered)
            .await
            .content;

        let prompt_user = format!(
            "## 研究问题\n{}\n\n## 报告日期\n{}\n\n## 研究笔记\n{}\n\n请撰写最终研究报告。",
            brief.question,
            brief.created_at.format("%Y-%m-%d"),
            digest
        );

        let report = context
            .gateway
            .generate(&self.build_system_prompt(context), &prompt_user)
            .await
            .map_err(|e| EngineError::SynthesisFailure(e.to_string()))?;

        println!("   ✅ 报告合成完成（{} 字符）", report.chars().count());
        Ok(report)
    }

    fn build_system_prompt<G: ModelGateway>(&self, context: &RunContext<G>) -> String {
        let language_instruction = context.config.target_language.prompt_instruction();
        let system_prompt = "你是深度研究系统的报告撰写人，基于研究简报和全部研究笔记撰写一份结构完整的研究报告。要求：
1. 报告只使用研究笔记中的信息，不得虚构笔记之外的事实；
2. 正文引用某条笔记的发现时标注其编号（如[笔记2]），并保留笔记中的[来源: ...]标注；
3. 对标注为失败或不完整的课题，在报告中明确说明对应内容存在缺口；
4. 使用Markdown格式，以一段简短的执行摘要开头。";

        format!("{}\n\n{}", system_prompt, language_instruction)
    }
}

/// 执行报告合成阶段
pub async fn execute<G: ModelGateway>(
    context: &RunContext<G>,
    brief: &ResearchBrief,
    state: &RunState,
) -> Result<String, EngineError> {
    let composer = ReportComposer;
    composer.execute(context, brief, state).await
}

/// 将报告写入输出文件
pub fn save_report(output_path: &Path, report: &str) -> Result<()> {
    if let Some(parent_dir) = output_path.parent() {
        if !parent_dir.exists() {
            fs::create_dir_all(parent_dir)?;
        }
    }
    fs::write(output_path, report)?;
    println!("💾 报告已保存: {}", output_path.display());
    Ok(())
}

/// 将研究笔记渲染为带编号的报告素材，编号供正文引用
fn render_notes(notes: &[ResearchNote]) -> String {
    if notes.is_empty() {
        return "（没有任何研究笔记，请在报告中如实说明研究阶段未能收集到信息）".to_string();
    }

    notes
        .iter()
        .enumerate()
        .map(|(i, note)| {
            let mut section = format!(
                "### [笔记{}] 课题: {}（{}）\n{}",
                i + 1,
                note.topic,
                outcome_label(note.outcome),
                note.content
            );
            if !note.sources.is_empty() {
                section.push_str(&format!("\n涉及来源: {}", note.sources.join("、")));
            }
            section
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
