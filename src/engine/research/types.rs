use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// 研究主管的结构化决策
///
/// 主管的选择必须是机器可校验的结构化输出，散文输出一律视为
/// 不可解析的决策。
#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SupervisorDecision {
    // 已有笔记不足以回答研究问题，派发新一批研究课题
    Delegate {
        // 本轮要调查的课题列表，课题之间相互独立、可并行
        topics: Vec<String>,
    },
    // 已有笔记足以支撑最终报告，结束研究阶段
    Conclude,
}

/// 工作者本地研究记录中的一个条目
///
/// 记录只属于单个工作者，绝不与其他并发工作者共享。
#[derive(Debug, Clone)]
pub enum TranscriptEntry {
    /// 一次工具执行的观察结果
    Observation { tool: String, content: String },
    /// 模型在某一轮给出的阶段性文字
    ModelNote(String),
}

/// 将本地研究记录渲染为提示词片段
pub(crate) fn render_transcript(entries: &[TranscriptEntry]) -> String {
    entries
        .iter()
        .map(|entry| match entry {
            TranscriptEntry::Observation { tool, content } => {
                format!("### 工具观察 [{}]\n{}", tool, content)
            }
            TranscriptEntry::ModelNote(content) => {
                format!("### 阶段性结论\n{}", content)
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
