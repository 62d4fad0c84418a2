use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 研究简报 - 从对话中提炼出的单一结构化研究问题
///
/// 创建后不可变；`created_at` 用于提示词中的日期感知表述。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchBrief {
    pub question: String,
    pub created_at: DateTime<Utc>,
}

impl ResearchBrief {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            created_at: Utc::now(),
        }
    }
}

/// 委派任务的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

/// 主管派发给研究工作者的一个工作单元
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelegatedTask {
    /// 会话内唯一标识
    pub id: String,
    /// 子研究课题
    pub topic: String,
    pub status: TaskStatus,
}

impl DelegatedTask {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            topic: topic.into(),
            status: TaskStatus::Pending,
        }
    }
}

/// 研究笔记的结局标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteOutcome {
    /// 工作者正常完成研究
    Completed,
    /// 因轮次预算耗尽被强制收尾，内容可能不完整
    Incomplete,
    /// 工作者失败，笔记为合成的失败说明
    Failed,
}

/// 一个已完成委派任务的持久产出
///
/// 内容为经过压缩、带来源标注的研究发现摘要。
/// 一经提交到 `RunState::research_notes` 即不可变。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchNote {
    pub task_id: String,
    pub topic: String,
    /// 压缩后的研究发现，保留来源标注
    pub content: String,
    /// 贡献了内容的来源标签（如搜索结果URL、文档路径）
    pub sources: Vec<String>,
    /// 已执行工具调用的紧凑记录
    pub tool_trace: Vec<String>,
    pub outcome: NoteOutcome,
    pub committed_at: DateTime<Utc>,
}

impl ResearchNote {
    /// 为失败的工作者合成一条失败说明笔记
    pub fn failure(task: &DelegatedTask, reason: impl Into<String>) -> Self {
        Self {
            task_id: task.id.clone(),
            topic: task.topic.clone(),
            content: format!(
                "【研究失败】课题“{}”未能产出研究结果：{}。最终报告中对应内容存在缺口。",
                task.topic,
                reason.into()
            ),
            sources: Vec::new(),
            tool_trace: Vec::new(),
            outcome: NoteOutcome::Failed,
            committed_at: Utc::now(),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.outcome == NoteOutcome::Failed
    }
}
