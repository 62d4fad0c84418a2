use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::research::{ResearchBrief, ResearchNote};

/// 研究会话所处的阶段
///
/// 阶段只能沿 `Clarifying → Scoped → Researching → Synthesizing → Done`
/// 单向推进，唯一的回退是澄清请求使会话重新进入 `Clarifying`。
/// 阶段字段仅由工作流编排器写入。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// 等待或处理用户澄清
    Clarifying,
    /// 研究简报已确定
    Scoped,
    /// 主管正在派发研究任务
    Researching,
    /// 正在合成最终报告
    Synthesizing,
    /// 会话结束
    Done,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Clarifying => write!(f, "clarifying"),
            Phase::Scoped => write!(f, "scoped"),
            Phase::Researching => write!(f, "researching"),
            Phase::Synthesizing => write!(f, "synthesizing"),
            Phase::Done => write!(f, "done"),
        }
    }
}

/// 对话轮次的发言方
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    User,
    Assistant,
}

/// 一条对话轮次记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub speaker: Speaker,
    pub content: String,
    pub at: DateTime<Utc>,
}

/// 一次研究会话的顶层可变状态
///
/// 由工作流编排器独占持有，阶段组件以引用方式访问。
/// `conversation` 与 `research_notes` 为仅追加序列：
/// 组件可以追加条目，但绝不能重排或删除已有条目。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    /// 会话标识，用于澄清挂起后的恢复
    pub session_id: String,

    /// 按时间排列的对话轮次
    pub conversation: Vec<ConversationTurn>,

    /// 当前阶段
    pub phase: Phase,

    /// 确定范围后产生的研究简报
    pub brief: Option<ResearchBrief>,

    /// 按完成提交顺序排列的研究笔记
    pub research_notes: Vec<ResearchNote>,

    /// 最终报告
    pub report: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl RunState {
    /// 创建新的会话状态，初始阶段为 `Clarifying`
    pub fn new(session_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.into(),
            conversation: Vec::new(),
            phase: Phase::Clarifying,
            brief: None,
            research_notes: Vec::new(),
            report: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// 追加一条用户轮次
    pub fn append_user_turn(&mut self, content: impl Into<String>) {
        self.push_turn(Speaker::User, content.into());
    }

    /// 追加一条助手轮次
    pub fn append_assistant_turn(&mut self, content: impl Into<String>) {
        self.push_turn(Speaker::Assistant, content.into());
    }

    fn push_turn(&mut self, speaker: Speaker, content: String) {
        self.conversation.push(ConversationTurn {
            speaker,
            content,
            at: Utc::now(),
        });
        self.updated_at = Utc::now();
    }

    /// 提交一条研究笔记，笔记一经提交即不可变
    pub fn commit_note(&mut self, note: ResearchNote) {
        self.research_notes.push(note);
        self.updated_at = Utc::now();
    }
}
