/// 研究引擎错误分类
///
/// 区分可降级错误（工具失败、工作者失败）与致命错误（合成失败）。
/// 可降级错误在引擎内部被吸收为降级笔记，不会中断整次运行。
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// 工具执行失败，作为结果反馈给模型而非向上抛出
    #[error("tool '{tool}' failed: {message}")]
    ToolFailure { tool: String, message: String },

    /// 模型输出在一次纠正性重试后仍不符合预期的决策结构
    #[error("malformed model decision ({context})")]
    MalformedDecision { context: String },

    /// 研究工作者任务异常终止
    #[error("research worker for task '{task_id}' failed: {reason}")]
    WorkerFailed { task_id: String, reason: String },

    /// 主管在决策轮次内未能给出有效决策，被迫强制收尾
    #[error("research supervisor stalled without a valid decision")]
    SupervisorStalled,

    /// 最终报告合成失败，整次运行失败
    #[error("report synthesis failed: {0}")]
    SynthesisFailure(String),

    /// 恢复会话时找不到对应的会话记录
    #[error("session '{0}' not found")]
    SessionNotFound(String),
}
