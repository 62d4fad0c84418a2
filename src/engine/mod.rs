//! 深度研究引擎
//!
//! 按阶段推进一次研究会话：范围界定、并发研究、报告合成。
//! `workflow` 是唯一的对外入口，其余模块对应各阶段组件。

pub mod agent_executor;
pub mod context;
pub mod report;
pub mod research;
pub mod scope;
pub mod workflow;

pub use context::RunContext;
pub use workflow::{RunOutcome, launch, run};
