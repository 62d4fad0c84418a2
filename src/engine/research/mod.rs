use crate::engine::context::RunContext;
use crate::error::EngineError;
use crate::llm::client::ModelGateway;
use crate::types::{ResearchBrief, RunState};

pub mod supervisor;
pub mod types;
pub mod worker;

pub use supervisor::ResearchSupervisor;
pub use types::SupervisorDecision;

/// 执行研究阶段
pub async fn execute<G>(
    context: &RunContext<G>,
    brief: &ResearchBrief,
    state: &mut RunState,
) -> Result<(), EngineError>
where
    G: ModelGateway + 'static,
{
    let supervisor = ResearchSupervisor;
    supervisor.execute(context, brief, state).await
}
