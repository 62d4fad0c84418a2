use crate::engine::workflow::{RunOutcome, launch};
use anyhow::Result;
use clap::Parser;

mod cli;
mod config;
mod engine;
mod error;
mod i18n;
mod llm;
mod session;
mod types;
mod utils;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();
    let question = args.question.clone();
    let session = args.session.clone();
    let config = args.into_config();

    match launch(&config, &question, session.as_deref()).await? {
        RunOutcome::ClarificationNeeded {
            session_id,
            question,
        } => {
            println!("\n❓ {}", question);
            println!(
                "💡 请携带你的回复并附加 --session {} 再次运行以继续本次研究",
                session_id
            );
        }
        RunOutcome::Completed { session_id, report } => {
            println!("\n{}", report);
            println!("\n✅ 会话 {} 已完成", session_id);
        }
    }

    Ok(())
}
