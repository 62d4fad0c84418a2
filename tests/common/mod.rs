//! 集成测试共用设施：脚本化模型网关与测试配置
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use rig::completion::ToolDefinition;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tempfile::TempDir;

use deepquest_rs::config::Config;
use deepquest_rs::llm::client::{ModelGateway, ModelTurn, ToolInvocation};

/// 预先编排好的一轮研究响应
pub enum ScriptedTurn {
    /// 正常响应：可选文本加按序的工具调用
    Respond {
        text: Option<String>,
        calls: Vec<(String, Value)>,
    },
    /// 本轮返回错误（模拟结构化输出解析失败）
    Fail(String),
}

impl ScriptedTurn {
    /// 纯文本最终结论，没有工具调用
    pub fn answer(text: &str) -> Self {
        ScriptedTurn::Respond {
            text: Some(text.to_string()),
            calls: Vec::new(),
        }
    }

    /// 单个工具调用，没有文本
    pub fn tool_call(name: &str, arguments: Value) -> Self {
        ScriptedTurn::Respond {
            text: None,
            calls: vec![(name.to_string(), arguments)],
        }
    }

    /// 既无文本也无工具调用的退化输出
    pub fn degenerate() -> Self {
        ScriptedTurn::Respond {
            text: None,
            calls: Vec::new(),
        }
    }
}

/// 脚本化模型网关
///
/// 结构化提取与文本生成按全局先进先出队列消费；研究轮次按课题路由到
/// 各自的队列，保证并发工作者之间的脚本互不干扰。`cliff_chars`模拟
/// 上下文超过阈值后工具调用能力崩塌的现象，只作用于研究轮次。
pub struct ScriptedGateway {
    extractions: Mutex<VecDeque<Value>>,
    generations: Mutex<VecDeque<String>>,
    turns_by_topic: Mutex<HashMap<String, VecDeque<ScriptedTurn>>>,
    default_turns: Mutex<VecDeque<ScriptedTurn>>,
    latencies: HashMap<String, Duration>,
    cliff_chars: Option<usize>,
}

impl Default for ScriptedGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self {
            extractions: Mutex::new(VecDeque::new()),
            generations: Mutex::new(VecDeque::new()),
            turns_by_topic: Mutex::new(HashMap::new()),
            default_turns: Mutex::new(VecDeque::new()),
            latencies: HashMap::new(),
            cliff_chars: None,
        }
    }

    /// 设定研究轮次的上下文崩塌阈值（字符数）
    pub fn with_cliff(mut self, chars: usize) -> Self {
        self.cliff_chars = Some(chars);
        self
    }

    /// 为某课题的研究轮次注入固定延迟，用于构造确定的完成顺序
    pub fn with_latency(mut self, topic: &str, millis: u64) -> Self {
        self.latencies
            .insert(topic.to_string(), Duration::from_millis(millis));
        self
    }

    pub fn queue_extraction(&self, value: Value) {
        self.extractions.lock().unwrap().push_back(value);
    }

    pub fn queue_generation(&self, text: &str) {
        self.generations.lock().unwrap().push_back(text.to_string());
    }

    pub fn queue_turn_for(&self, topic: &str, turn: ScriptedTurn) {
        self.turns_by_topic
            .lock()
            .unwrap()
            .entry(topic.to_string())
            .or_default()
            .push_back(turn);
    }

    pub fn queue_turn(&self, turn: ScriptedTurn) {
        self.default_turns.lock().unwrap().push_back(turn);
    }

    fn route_topic(&self, user_prompt: &str) -> Option<String> {
        let turns = self.turns_by_topic.lock().unwrap();
        turns
            .keys()
            .find(|topic| user_prompt.contains(topic.as_str()))
            .cloned()
    }
}

#[async_trait]
impl ModelGateway for ScriptedGateway {
    async fn extract<T>(&self, _system_prompt: &str, _user_prompt: &str) -> Result<T>
    where
        T: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static,
    {
        let value = self
            .extractions
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow!("no scripted extraction available"))?;

        serde_json::from_value(value)
            .map_err(|e| anyhow!("scripted extraction does not match schema: {}", e))
    }

    async fn generate(&self, _system_prompt: &str, _user_prompt: &str) -> Result<String> {
        self.generations
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow!("no scripted generation available"))
    }

    async fn research_turn(
        &self,
        _system_prompt: &str,
        user_prompt: &str,
        _tools: &[ToolDefinition],
    ) -> Result<ModelTurn> {
        let topic = self.route_topic(user_prompt);

        if let Some(topic) = &topic {
            if let Some(delay) = self.latencies.get(topic) {
                tokio::time::sleep(*delay).await;
            }
        }

        // 上下文崩塌：超过阈值后不再消费脚本，直接返回解析失败
        if let Some(limit) = self.cliff_chars {
            if user_prompt.chars().count() > limit {
                return Err(anyhow!(
                    "context of {} chars exceeds reliable tool-calling window",
                    user_prompt.chars().count()
                ));
            }
        }

        let scripted = match &topic {
            Some(topic) => self
                .turns_by_topic
                .lock()
                .unwrap()
                .get_mut(topic)
                .and_then(|queue| queue.pop_front()),
            None => self.default_turns.lock().unwrap().pop_front(),
        };

        match scripted {
            Some(ScriptedTurn::Respond { text, calls }) => Ok(ModelTurn {
                text,
                tool_calls: calls
                    .into_iter()
                    .map(|(name, arguments)| ToolInvocation { name, arguments })
                    .collect(),
            }),
            Some(ScriptedTurn::Fail(message)) => Err(anyhow!(message)),
            None => Err(anyhow!("no scripted research turn available")),
        }
    }

    async fn check_connection(&self) -> Result<()> {
        Ok(())
    }
}

/// 不访问网络、会话落盘到临时目录的测试配置
pub fn offline_config(temp_dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.tools.enable_web_search = false;
    config.session.session_dir = temp_dir.path().join("sessions");
    config.output_path = None;
    config
}
