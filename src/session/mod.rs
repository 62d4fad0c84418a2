//! 研究会话持久化
//!
//! 澄清阶段挂起时，运行状态以JSON文件落盘；用户带会话ID回复后恢复。
//! 过期会话在加载时被清除。

use anyhow::Result;
use std::path::PathBuf;
use tokio::fs;

use crate::config::SessionConfig;
use crate::types::RunState;

/// 会话存储管理器
pub struct SessionStore {
    config: SessionConfig,
}

impl SessionStore {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    /// 清洗会话ID中的路径敏感字符，避免构造出目录之外的文件路径
    fn sanitize_id(session_id: &str) -> String {
        session_id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }

    /// 获取会话文件路径
    fn session_path(&self, session_id: &str) -> PathBuf {
        self.config
            .session_dir
            .join(format!("{}.json", Self::sanitize_id(session_id)))
    }

    /// 检查会话是否过期
    fn is_expired(&self, state: &RunState) -> bool {
        let age = chrono::Utc::now().signed_duration_since(state.updated_at);
        age > chrono::Duration::hours(self.config.expire_hours as i64)
    }

    /// 加载会话状态
    ///
    /// 会话不存在、已过期或无法解析时返回None，过期会话文件会被删除。
    pub async fn load(&self, session_id: &str) -> Result<Option<RunState>> {
        if !self.config.enabled {
            return Ok(None);
        }

        let path = self.session_path(session_id);
        if !path.exists() {
            return Ok(None);
        }

        match fs::read_to_string(&path).await {
            Ok(content) => match serde_json::from_str::<RunState>(&content) {
                Ok(state) => {
                    if self.is_expired(&state) {
                        // 删除过期会话
                        let _ = fs::remove_file(&path).await;
                        return Ok(None);
                    }
                    Ok(Some(state))
                }
                Err(e) => {
                    eprintln!("⚠️ 会话文件解析失败 {:?}: {}", path, e);
                    Ok(None)
                }
            },
            Err(e) => {
                eprintln!("⚠️ 会话文件读取失败 {:?}: {}", path, e);
                Ok(None)
            }
        }
    }

    /// 保存会话状态
    pub async fn save(&self, state: &RunState) -> Result<()> {
        if !self.config.enabled {
            return Ok(());
        }

        let path = self.session_path(&state.session_id);

        // 确保目录存在
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(state)?;
        fs::write(&path, content).await?;
        Ok(())
    }

    /// 删除会话状态
    pub async fn remove(&self, session_id: &str) -> Result<()> {
        let path = self.session_path(session_id);
        if path.exists() {
            fs::remove_file(&path).await?;
        }
        Ok(())
    }
}
