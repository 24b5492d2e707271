//! Quill - 小说章节内容生命周期服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Envelope: 统一结果信封与错误码
//! - Chapter Context: 章节草稿、自动保存、发布
//!
//! 应用层 (application/):
//! - Ports: 端口定义（ChapterRepository, Clock, PublishScheduler）
//! - Commands: CQRS 命令处理器
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: JSON API，响应体均为结果信封
//! - Memory: 章节仓储与定时发布意图的内存实现
//! - Persistence: SQLite 存储
//! - Clock: 系统时钟 / 固定时钟

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
