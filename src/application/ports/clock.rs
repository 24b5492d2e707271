//! Clock Port - 时间来源
//!
//! 引擎不直接读取系统时间，由调用方注入

use chrono::{DateTime, Utc};

/// Clock Port
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
