//! 访客追踪模块 - 轻量事件流水线
//!
//! # 架构
//!
//! ```text
//! 宿主 UI 触发
//!   ├─ TrackingService::track() → mpsc → TrackingWorker → CRM (/api/public/events)
//!   └─ identify / contact / newsletter → 直接 HTTP（结果返回调用方）
//!
//! 会话: 首个事件响应带回 sessionId → 进程内缓存 → 后续事件自动附带
//! ```
//!
//! # Fire-and-forget 保证
//!
//! - **永不阻塞**: 事件经有界通道派发，满了就丢
//! - **永不报错**: 发送失败只记 debug 日志
//! - **访客优先**: 任何追踪故障都不影响购物流程

pub mod sections;
pub mod service;
pub mod worker;

pub use sections::{SectionObserver, TRACKED_SECTIONS};
pub use service::{ContactForm, SessionCache, TrackingService};
pub use worker::TrackingWorker;
