//! Sorrel Storefront - 餐食订阅店面嵌入式核心
//!
//! # 架构概述
//!
//! 本模块是店面 SDK 的主入口，提供以下核心功能：
//!
//! - **本地存储** (`store`): 嵌入式 redb 存储（购物车 + 访客身份）
//! - **购物车引擎** (`cart`): 读取-修改-持久化的同步购物车操作
//! - **结账编排** (`checkout`): 草稿校验、订单组装、单飞提交
//! - **访客追踪** (`tracking`): fire-and-forget 事件流水线
//! - **上下文句柄** (`context`): 交给宿主 UI 的两个作用域
//!
//! # 模块结构
//!
//! ```text
//! sorrel-storefront/src/
//! ├── config.rs      # 环境变量配置
//! ├── store.rs       # redb 本地存储
//! ├── cart.rs        # 购物车引擎
//! ├── checkout.rs    # 结账草稿与校验
//! ├── tracking/      # 事件服务、worker、section 观察
//! ├── context.rs     # CartContext / TrackingContext
//! ├── storefront.rs  # 组合根
//! └── utils/         # 日志等工具
//! ```

pub mod cart;
pub mod checkout;
pub mod config;
pub mod context;
pub mod store;
pub mod storefront;
pub mod tracking;
pub mod utils;

// Re-export 公共类型
pub use cart::CartService;
pub use checkout::{CheckoutDraft, CheckoutError, MIN_DELIVERY_LEAD_DAYS, min_delivery_date};
pub use config::Config;
pub use context::{CartContext, TrackingContext};
pub use store::{LocalStore, StoreError, StoreResult};
pub use storefront::Storefront;
pub use tracking::{
    ContactForm, SectionObserver, SessionCache, TRACKED_SECTIONS, TrackingService, TrackingWorker,
};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
