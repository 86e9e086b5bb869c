use sorrel_client::ClientConfig;

/// 店面配置 - 嵌入式 SDK 的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | SORREL_API_URL | http://localhost:3000 | CRM 服务地址 |
/// | SORREL_DATA_DIR | ./sorrel-data | 本地数据目录（redb 文件） |
/// | SORREL_HTTP_TIMEOUT_SECS | 30 | HTTP 请求超时（秒） |
/// | SORREL_TRACKING_QUEUE | 256 | 追踪事件队列容量 |
///
/// # 示例
///
/// ```ignore
/// SORREL_API_URL=https://crm.example.com cargo run --example storefront
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// CRM 服务基础 URL
    pub api_url: String,
    /// 本地数据目录，存放 cart / visitor 的 redb 文件
    pub data_dir: String,
    /// HTTP 请求超时（秒）
    pub http_timeout_secs: u64,
    /// 追踪事件有界队列容量，满了丢弃新事件
    pub tracking_queue: usize,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            api_url: std::env::var("SORREL_API_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            data_dir: std::env::var("SORREL_DATA_DIR").unwrap_or_else(|_| "./sorrel-data".into()),
            http_timeout_secs: std::env::var("SORREL_HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30),
            tracking_queue: std::env::var("SORREL_TRACKING_QUEUE")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(256),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(api_url: impl Into<String>, data_dir: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.api_url = api_url.into();
        config.data_dir = data_dir.into();
        config
    }

    /// 派生 CRM 客户端配置
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(&self.api_url).with_timeout(self.http_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
