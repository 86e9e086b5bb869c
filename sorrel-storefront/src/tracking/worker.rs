//! 追踪事件后台 Worker
//!
//! 从 mpsc 通道消费 TrackingEvent，逐条 POST 到 CRM。
//! 发送失败只记 debug 日志，绝不影响前台。
//! 通道关闭时自动退出。

use shared::tracking::TrackingEvent;
use sorrel_client::HttpClient;

use super::service::SessionCache;

/// 追踪事件后台 Worker
///
/// 发送前把缓存的 sessionId 盖到事件上；响应若带回新的
/// sessionId 且当前没有缓存，则存入缓存。
pub struct TrackingWorker {
    http: HttpClient,
    session: SessionCache,
}

impl TrackingWorker {
    pub fn new(http: HttpClient, session: SessionCache) -> Self {
        Self { http, session }
    }

    /// 运行 worker（阻塞直到通道关闭）
    pub async fn run(self, mut rx: tokio::sync::mpsc::Receiver<TrackingEvent>) {
        tracing::info!("Tracking dispatch worker started");

        while let Some(mut event) = rx.recv().await {
            let held = self.session.get();
            event.session_id = held.clone();

            match self.http.post_event(&event).await {
                Ok(ack) => {
                    if let Some(granted) = ack.session_id
                        && held.is_none()
                    {
                        self.session.set(granted);
                    }
                    tracing::debug!(event_type = %event.event_type, "Tracking event delivered");
                }
                Err(e) => {
                    tracing::debug!(
                        event_type = %event.event_type,
                        error = %e,
                        "Tracking event dropped"
                    );
                }
            }
        }

        tracing::info!("Tracking channel closed, worker stopping");
    }
}
