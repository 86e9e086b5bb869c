//! 访客追踪服务
//!
//! `TrackingService` 是事件追踪的核心服务，提供：
//! - 事件上报（通过 mpsc 通道异步派发，永不阻塞调用方）
//! - 访客识别（email ↔ visitorId 绑定）
//! - 联系表单 / 订阅表单提交（成功后自动补发对应事件）
//! - 当前页面上下文管理（事件默认归属最近上报的页面）

use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::{Value, json};
use shared::api::{
    ContactOutcome, ContactRequest, IdentifyRequest, NewsletterOutcome, NewsletterRequest,
};
use shared::tracking::{
    DeviceType, EventType, NewsletterSource, PageContext, TrackingEvent, UtmParams,
};
use sorrel_client::HttpClient;
use tokio::sync::mpsc;
use validator::{Validate, ValidationErrors};

/// 进程生命周期内的会话缓存
///
/// CRM 在首个事件响应中签发 sessionId；之后由 worker 附加到每个
/// 事件上。进程结束即失效，不落盘。
#[derive(Debug, Clone, Default)]
pub struct SessionCache {
    inner: Arc<RwLock<Option<String>>>,
}

impl SessionCache {
    pub fn get(&self) -> Option<String> {
        self.inner.read().clone()
    }

    pub(crate) fn set(&self, session_id: String) {
        *self.inner.write() = Some(session_id);
    }
}

/// Contact form input as collected from the customer.
#[derive(Debug, Clone, Validate)]
pub struct ContactForm {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    pub phone: Option<String>,
    pub message: Option<String>,
}

/// 访客追踪服务
///
/// 事件类操作通过 mpsc 通道派发给后台 worker 逐条 POST；
/// 识别 / 表单类操作直接走 HTTP 并把结果返回调用方。
pub struct TrackingService {
    visitor_id: String,
    http: HttpClient,
    session: SessionCache,
    /// 最近一次上报的页面，事件默认归属于它
    page: RwLock<PageContext>,
    tx: mpsc::Sender<TrackingEvent>,
}

impl std::fmt::Debug for TrackingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackingService")
            .field("visitor_id", &self.visitor_id)
            .finish_non_exhaustive()
    }
}

impl TrackingService {
    /// 创建追踪服务
    ///
    /// 返回的 Receiver 必须交给 [`TrackingWorker::run`] 消费，
    /// 否则通道填满后事件会被丢弃。
    ///
    /// [`TrackingWorker::run`]: super::worker::TrackingWorker::run
    pub fn new(
        http: HttpClient,
        visitor_id: String,
        session: SessionCache,
        buffer_size: usize,
    ) -> (Arc<Self>, mpsc::Receiver<TrackingEvent>) {
        let (tx, rx) = mpsc::channel(buffer_size);
        let service = Arc::new(Self {
            visitor_id,
            http,
            session,
            page: RwLock::new(PageContext::default()),
            tx,
        });
        (service, rx)
    }

    /// Durable visitor id this storefront reports under.
    pub fn visitor_id(&self) -> &str {
        &self.visitor_id
    }

    /// Session id granted by the CRM, if one has arrived yet.
    pub fn session_id(&self) -> Option<String> {
        self.session.get()
    }

    /// 上报启动页面 - 捕获 UTM 参数与设备类型，发送首个 page_view
    ///
    /// 首事件的 eventData 带 `isInitial: true`，并展开 UTM 字段、
    /// deviceType 与 referrer（若有）。
    pub fn init(&self, page: PageContext) {
        let utm = UtmParams::from_url(&page.url);
        let device = page
            .user_agent
            .as_deref()
            .map(DeviceType::classify)
            .unwrap_or_default();

        let mut data = utm.to_fields();
        data.insert("deviceType".to_string(), json!(device.as_str()));
        if let Some(referrer) = &page.referrer {
            data.insert("referrer".to_string(), json!(referrer));
        }
        data.insert("isInitial".to_string(), json!(true));

        *self.page.write() = page;
        self.track(EventType::PageView, Some(Value::Object(data)));
    }

    /// 页面切换 - 更新当前页面并发送 page_view
    pub fn page_view(&self, page: PageContext) {
        *self.page.write() = page;
        self.track(EventType::PageView, None);
    }

    /// Report a click on a named element, with optional extra fields.
    pub fn click(&self, element: &str, data: Option<serde_json::Map<String, Value>>) {
        let mut fields = serde_json::Map::new();
        fields.insert("element".to_string(), json!(element));
        if let Some(extra) = data {
            fields.extend(extra);
        }
        self.track(EventType::Click, Some(Value::Object(fields)));
    }

    /// Report that a menu item was viewed in detail.
    pub fn menu_view(&self, item_id: &str, item_name: &str) {
        self.track(
            EventType::MenuView,
            Some(json!({ "itemId": item_id, "itemName": item_name })),
        );
    }

    /// Report a subscription plan selection.
    pub fn plan_select(&self, plan_name: &str, price: f64) {
        self.track(
            EventType::PlanSelect,
            Some(json!({ "planName": plan_name, "price": price })),
        );
    }

    /// Report that the checkout flow was opened.
    pub fn checkout_start(&self, plan_name: Option<&str>, total: f64) {
        let mut data = serde_json::Map::new();
        if let Some(plan_name) = plan_name {
            data.insert("planName".to_string(), json!(plan_name));
        }
        data.insert("total".to_string(), json!(total));
        self.track(EventType::CheckoutStart, Some(Value::Object(data)));
    }

    /// 通用事件上报 - 立即返回，实际发送由后台 worker 完成
    ///
    /// 通道已满或已关闭时丢弃事件（fire-and-forget）。
    pub fn track(&self, event_type: EventType, data: Option<Value>) {
        let page = self.page.read().clone();
        let mut event = TrackingEvent::new(&self.visitor_id, event_type, &page);
        if let Some(data) = data {
            event = event.with_data(data);
        }

        if let Err(e) = self.tx.try_send(event) {
            tracing::debug!("tracking queue full or closed, dropping event: {}", e);
        }
    }

    /// 把访客绑定到邮箱 - 失败静默，返回 None
    pub async fn identify(
        &self,
        email: &str,
        name: Option<String>,
        phone: Option<String>,
    ) -> Option<String> {
        let request = IdentifyRequest {
            visitor_id: self.visitor_id.clone(),
            email: email.to_string(),
            name,
            phone,
        };

        match self.http.identify(&request).await {
            Ok(ack) => ack.customer_id,
            Err(e) => {
                tracing::debug!(error = %e, "identify request failed");
                None
            }
        }
    }

    /// 提交联系表单
    ///
    /// 先本地校验（不合格不发网络请求），成功后补发 contact_submit 事件。
    pub async fn submit_contact(&self, form: &ContactForm) -> ContactOutcome {
        if let Err(errors) = form.validate() {
            return ContactOutcome::Rejected {
                message: validation_message(&errors),
            };
        }

        let request = ContactRequest {
            name: form.name.clone(),
            email: form.email.clone(),
            phone: form.phone.clone(),
            message: form.message.clone(),
            visitor_id: Some(self.visitor_id.clone()),
        };

        let outcome = self.http.submit_contact(&request).await;
        if outcome.is_accepted() {
            self.track(EventType::ContactSubmit, Some(json!({ "email": form.email })));
        }
        outcome
    }

    /// 订阅 newsletter - 成功后补发 newsletter_signup 事件
    pub async fn subscribe_newsletter(
        &self,
        email: &str,
        source: NewsletterSource,
    ) -> NewsletterOutcome {
        let request = NewsletterRequest {
            email: email.to_string(),
            source,
            visitor_id: Some(self.visitor_id.clone()),
        };

        let outcome = self.http.subscribe_newsletter(&request).await;
        if outcome.is_subscribed() {
            self.track(
                EventType::NewsletterSignup,
                Some(json!({ "email": email, "source": source.as_str() })),
            );
        }
        outcome
    }
}

/// First presentable message out of a validation failure, fields in
/// display order.
fn validation_message(errors: &ValidationErrors) -> String {
    let field_errors = errors.field_errors();
    for field in ["name", "email"] {
        if let Some(list) = field_errors.get(field)
            && let Some(err) = list.first()
            && let Some(message) = &err.message
        {
            return message.to_string();
        }
    }
    "Please check the form and try again.".to_string()
}
