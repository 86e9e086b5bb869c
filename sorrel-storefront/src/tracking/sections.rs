//! Section 可见度观察
//!
//! 宿主 UI 持续上报每个 section 的可见比例；某个白名单 section
//! 首次越过 50% 可见时发送一条 `section_view_<id>` click 事件。
//! 边沿触发：降到阈值以下后再次越过会重新触发。

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use super::service::TrackingService;

/// Sections worth a view event. Everything else is scroll noise.
pub const TRACKED_SECTIONS: [&str; 4] = ["pricing", "menu", "contact", "how-it-works"];

const VISIBILITY_THRESHOLD: f64 = 0.5;

/// Edge-triggered section visibility tracker.
pub struct SectionObserver {
    tracking: Arc<TrackingService>,
    /// id → currently above the threshold
    visible: Mutex<HashMap<String, bool>>,
}

impl SectionObserver {
    pub fn new(tracking: Arc<TrackingService>) -> Self {
        Self {
            tracking,
            visible: Mutex::new(HashMap::new()),
        }
    }

    /// Report the visible ratio (0.0 to 1.0) of a section.
    ///
    /// Fires `section_view_<id>` when an allow-listed section crosses
    /// the threshold from below. Repeated reports above the threshold
    /// do not re-fire.
    pub fn report(&self, section_id: &str, visible_ratio: f64) {
        let above = visible_ratio >= VISIBILITY_THRESHOLD;

        let mut visible = self.visible.lock();
        let was_above = visible
            .insert(section_id.to_string(), above)
            .unwrap_or(false);
        drop(visible);

        if above && !was_above && TRACKED_SECTIONS.contains(&section_id) {
            self.tracking.click(&format!("section_view_{section_id}"), None);
        }
    }
}
