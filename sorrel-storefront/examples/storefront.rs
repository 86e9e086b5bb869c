// sorrel-storefront/examples/storefront.rs
// 店面 SDK 完整走查 - 需要一个可访问的 CRM（SORREL_API_URL）

use shared::cart::SelectedPlan;
use shared::tracking::{NewsletterSource, PageContext};
use sorrel_storefront::{CheckoutDraft, Config, Storefront, min_delivery_date};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    sorrel_storefront::init_logger();

    let config = Config::from_env();
    tracing::info!("Connecting to CRM at {}", config.api_url);

    let storefront = Storefront::open(config)?;
    let tracking = storefront.tracking();
    let cart = storefront.cart();

    // 上报落地页（带 UTM 归因）
    tracking.init(
        PageContext::new("https://sorrel.example/?utm_source=demo", "Sorrel Meals")
            .with_user_agent("sorrel-demo/0.1"),
    );
    tracking.report_section("menu", 0.9);

    let menu = storefront.load_menu().await;
    tracing::info!("Menu has {} items", menu.len());

    if let Some(item) = menu.first() {
        cart.add_item(item, 2)?;
        tracking.menu_view(&item.id, &item.name);
    }

    cart.set_plan(SelectedPlan {
        name: "Solo Plan".to_string(),
        price: 99.0,
        meals: 8,
    })?;
    tracking.plan_select("Solo Plan", 99.0);

    let totals = cart.totals();
    tracing::info!(
        "Cart: {} items, total ${:.2} (discount ${:.2})",
        totals.item_count,
        totals.total,
        totals.discount
    );

    tracking.checkout_start(Some("Solo Plan"), totals.total);

    let draft = CheckoutDraft {
        name: "Demo Customer".to_string(),
        email: "demo@example.com".to_string(),
        phone: None,
        delivery_address: "12 Garden Lane".to_string(),
        delivery_notes: None,
        neighborhood: None,
        delivery_date: min_delivery_date(),
        delivery_window: shared::order::DeliveryWindow::Morning,
        notes: None,
    };

    match cart.submit_checkout(&draft).await {
        Ok(outcome) => tracing::info!("Order outcome: {}", outcome.message()),
        Err(e) => tracing::error!("Checkout refused locally: {}", e),
    }

    let newsletter = tracking
        .subscribe_newsletter("demo@example.com", NewsletterSource::WebsiteFooter)
        .await;
    tracing::info!("Newsletter: {}", newsletter.message());

    // 给后台 worker 一点时间把队列里的事件送完
    tokio::time::sleep(std::time::Duration::from_millis(500)).await;
    Ok(())
}
