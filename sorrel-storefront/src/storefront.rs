//! Storefront composition root
//!
//! Wires the local store, the CRM client, the tracking pipeline, and
//! the two context handles together. Hosts construct exactly one
//! `Storefront` and hand its contexts to their UI layer.

use std::path::Path;

use shared::menu::MenuItem;
use sorrel_client::HttpClient;

use crate::cart::CartService;
use crate::config::Config;
use crate::context::{CartContext, TrackingContext};
use crate::store::{LocalStore, StoreResult};
use crate::tracking::{SessionCache, TrackingService, TrackingWorker};

const STORE_FILE_NAME: &str = "sorrel.redb";

/// The assembled storefront SDK.
pub struct Storefront {
    config: Config,
    http: HttpClient,
    cart: CartContext,
    tracking: TrackingContext,
}

impl Storefront {
    /// Open the storefront with durable local state under
    /// `config.data_dir`.
    ///
    /// Must be called from within a Tokio runtime: the tracking
    /// dispatch worker is spawned onto it.
    pub fn open(config: Config) -> StoreResult<Self> {
        std::fs::create_dir_all(&config.data_dir)?;
        let store = LocalStore::open(Path::new(&config.data_dir).join(STORE_FILE_NAME))?;
        Self::assemble(config, store)
    }

    /// Open with an ephemeral in-memory store.
    ///
    /// Cart and visitor id last only for the process lifetime. Used in
    /// tests and in render-only environments that must not touch disk.
    pub fn open_in_memory(config: Config) -> StoreResult<Self> {
        let store = LocalStore::open_in_memory()?;
        Self::assemble(config, store)
    }

    fn assemble(config: Config, store: LocalStore) -> StoreResult<Self> {
        let http = config.client_config().build_http_client();
        let visitor_id = store.visitor_id()?;
        tracing::info!(visitor_id = %visitor_id, "Storefront opened");

        let session = SessionCache::default();
        let (tracking_service, rx) = TrackingService::new(
            http.clone(),
            visitor_id,
            session.clone(),
            config.tracking_queue,
        );
        let worker = TrackingWorker::new(http.clone(), session);
        tokio::spawn(async move {
            worker.run(rx).await;
        });

        let cart = CartContext::new(
            CartService::new(store),
            http.clone(),
            tracking_service.clone(),
        );
        let tracking = TrackingContext::new(tracking_service);

        Ok(Self {
            config,
            http,
            cart,
            tracking,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Cart scope handle.
    pub fn cart(&self) -> &CartContext {
        &self.cart
    }

    /// Tracking scope handle.
    pub fn tracking(&self) -> &TrackingContext {
        &self.tracking
    }

    /// Fetch the published menu.
    ///
    /// Degrades to an empty list on any failure so a dead CRM renders
    /// as an empty menu, never as a broken page.
    pub async fn load_menu(&self) -> Vec<MenuItem> {
        match self.http.fetch_menu().await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(error = %e, "Menu fetch failed, serving empty menu");
                Vec::new()
            }
        }
    }
}
