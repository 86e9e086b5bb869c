//! redb-based local store for cart state and visitor identity
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `cart` | `"cart"` | JSON-serialized `Cart` | The persisted cart blob |
//! | `identity` | `"visitor_id"` | UUID string | Durable visitor id |
//!
//! # Durability
//!
//! redb uses `Durability::Immediate` by default: once `commit()`
//! returns, the cart survives process restarts and power loss. Reads
//! degrade instead of failing: an unreadable or malformed cart record
//! loads as an empty cart so a corrupt store can never wedge the UI.

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use shared::cart::Cart;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Cart table: single JSON blob under `CART_KEY`
const CART_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("cart");

/// Identity table: visitor id under `VISITOR_ID_KEY`
const IDENTITY_TABLE: TableDefinition<&str, &str> = TableDefinition::new("identity");

const CART_KEY: &str = "cart";
const VISITOR_ID_KEY: &str = "visitor_id";

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Local persistence backed by redb
#[derive(Clone)]
pub struct LocalStore {
    db: Arc<Database>,
}

impl LocalStore {
    /// Open or create the database at the given path.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an ephemeral in-memory store.
    ///
    /// Used where nothing should outlive the process: tests, and
    /// render-only environments that must not touch disk. All
    /// operations behave identically, the data is simply gone on drop.
    pub fn open_in_memory() -> StoreResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StoreResult<Self> {
        // Create tables up front so readers never race table creation
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(CART_TABLE)?;
            let _ = write_txn.open_table(IDENTITY_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    // ========== Cart Operations ==========

    /// Load the persisted cart.
    ///
    /// Never fails: a missing record, an unreadable store, or a
    /// malformed JSON blob all load as the empty cart (logged at debug
    /// level).
    pub fn load_cart(&self) -> Cart {
        match self.try_load_cart() {
            Ok(Some(cart)) => cart,
            Ok(None) => Cart::empty(),
            Err(e) => {
                tracing::debug!(error = %e, "stored cart unreadable, starting empty");
                Cart::empty()
            }
        }
    }

    fn try_load_cart(&self) -> StoreResult<Option<Cart>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CART_TABLE)?;

        match table.get(CART_KEY)? {
            Some(value) => {
                let cart: Cart = serde_json::from_slice(value.value())?;
                Ok(Some(cart))
            }
            None => Ok(None),
        }
    }

    /// Persist the cart, replacing whatever was stored before.
    pub fn save_cart(&self, cart: &Cart) -> StoreResult<()> {
        let value = serde_json::to_vec(cart)?;
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(CART_TABLE)?;
            table.insert(CART_KEY, value.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Remove the persisted cart. Clearing an absent cart is fine.
    pub fn clear_cart(&self) -> StoreResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(CART_TABLE)?;
            table.remove(CART_KEY)?;
        }
        txn.commit()?;
        Ok(())
    }

    // ========== Visitor Identity ==========

    /// Return the durable visitor id, minting one on first access.
    ///
    /// The mint re-checks under the write lock, so concurrent first
    /// accesses agree on a single id (first writer wins).
    pub fn visitor_id(&self) -> StoreResult<String> {
        {
            let read_txn = self.db.begin_read()?;
            let table = read_txn.open_table(IDENTITY_TABLE)?;
            if let Some(guard) = table.get(VISITOR_ID_KEY)? {
                return Ok(guard.value().to_string());
            }
        }

        let txn = self.db.begin_write()?;
        let mut table = txn.open_table(IDENTITY_TABLE)?;
        let existing = table.get(VISITOR_ID_KEY)?.map(|g| g.value().to_string());

        let id = match existing {
            Some(id) => id,
            None => {
                let id = uuid::Uuid::new_v4().to_string();
                table.insert(VISITOR_ID_KEY, id.as_str())?;
                id
            }
        };
        drop(table);
        txn.commit()?;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::cart::SelectedPlan;
    use shared::menu::MenuItem;

    fn menu_item(id: &str, price: f64) -> MenuItem {
        MenuItem {
            id: id.to_string(),
            name: format!("Item {id}"),
            description: None,
            category: "bowls".to_string(),
            price,
            dietary_tags: vec![],
            image_url: None,
        }
    }

    #[test]
    fn test_load_cart_without_record_is_empty() {
        let store = LocalStore::open_in_memory().unwrap();
        assert_eq!(store.load_cart(), Cart::empty());
    }

    #[test]
    fn test_cart_round_trip() {
        let store = LocalStore::open_in_memory().unwrap();

        let mut cart = Cart::empty();
        cart.add_item(&menu_item("m1", 12.5), 2);
        cart.set_plan(SelectedPlan {
            name: "Weekly 5".to_string(),
            price: 49.0,
            meals: 5,
        });

        store.save_cart(&cart).unwrap();
        assert_eq!(store.load_cart(), cart);
    }

    #[test]
    fn test_save_replaces_previous_cart() {
        let store = LocalStore::open_in_memory().unwrap();

        let mut first = Cart::empty();
        first.add_item(&menu_item("m1", 10.0), 1);
        store.save_cart(&first).unwrap();

        let mut second = Cart::empty();
        second.add_item(&menu_item("m2", 11.0), 3);
        store.save_cart(&second).unwrap();

        assert_eq!(store.load_cart(), second);
    }

    #[test]
    fn test_clear_cart() {
        let store = LocalStore::open_in_memory().unwrap();

        let mut cart = Cart::empty();
        cart.add_item(&menu_item("m1", 10.0), 1);
        store.save_cart(&cart).unwrap();

        store.clear_cart().unwrap();
        assert_eq!(store.load_cart(), Cart::empty());

        // Clearing again is a no-op, not an error
        store.clear_cart().unwrap();
    }

    #[test]
    fn test_malformed_cart_record_loads_empty() {
        let store = LocalStore::open_in_memory().unwrap();

        let txn = store.db.begin_write().unwrap();
        {
            let mut table = txn.open_table(CART_TABLE).unwrap();
            table.insert(CART_KEY, b"{definitely not json".as_slice()).unwrap();
        }
        txn.commit().unwrap();

        assert_eq!(store.load_cart(), Cart::empty());
    }

    #[test]
    fn test_visitor_id_is_minted_once() {
        let store = LocalStore::open_in_memory().unwrap();

        let first = store.visitor_id().unwrap();
        let second = store.visitor_id().unwrap();

        assert_eq!(first, second);
        assert!(uuid::Uuid::parse_str(&first).is_ok());
    }

    #[test]
    fn test_visitor_id_survives_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("storefront.redb");

        let first = {
            let store = LocalStore::open(&path).unwrap();
            store.visitor_id().unwrap()
        };

        let store = LocalStore::open(&path).unwrap();
        assert_eq!(store.visitor_id().unwrap(), first);
    }

    #[test]
    fn test_in_memory_stores_mint_distinct_ids() {
        let a = LocalStore::open_in_memory().unwrap();
        let b = LocalStore::open_in_memory().unwrap();
        assert_ne!(a.visitor_id().unwrap(), b.visitor_id().unwrap());
    }

    #[test]
    fn test_cart_survives_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("storefront.redb");

        let mut cart = Cart::empty();
        cart.add_item(&menu_item("m1", 12.5), 2);

        {
            let store = LocalStore::open(&path).unwrap();
            store.save_cart(&cart).unwrap();
        }

        let store = LocalStore::open(&path).unwrap();
        assert_eq!(store.load_cart(), cart);
    }
}
