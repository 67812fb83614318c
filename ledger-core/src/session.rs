//! Wallet session
//!
//! The "wallet connected" flag and its address, owned by an explicit
//! [`WalletSession`] that is shared by reference. Every change is written to
//! a [`SessionStore`] and pushed to registered [`WalletObserver`]s; readers
//! that prefer polling call [`WalletSession::state`].
//!
//! Store failures never block a change: they are logged and the in-memory
//! state and observers are updated regardless.
//!
//! Changes are serialized: a change holds the session's transition lock
//! while it updates the state, saves it and notifies observers, so saves and
//! notifications happen in the same order as the state changes. Observers
//! must not change the session from inside [`WalletObserver::on_wallet_change`].

use crate::Result;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Address reported for a simulated wallet
pub const DEFAULT_WALLET_ADDRESS: &str = "0x1234...5678";

/// Connection flag plus opaque address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletState {
    connected: bool,
    address: Option<String>,
}

impl WalletState {
    /// Connected with the given address
    pub fn connected(address: impl Into<String>) -> Self {
        Self {
            connected: true,
            address: Some(address.into()),
        }
    }

    /// Disconnected, no address
    pub fn disconnected() -> Self {
        Self::default()
    }

    /// Connection flag
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Address while connected
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }
}

/// Receives every wallet state change
pub trait WalletObserver: Send + Sync {
    /// Called after the state changed
    fn on_wallet_change(&self, state: &WalletState);
}

/// Persistence for the wallet flag
pub trait SessionStore: Send + Sync {
    /// Load the last saved state, `None` if nothing was saved
    fn load(&self) -> Result<Option<WalletState>>;

    /// Save the current state
    fn save(&self, state: &WalletState) -> Result<()>;
}

/// In-process store, lost on exit
#[derive(Debug, Default)]
pub struct MemoryStore {
    saved: Mutex<Option<WalletState>>,
}

impl MemoryStore {
    /// Create empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Result<Option<WalletState>> {
        Ok(self.saved.lock().clone())
    }

    fn save(&self, state: &WalletState) -> Result<()> {
        *self.saved.lock() = Some(state.clone());
        Ok(())
    }
}

/// On-disk record, keyed like the browser storage entries
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredWallet {
    wallet_connected: bool,
    #[serde(default)]
    wallet_address: String,
}

/// JSON file store
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store backed by `path`
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileStore {
    fn load(&self) -> Result<Option<WalletState>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)?;
        let stored: StoredWallet = serde_json::from_str(&content)?;

        Ok(Some(WalletState {
            connected: stored.wallet_connected,
            address: Some(stored.wallet_address).filter(|a| !a.is_empty()),
        }))
    }

    fn save(&self, state: &WalletState) -> Result<()> {
        let stored = StoredWallet {
            wallet_connected: state.connected,
            wallet_address: state.address.clone().unwrap_or_default(),
        };
        std::fs::write(&self.path, serde_json::to_string_pretty(&stored)?)?;
        Ok(())
    }
}

/// Shared wallet session
pub struct WalletSession {
    state: RwLock<WalletState>,
    transition: Mutex<()>,
    observers: RwLock<Vec<Arc<dyn WalletObserver>>>,
    store: Arc<dyn SessionStore>,
    default_address: String,
}

impl std::fmt::Debug for WalletSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletSession")
            .field("state", &*self.state.read())
            .field("observers", &self.observers.read().len())
            .field("default_address", &self.default_address)
            .finish()
    }
}

impl WalletSession {
    /// Open a session, restoring the last saved state from `store`
    pub fn open(store: Arc<dyn SessionStore>, default_address: impl Into<String>) -> Self {
        let default_address = default_address.into();

        let restored = match store.load() {
            Ok(Some(saved)) if saved.connected => {
                let address = saved
                    .address
                    .filter(|a| !a.is_empty())
                    .unwrap_or_else(|| default_address.clone());
                WalletState::connected(address)
            }
            Ok(_) => WalletState::disconnected(),
            Err(e) => {
                warn!("Failed to restore wallet session: {}", e);
                WalletState::disconnected()
            }
        };

        Self {
            state: RwLock::new(restored),
            transition: Mutex::new(()),
            observers: RwLock::new(Vec::new()),
            store,
            default_address,
        }
    }

    /// Session backed by a [`MemoryStore`]
    pub fn in_memory() -> Self {
        Self::open(Arc::new(MemoryStore::new()), DEFAULT_WALLET_ADDRESS)
    }

    /// Current state (copy)
    pub fn state(&self) -> WalletState {
        self.state.read().clone()
    }

    /// Connection flag
    pub fn is_connected(&self) -> bool {
        self.state.read().connected
    }

    /// Register an observer for future changes
    pub fn subscribe(&self, observer: Arc<dyn WalletObserver>) {
        self.observers.write().push(observer);
    }

    /// Connect with the default address
    pub fn connect(&self) -> WalletState {
        self.transition(|_| true)
    }

    /// Disconnect
    pub fn disconnect(&self) -> WalletState {
        self.transition(|_| false)
    }

    /// Flip the connection flag
    pub fn toggle(&self) -> WalletState {
        self.transition(|connected| !connected)
    }

    /// Apply one change under the transition lock
    fn transition(&self, connect: impl FnOnce(bool) -> bool) -> WalletState {
        let _guard = self.transition.lock();

        let next = if connect(self.state.read().connected) {
            WalletState::connected(self.default_address.clone())
        } else {
            WalletState::disconnected()
        };
        *self.state.write() = next.clone();

        if let Err(e) = self.store.save(&next) {
            warn!("Failed to persist wallet session: {}", e);
        }

        info!(
            connected = next.connected,
            address = next.address().unwrap_or(""),
            "Wallet connection changed"
        );

        // Clone the list so observers may subscribe re-entrantly
        let observers = self.observers.read().clone();
        for observer in observers {
            observer.on_wallet_change(&next);
        }

        next
    }
}
