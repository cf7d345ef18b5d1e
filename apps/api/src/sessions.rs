//! In-memory session registry and idle eviction.
//!
//! Each configurator session lives in a [`SessionSlot`]: the pure controller
//! plus the per-field debouncers that drive its deferred dimension commits,
//! all behind one async mutex so a debounced commit and a direct request
//! never interleave. The registry itself is a shared map guarded by an
//! `RwLock`; lookups clone the slot `Arc` and drop the map lock before
//! touching the slot.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

use crate::configurator::debounce::Debouncer;
use crate::configurator::session::ConfiguratorSession;

/// Mutable per-session payload behind the slot lock.
pub struct SessionInner {
    pub state: ConfiguratorSession,
    pub width_debounce: Debouncer,
    pub height_debounce: Debouncer,
    last_activity: DateTime<Utc>,
}

impl SessionInner {
    /// Marks the session as just used. Every handler that locks the slot
    /// calls this first so the idle sweeper sees live sessions as live.
    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }
}

pub struct SessionSlot {
    pub inner: Mutex<SessionInner>,
}

/// Shared registry of all live configurator sessions.
#[derive(Clone)]
pub struct SessionStore {
    slots: Arc<RwLock<HashMap<Uuid, Arc<SessionSlot>>>>,
    debounce_window: Duration,
}

impl SessionStore {
    pub fn new(debounce_window: Duration) -> Self {
        Self {
            slots: Arc::new(RwLock::new(HashMap::new())),
            debounce_window,
        }
    }

    /// Creates a fresh session and registers it.
    pub async fn create(&self) -> Arc<SessionSlot> {
        let state = ConfiguratorSession::new();
        let id = state.id;
        let slot = Arc::new(SessionSlot {
            inner: Mutex::new(SessionInner {
                state,
                width_debounce: Debouncer::new(self.debounce_window),
                height_debounce: Debouncer::new(self.debounce_window),
                last_activity: Utc::now(),
            }),
        });
        self.slots.write().await.insert(id, Arc::clone(&slot));
        info!("configurator session {id} created");
        slot
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<SessionSlot>> {
        self.slots.read().await.get(&id).cloned()
    }

    /// Unregisters a session and disarms its debouncers, so no commit fires
    /// into discarded state. Returns false for an unknown id.
    pub async fn remove(&self, id: Uuid) -> bool {
        let slot = self.slots.write().await.remove(&id);
        match slot {
            Some(slot) => {
                Self::disarm(&slot).await;
                info!("configurator session {id} ended");
                true
            }
            None => false,
        }
    }

    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }

    /// Evicts sessions idle for longer than `idle_after`. A slot whose lock
    /// is held is mid-request and therefore not idle. Returns the eviction
    /// count.
    pub async fn sweep_idle(&self, idle_after: chrono::Duration) -> usize {
        let cutoff = Utc::now() - idle_after;
        let evicted: Vec<(Uuid, Arc<SessionSlot>)> = {
            let mut slots = self.slots.write().await;
            let stale_ids: Vec<Uuid> = slots
                .iter()
                .filter_map(|(id, slot)| match slot.inner.try_lock() {
                    Ok(inner) if inner.last_activity <= cutoff => Some(*id),
                    _ => None,
                })
                .collect();
            stale_ids
                .into_iter()
                .filter_map(|id| slots.remove(&id).map(|slot| (id, slot)))
                .collect()
        };
        for (id, slot) in &evicted {
            Self::disarm(slot).await;
            debug!("evicted idle configurator session {id}");
        }
        evicted.len()
    }

    async fn disarm(slot: &SessionSlot) {
        let mut inner = slot.inner.lock().await;
        inner.width_debounce.cancel();
        inner.height_debounce.cancel();
    }
}

/// Spawns the periodic sweep that evicts idle sessions.
pub fn spawn_idle_sweeper(
    store: SessionStore,
    every: Duration,
    idle_after: chrono::Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let evicted = store.sweep_idle(idle_after).await;
            if evicted > 0 {
                let live = store.len().await;
                debug!("idle sweep evicted {evicted} configurator sessions, {live} live");
            }
        }
    })
}
