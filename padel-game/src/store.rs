//! Game state store: owns the live [`GameState`], serializes every transition
//! behind one lock, and drives the passive-income and autosave timers.
//!
//! Lifecycle: [`GameStore::new`] (loading) → [`GameStore::load`] (ready, timers
//! running) → [`GameStore::shutdown`] (closed, timers stopped, final save).
//! Click and buy are refused until the store is ready.
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::sync::{Mutex as AsyncMutex, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

use crate::GameStorage;
use crate::catalog::Catalog;
use crate::config::{ConfigError, StoreConfig};
use crate::save;
use crate::state::{GameState, Purchase, PurchaseError};
use crate::view::Snapshot;

/// Lifecycle phase, published through [`GameStore::ready_signal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
    Closed,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("game is still loading")]
    NotReady,
    #[error("game store is shut down")]
    Closed,
    #[error(transparent)]
    Purchase(#[from] PurchaseError),
    #[error("save failed: {0}")]
    Save(#[source] Box<dyn std::error::Error + Send + Sync>),
}

struct Shared<S> {
    config: StoreConfig,
    catalog: Catalog,
    storage: S,
    state: Mutex<GameState>,
    phase: watch::Sender<Phase>,
    /// Mirrors `auto_click_power > 0`; arms the passive-income timer.
    passive: watch::Sender<bool>,
    /// Held from snapshot to write so slot writes land in snapshot order.
    save_turn: AsyncMutex<()>,
}

impl<S> Shared<S> {
    fn state(&self) -> MutexGuard<'_, GameState> {
        lock(&self.state)
    }

    fn apply_tick(&self) {
        let earned = self.state().tick();
        if earned > 0.0 {
            debug!("passive income +{earned}");
        }
    }
}

/// Owner of one game's live state.
pub struct GameStore<S> {
    shared: Arc<Shared<S>>,
    load_started: AtomicBool,
    timers: Mutex<Vec<JoinHandle<()>>>,
}

impl<S> GameStore<S>
where
    S: GameStorage + Send + Sync + 'static,
{
    /// Create a store in the loading phase.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails validation.
    pub fn new(storage: S, catalog: Catalog, config: StoreConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(storage, catalog, config))
    }

    /// Store over the shipped catalog with default timing.
    pub fn with_defaults(storage: S) -> Self {
        Self::build(storage, Catalog::standard().clone(), StoreConfig::default())
    }

    fn build(storage: S, catalog: Catalog, config: StoreConfig) -> Self {
        let state = GameState::new(&catalog);
        let (phase, _) = watch::channel(Phase::Loading);
        let (passive, _) = watch::channel(false);
        Self {
            shared: Arc::new(Shared {
                config,
                catalog,
                storage,
                state: Mutex::new(state),
                phase,
                passive,
                save_turn: AsyncMutex::new(()),
            }),
            load_started: AtomicBool::new(false),
            timers: Mutex::new(Vec::new()),
        }
    }

    /// Restore the saved game, mark the store ready and start both timers.
    ///
    /// Only the first call does anything. A store shut down while loading
    /// stays closed.
    pub async fn load(&self) {
        if self.load_started.swap(true, Ordering::SeqCst) {
            return;
        }

        let shared = Arc::clone(&self.shared);
        let loaded = tokio::task::spawn_blocking(move || {
            save::load(&shared.storage, &shared.config.save_key, &shared.catalog)
        })
        .await;
        let state = loaded.unwrap_or_else(|err| {
            warn!("load task failed, starting a new game: {err}");
            GameState::new(&self.shared.catalog)
        });

        {
            let mut current = self.shared.state();
            self.shared.passive.send_replace(state.earns_passively());
            *current = state;
        }

        let became_ready = self.shared.phase.send_if_modified(|phase| {
            if *phase == Phase::Loading {
                *phase = Phase::Ready;
                true
            } else {
                false
            }
        });
        if !became_ready {
            return;
        }

        let mut timers = lock(&self.timers);
        timers.push(tokio::spawn(run_passive_income(Arc::clone(&self.shared))));
        timers.push(tokio::spawn(run_autosave(Arc::clone(&self.shared))));
        info!(
            "game store ready ({} points per click)",
            self.shared.state().points_per_click()
        );
    }

    /// Register a tap, returning the points it earned.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotReady`] or [`StoreError::Closed`] outside the ready phase.
    pub fn on_click(&self) -> Result<f64, StoreError> {
        self.ensure_ready()?;
        Ok(self.shared.state().click())
    }

    /// Attempt to buy the next level of `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Purchase`] with the rejection reason, or a
    /// lifecycle error outside the ready phase.
    pub fn on_buy(&self, id: &str) -> Result<Purchase, StoreError> {
        self.ensure_ready()?;
        let mut state = self.shared.state();
        match state.buy(id) {
            Ok(purchase) => {
                let earns = state.earns_passively();
                self.shared.passive.send_if_modified(|armed| {
                    let changed = *armed != earns;
                    *armed = earns;
                    changed
                });
                debug!(
                    "bought `{}` level {} for {}",
                    purchase.id, purchase.level, purchase.cost
                );
                Ok(purchase)
            }
            Err(err) => {
                debug!("purchase rejected: {err}");
                Err(err.into())
            }
        }
    }

    /// Write the current state now, outside the autosave schedule.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Save`] if the write failed, or a lifecycle error
    /// outside the ready phase.
    pub async fn save_now(&self) -> Result<(), StoreError> {
        self.ensure_ready()?;
        persist(Arc::clone(&self.shared)).await
    }

    /// Close the store: stop both timers, wait for them, then save once more.
    ///
    /// The final save queues behind any save already in flight, so it is the
    /// last write to reach the slot.
    pub async fn shutdown(&self) {
        let previous = self.shared.phase.send_replace(Phase::Closed);
        let timers = std::mem::take(&mut *lock(&self.timers));
        for timer in timers {
            if let Err(err) = timer.await {
                warn!("store timer ended abnormally: {err}");
            }
        }
        if previous == Phase::Ready {
            if let Err(err) = persist(Arc::clone(&self.shared)).await {
                warn!("final save failed: {err}");
            }
            info!("game store shut down");
        }
    }
}

impl<S> GameStore<S> {
    #[must_use]
    pub fn phase(&self) -> Phase {
        *self.shared.phase.borrow()
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.phase() == Phase::Ready
    }

    /// Receiver that observes every phase change.
    #[must_use]
    pub fn ready_signal(&self) -> watch::Receiver<Phase> {
        self.shared.phase.subscribe()
    }

    /// Wait until loading finishes. Returns `false` if the store closed instead.
    pub async fn wait_ready(&self) -> bool {
        let mut signal = self.ready_signal();
        signal
            .wait_for(|phase| *phase != Phase::Loading)
            .await
            .is_ok_and(|phase| *phase == Phase::Ready)
    }

    #[must_use]
    pub fn points_per_click(&self) -> f64 {
        self.shared.state().points_per_click()
    }

    #[must_use]
    pub fn points_per_second(&self) -> f64 {
        self.shared.state().points_per_second()
    }

    /// Render view of the current state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::of(&self.shared.state())
    }

    /// Copy of the current state.
    #[must_use]
    pub fn state(&self) -> GameState {
        self.shared.state().clone()
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.shared.catalog
    }

    fn ensure_ready(&self) -> Result<(), StoreError> {
        match self.phase() {
            Phase::Ready => Ok(()),
            Phase::Loading => Err(StoreError::NotReady),
            Phase::Closed => Err(StoreError::Closed),
        }
    }
}

impl<S> Drop for GameStore<S> {
    fn drop(&mut self) {
        self.shared.phase.send_replace(Phase::Closed);
        for timer in lock(&self.timers).drain(..) {
            timer.abort();
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn closed(phase: &mut watch::Receiver<Phase>) {
    let _ = phase.wait_for(|phase| *phase == Phase::Closed).await;
}

async fn persist<S>(shared: Arc<Shared<S>>) -> Result<(), StoreError>
where
    S: GameStorage + Send + Sync + 'static,
{
    let _turn = shared.save_turn.lock().await;
    let snapshot = shared.state().clone();
    let writer = Arc::clone(&shared);
    let written = tokio::task::spawn_blocking(move || {
        save::save(&writer.storage, &writer.config.save_key, &snapshot)
            .map_err(|err| StoreError::Save(Box::new(err)))
    })
    .await;
    written.unwrap_or_else(|err| Err(StoreError::Save(Box::new(err))))
}

async fn run_passive_income<S>(shared: Arc<Shared<S>>)
where
    S: GameStorage + Send + Sync + 'static,
{
    let mut phase = shared.phase.subscribe();
    let mut passive = shared.passive.subscribe();
    let period = shared.config.tick_period();
    loop {
        if !*passive.borrow_and_update() {
            tokio::select! {
                changed = passive.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
                () = closed(&mut phase) => return,
            }
            continue;
        }

        debug!("passive income armed");
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = ticker.tick() => shared.apply_tick(),
                changed = passive.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    if !*passive.borrow_and_update() {
                        debug!("passive income idle");
                        break;
                    }
                }
                () = closed(&mut phase) => return,
            }
        }
    }
}

async fn run_autosave<S>(shared: Arc<Shared<S>>)
where
    S: GameStorage + Send + Sync + 'static,
{
    let mut phase = shared.phase.subscribe();
    let period = shared.config.save_period();
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(err) = persist(Arc::clone(&shared)).await {
                    warn!("autosave failed: {err}");
                }
            }
            () = closed(&mut phase) => return,
        }
    }
}
