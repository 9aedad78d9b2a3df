use std::sync::Arc;

use crate::{
    core::{config::SchedulerConfig, scheduler::RedialScheduler, state::Shared},
    events::Bus,
    gateway::GatewayRef,
    store::{MemoryStore, PolicyStore, load_or_default},
    subscribers::{Subscribe, SubscriberSet},
};

/// Builder for constructing a [`RedialScheduler`].
pub struct SchedulerBuilder {
    cfg: SchedulerConfig,
    gateway: GatewayRef,
    store: Option<Arc<dyn PolicyStore>>,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl SchedulerBuilder {
    /// Creates a builder with default configuration and an in-memory policy store.
    pub fn new(gateway: GatewayRef) -> Self {
        Self {
            cfg: SchedulerConfig::default(),
            gateway,
            store: None,
            subscribers: Vec::new(),
        }
    }

    /// Sets the runtime configuration.
    pub fn with_config(mut self, cfg: SchedulerConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Sets where the retry policy is loaded from and written to.
    pub fn with_store(mut self, store: Arc<dyn PolicyStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Sets event subscribers.
    ///
    /// Each subscriber gets a dedicated worker with a bounded queue.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Loads the policy and wires the runtime together.
    ///
    /// Must be called inside a tokio runtime (spawns the subscriber workers).
    /// The scheduler starts `Idle`; call [`RedialScheduler::start`] to dial.
    pub fn build(self) -> Arc<RedialScheduler> {
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new()) as Arc<dyn PolicyStore>);
        let policy = load_or_default(store.as_ref());

        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let subs = SubscriberSet::new(self.subscribers, bus.clone());
        let shared = Arc::new(Shared::new(self.cfg, bus, self.gateway, store, policy));

        Arc::new(RedialScheduler::new_internal(shared, subs))
    }
}
