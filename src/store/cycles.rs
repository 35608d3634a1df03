use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::StoreError;
use crate::latency::{Latency, Op};
use crate::models::{Cycle, CycleUpdate, NewCycle, MAX_RECORDED_CYCLE_DAYS};

const KIND: &str = "Cycle";

#[derive(Clone)]
pub struct CycleStore {
    data: Arc<RwLock<Vec<Cycle>>>,
    clock: Arc<dyn Clock>,
    latency: Latency,
}

impl CycleStore {
    pub fn new(clock: Arc<dyn Clock>, latency: Latency) -> Self {
        Self {
            data: Arc::new(RwLock::new(Vec::new())),
            clock,
            latency,
        }
    }

    /// Store pre-filled with seed cycles, each checked like a created one.
    pub fn with_cycles(
        cycles: Vec<Cycle>,
        clock: Arc<dyn Clock>,
        latency: Latency,
    ) -> Result<Self, StoreError> {
        for cycle in &cycles {
            validate(cycle)?;
        }
        Ok(Self {
            data: Arc::new(RwLock::new(cycles)),
            clock,
            latency,
        })
    }

    pub async fn get_all(&self) -> Vec<Cycle> {
        self.latency.wait(Op::FetchAll).await;
        self.data.read().await.clone()
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Cycle, StoreError> {
        self.latency.wait(Op::FetchOne).await;
        self.data
            .read()
            .await
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(StoreError::NotFound { kind: KIND, id })
    }

    /// The first cycle whose range contains today, if any.
    pub async fn get_current(&self) -> Option<Cycle> {
        self.latency.wait(Op::FetchOne).await;
        let today = self.clock.today();
        self.data
            .read()
            .await
            .iter()
            .find(|c| c.contains(today))
            .cloned()
    }

    /// The `count` most recent cycles by start date, newest first.
    pub async fn get_recent(&self, count: usize) -> Vec<Cycle> {
        self.latency.wait(Op::FetchRecent).await;
        let mut cycles = self.data.read().await.clone();
        cycles.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        cycles.truncate(count);
        cycles
    }

    pub async fn create(&self, new: NewCycle) -> Result<Cycle, StoreError> {
        self.latency.wait(Op::Create).await;
        let cycle = Cycle {
            id: Uuid::now_v7(),
            start_date: new.start_date,
            end_date: new.end_date,
            length: new.length,
        };
        validate(&cycle)?;

        self.data.write().await.push(cycle.clone());
        tracing::info!(id = %cycle.id, start = %cycle.start_date, "cycle created");
        Ok(cycle)
    }

    pub async fn update(&self, id: Uuid, update: CycleUpdate) -> Result<Cycle, StoreError> {
        self.latency.wait(Op::Update).await;
        let mut data = self.data.write().await;
        let cycle = data
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(StoreError::NotFound { kind: KIND, id })?;

        let mut updated = cycle.clone();
        updated.apply(update);
        validate(&updated)?;
        *cycle = updated.clone();

        tracing::info!(%id, "cycle updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.latency.wait(Op::Delete).await;
        let mut data = self.data.write().await;
        let index = data
            .iter()
            .position(|c| c.id == id)
            .ok_or(StoreError::NotFound { kind: KIND, id })?;
        data.remove(index);
        tracing::info!(%id, "cycle deleted");
        Ok(())
    }
}

fn validate(cycle: &Cycle) -> Result<(), StoreError> {
    if !(1..=MAX_RECORDED_CYCLE_DAYS).contains(&cycle.length) {
        return Err(StoreError::Invalid(format!(
            "cycle length must be between 1 and {MAX_RECORDED_CYCLE_DAYS} days"
        )));
    }
    if cycle.end_date.is_some_and(|end| end < cycle.start_date) {
        return Err(StoreError::Invalid("cycle cannot end before it starts".into()));
    }
    Ok(())
}
