use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tracing::info;

use common::RegionCode;

use crate::client::{PipelineClient, PipelineOutcome};
use crate::machine::SelectionStateMachine;

/// Wires the pure state machine to a pipeline client and the runtime timer.
/// One selection can be in flight at a time; the machine ignores everything
/// else until the cooldown after completion has elapsed.
pub struct SelectionDriver<C> {
    machine: Arc<Mutex<SelectionStateMachine>>,
    client: Arc<C>,
    cooldown: Duration,
}

impl<C> Clone for SelectionDriver<C> {
    fn clone(&self) -> Self {
        Self {
            machine: Arc::clone(&self.machine),
            client: Arc::clone(&self.client),
            cooldown: self.cooldown,
        }
    }
}

impl<C: PipelineClient + 'static> SelectionDriver<C> {
    pub fn new(client: C, cooldown: Duration) -> Self {
        Self {
            machine: Arc::new(Mutex::new(SelectionStateMachine::new())),
            client: Arc::new(client),
            cooldown,
        }
    }

    fn lock_machine(&self) -> MutexGuard<'_, SelectionStateMachine> {
        self.machine.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_locked(&self) -> bool {
        self.lock_machine().locked()
    }

    pub fn selected(&self) -> Option<RegionCode> {
        self.lock_machine().selected().cloned()
    }

    /// Handle a selection event. Returns `None` when the machine is locked
    /// and the event was dropped; otherwise runs the pipeline to completion
    /// and returns its outcome. The lock is released by a timer `cooldown`
    /// after completion, not here.
    pub async fn select(
        &self,
        region: RegionCode,
        location_name: &str,
    ) -> Option<PipelineOutcome> {
        {
            let mut machine = self.lock_machine();
            if !machine.select(region.clone()) {
                info!("Selection of {} ignored while locked", region);
                return None;
            }
        }

        let outcome = self.client.run_pipeline(&region, location_name).await;
        self.lock_machine().pipeline_completed();

        let machine = Arc::clone(&self.machine);
        let cooldown = self.cooldown;
        tokio::spawn(async move {
            tokio::time::sleep(cooldown).await;
            machine
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .cooldown_elapsed();
        });

        Some(outcome)
    }
}
