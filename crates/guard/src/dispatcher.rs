//! One task per item, probes gated by a semaphore

use crate::{ConcurrencyBudget, VerificationProbe};
use pga_config::resources_semaphore::{acquire_semaphore_permit, create_semaphore};
use pga_store::Layout;
use pga_types::{ItemId, Outcome, Verdict};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

/// Spawns verification tasks for a run
#[derive(Clone)]
pub struct Dispatcher {
    budget: ConcurrencyBudget,
    layout: Layout,
    probe: Arc<dyn VerificationProbe>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("budget", &self.budget)
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

/// A dispatched run: the outcome receiver and the tasks feeding it
#[derive(Debug)]
pub struct Dispatch {
    pub(crate) total: usize,
    pub(crate) outcomes: mpsc::Receiver<Outcome>,
    pub(crate) tasks: JoinSet<()>,
}

impl Dispatch {
    /// Number of outcomes the run will produce
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }
}

impl Dispatcher {
    #[must_use]
    pub fn new(budget: ConcurrencyBudget, layout: Layout, probe: Arc<dyn VerificationProbe>) -> Self {
        Self {
            budget,
            layout,
            probe,
        }
    }

    #[must_use]
    pub fn budget(&self) -> ConcurrencyBudget {
        self.budget
    }

    /// Spawn one task per item.
    ///
    /// Task creation is not gated; each task waits for a permit before
    /// probing and returns it before sending its outcome, so a task parked on
    /// a full channel never holds a permit. Must be called within a tokio
    /// runtime.
    #[must_use]
    pub fn dispatch(&self, items: Vec<ItemId>) -> Dispatch {
        let total = items.len();
        let semaphore = create_semaphore(self.budget.get());
        let (tx, outcomes) = mpsc::channel(self.budget.get());
        let mut tasks = JoinSet::new();

        for item in items {
            let path = self.layout.resolve(&item);
            let probe = Arc::clone(&self.probe);
            let semaphore = Arc::clone(&semaphore);
            let tx = tx.clone();

            tasks.spawn(async move {
                let verdict = match acquire_semaphore_permit(semaphore, "verification").await {
                    Ok(_permit) => probe.probe(&path).await,
                    Err(e) => Verdict::Unreachable {
                        reason: e.to_string(),
                    },
                };

                let outcome = Outcome::new(item, path.as_str(), verdict);
                // The collector only goes away when the run is abandoned
                let _ = tx.send(outcome).await;
            });
        }

        Dispatch {
            total,
            outcomes,
            tasks,
        }
    }
}
