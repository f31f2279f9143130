//! DeliveryWorker processor.
//!
//! The DeliveryWorker is responsible for:
//! - Receiving `DeliveryJob`s from the task channel
//! - Running each one through a [`WebhookDeliverer`], at most
//!   `delivery.concurrency` at a time, and replying with the result
//! - Rebuilding the deliverer (HTTP client, timeout, user agent) when the
//!   delivery config is reloaded
//! - Letting in-flight deliveries finish on shutdown

use crate::config::{ConfigStore, ConfigWatcher, DeliveryConfig};
use crate::events::{DeliverWebhookReceiver, DeliveryJob};
use crate::store::WebhookStore;
use crate::webhooks::{DeliveryExecutor, DeliveryReport, WebhookDeliverer};
use kanau::processor::Processor;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore, watch};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Builds the executor for a config section.
pub type ExecutorFactory = fn(&DeliveryConfig) -> DeliveryExecutor;

/// Consumes delivery tasks with bounded concurrency.
pub struct DeliveryWorker {
    store: Arc<dyn WebhookStore>,
    build_executor: ExecutorFactory,
}

impl DeliveryWorker {
    pub fn new(store: Arc<dyn WebhookStore>) -> Self {
        Self::with_executor_factory(store, DeliveryExecutor::new)
    }

    pub fn with_executor_factory(
        store: Arc<dyn WebhookStore>,
        build_executor: ExecutorFactory,
    ) -> Self {
        Self {
            store,
            build_executor,
        }
    }

    fn deliverer_for(&self, config: &DeliveryConfig) -> WebhookDeliverer {
        WebhookDeliverer::new(self.store.clone(), (self.build_executor)(config))
    }

    /// Run until shutdown is signaled or the task channel closes.
    ///
    /// A job is only taken off the channel once a permit is held, so a
    /// full worker leaves jobs queued and the senders wait. Jobs still
    /// queued at shutdown are dropped with their reply channels, which
    /// tells each waiting caller that nothing was attempted.
    ///
    /// A config change swaps the deliverer and the concurrency limit for
    /// tasks started afterwards; tasks already running keep their permit
    /// and client.
    pub async fn run(
        self,
        mut shutdown_rx: watch::Receiver<bool>,
        mut task_rx: DeliverWebhookReceiver,
        config_store: ConfigStore<DeliveryConfig>,
        mut config_watcher: ConfigWatcher,
    ) {
        let (mut deliverer, mut permits) = {
            let config = config_store.read().await;
            info!(
                concurrency = config.concurrency,
                timeout_secs = config.timeout.as_secs(),
                "DeliveryWorker started"
            );
            (
                self.deliverer_for(&config),
                Arc::new(Semaphore::new(config.concurrency)),
            )
        };
        let mut in_flight = JoinSet::new();
        let mut permit: Option<OwnedSemaphorePermit> = None;
        let mut watching_config = true;

        loop {
            tokio::select! {
                biased;

                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        info!("DeliveryWorker received shutdown signal");
                        break;
                    }
                }

                changed = config_watcher.changed(), if watching_config => match changed {
                    Ok(()) => {
                        let config = config_store.read().await;
                        deliverer = self.deliverer_for(&config);
                        permits = Arc::new(Semaphore::new(config.concurrency));
                        permit = None;
                        info!(
                            concurrency = config.concurrency,
                            timeout_secs = config.timeout.as_secs(),
                            "DeliveryWorker applied new delivery config"
                        );
                    }
                    Err(_) => {
                        warn!("Delivery config source dropped, keeping current config");
                        watching_config = false;
                    }
                },

                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                    log_join(joined);
                }

                acquired = permits.clone().acquire_owned(), if permit.is_none() => match acquired {
                    Ok(acquired) => permit = Some(acquired),
                    Err(_) => {
                        error!("Delivery semaphore closed");
                        break;
                    }
                },

                job = task_rx.recv(), if permit.is_some() => match job {
                    Some(job) => {
                        let permit = permit.take();
                        let deliverer = deliverer.clone();
                        in_flight.spawn(async move {
                            let _permit = permit;
                            run_job(&deliverer, job).await;
                        });
                    }
                    None => {
                        info!("DeliverWebhook channel closed");
                        break;
                    }
                },
            }
        }

        drop(task_rx);
        if !in_flight.is_empty() {
            info!(in_flight = in_flight.len(), "Waiting for in-flight deliveries");
        }
        while let Some(joined) = in_flight.join_next().await {
            log_join(joined);
        }

        info!("DeliveryWorker shutdown complete");
    }
}

async fn run_job(deliverer: &WebhookDeliverer, job: DeliveryJob) {
    let DeliveryJob { task, reply } = job;
    let subscription_id = task.subscription_id;
    let event = task.event.name.clone();
    let result = deliverer.process(task).await;
    match &result {
        Ok(DeliveryReport::Ignored(reason)) => {
            debug!(
                subscription_id = %subscription_id,
                event = %event,
                reason = ?reason,
                "Delivery task ignored"
            );
        }
        Ok(report) => {
            debug!(
                subscription_id = %subscription_id,
                event = %event,
                report = ?report,
                "Delivery task finished"
            );
        }
        Err(e) => {
            error!(
                subscription_id = %subscription_id,
                event = %event,
                error = %e,
                "Delivery task failed"
            );
        }
    }
    if reply.send(result).is_err() {
        debug!(
            subscription_id = %subscription_id,
            event = %event,
            "Delivery requester went away before the result"
        );
    }
}

fn log_join(joined: Result<(), tokio::task::JoinError>) {
    if let Err(e) = joined {
        error!(error = %e, "Delivery task panicked or was cancelled");
    }
}
