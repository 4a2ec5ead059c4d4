use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

/// Domain events emitted by the allocation ledger.
///
/// Consumers beyond structured logging (notifications, webhooks) live in
/// separate services; this channel exists so they can be attached without
/// touching the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    AllocationCreated {
        allocation_id: Uuid,
        root_id: String,
        level: String,
        item: String,
    },
    SampleUsageRecorded {
        allocation_id: Uuid,
        emp_code: String,
        customer_id: String,
        qty: i32,
    },
    LineageDispatched {
        chain_id: String,
        records: u64,
    },
    LrAnnotated {
        chain_id: String,
        lr_no: String,
        records: u64,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event; failure is reported but never fails the request that
    /// produced the event.
    pub async fn send(&self, event: Event) {
        if let Err(e) = self.sender.send(event).await {
            warn!("failed to enqueue event: {}", e);
        }
    }
}

/// Drains the event channel, logging each event. Runs for the lifetime of
/// the process.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        match &event {
            Event::AllocationCreated {
                allocation_id,
                root_id,
                level,
                item,
            } => info!(
                %allocation_id, %root_id, %level, %item,
                "allocation created"
            ),
            Event::SampleUsageRecorded {
                allocation_id,
                emp_code,
                customer_id,
                qty,
            } => info!(
                %allocation_id, %emp_code, %customer_id, qty = *qty,
                "sample usage recorded"
            ),
            Event::LineageDispatched { chain_id, records } => {
                info!(%chain_id, records = *records, "lineage dispatched to vendor")
            }
            Event::LrAnnotated {
                chain_id,
                lr_no,
                records,
            } => info!(%chain_id, %lr_no, records = *records, "LR number annotated"),
        }
    }
    info!("event channel closed; worker exiting");
}
