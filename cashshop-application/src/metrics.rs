use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    purchases: AtomicU64,
    purchase_rejections: AtomicU64,
    duplicate_commands: AtomicU64,
    capacity_increases: AtomicU64,
    items_granted: AtomicU64,
    transfers_started: AtomicU64,
    transfers_completed: AtomicU64,
    transfers_failed: AtomicU64,
    callbacks_dropped: AtomicU64,
    workflow_errors: AtomicU64,
    reservations_expired: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub purchases: u64,
    pub purchase_rejections: u64,
    pub duplicate_commands: u64,
    pub capacity_increases: u64,
    pub items_granted: u64,
    pub transfers_started: u64,
    pub transfers_completed: u64,
    pub transfers_failed: u64,
    pub callbacks_dropped: u64,
    pub workflow_errors: u64,
    pub reservations_expired: u64,
}

impl Metrics {
    pub fn record_purchase(&self) {
        self.purchases.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_purchase_rejection(&self) {
        self.purchase_rejections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_duplicate_command(&self) {
        self.duplicate_commands.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_capacity_increase(&self) {
        self.capacity_increases.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_item_granted(&self) {
        self.items_granted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_transfer_started(&self) {
        self.transfers_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_transfer_completed(&self) {
        self.transfers_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_transfer_failed(&self) {
        self.transfers_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_callback_dropped(&self) {
        self.callbacks_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_workflow_error(&self) {
        self.workflow_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_reservations_expired(&self, count: usize) {
        self.reservations_expired
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            purchases: self.purchases.load(Ordering::Relaxed),
            purchase_rejections: self.purchase_rejections.load(Ordering::Relaxed),
            duplicate_commands: self.duplicate_commands.load(Ordering::Relaxed),
            capacity_increases: self.capacity_increases.load(Ordering::Relaxed),
            items_granted: self.items_granted.load(Ordering::Relaxed),
            transfers_started: self.transfers_started.load(Ordering::Relaxed),
            transfers_completed: self.transfers_completed.load(Ordering::Relaxed),
            transfers_failed: self.transfers_failed.load(Ordering::Relaxed),
            callbacks_dropped: self.callbacks_dropped.load(Ordering::Relaxed),
            workflow_errors: self.workflow_errors.load(Ordering::Relaxed),
            reservations_expired: self.reservations_expired.load(Ordering::Relaxed),
        }
    }

    pub fn render_prometheus(&self) -> String {
        let snapshot = self.snapshot();
        let counters = [
            ("cashshop_purchases_total", snapshot.purchases),
            ("cashshop_purchase_rejections_total", snapshot.purchase_rejections),
            ("cashshop_duplicate_commands_total", snapshot.duplicate_commands),
            ("cashshop_capacity_increases_total", snapshot.capacity_increases),
            ("cashshop_items_granted_total", snapshot.items_granted),
            ("cashshop_transfers_started_total", snapshot.transfers_started),
            ("cashshop_transfers_completed_total", snapshot.transfers_completed),
            ("cashshop_transfers_failed_total", snapshot.transfers_failed),
            ("cashshop_callbacks_dropped_total", snapshot.callbacks_dropped),
            ("cashshop_workflow_errors_total", snapshot.workflow_errors),
            ("cashshop_reservations_expired_total", snapshot.reservations_expired),
        ];
        let mut out = String::new();
        for (name, value) in counters {
            out.push_str(&format!("# TYPE {} counter\n{} {}\n", name, name, value));
        }
        out
    }
}
