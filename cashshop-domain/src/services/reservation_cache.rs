use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::value_objects::{CharacterId, ItemId, TransactionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reservation {
    pub claimant: CharacterId,
    pub transaction_id: Option<TransactionId>,
    pub expires_at: DateTime<Utc>,
}

/// Outcome of releasing a reservation on behalf of a saga callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Correlation {
    /// The live reservation belonged to the callback and was released.
    Matched(Reservation),
    /// A live reservation exists for a different transaction; it was kept.
    Mismatched(Reservation),
    /// Nothing live was reserved for the item.
    Missing,
}

/// Time-bounded exclusive claims on items during in-flight transfers.
///
/// The lock is only held for map access. Expired entries are treated as absent
/// by every read and are purged by `sweep`.
pub struct ReservationCache {
    ttl: chrono::Duration,
    entries: Mutex<HashMap<ItemId, Reservation>>,
}

impl ReservationCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl: chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::days(365)),
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn is_reserved(&self, item_id: ItemId) -> bool {
        self.is_reserved_at(item_id, Utc::now())
    }

    pub fn reservation(&self, item_id: ItemId) -> Option<Reservation> {
        let now = Utc::now();
        let entries = self.entries.lock();
        entries
            .get(&item_id)
            .filter(|reservation| reservation.expires_at > now)
            .copied()
    }

    /// Claims the item unless a live reservation already exists.
    pub fn reserve(&self, item_id: ItemId, claimant: CharacterId) -> bool {
        self.reserve_at(item_id, claimant, None, Utc::now())
    }

    pub fn reserve_for(
        &self,
        item_id: ItemId,
        claimant: CharacterId,
        transaction_id: TransactionId,
    ) -> bool {
        self.reserve_at(item_id, claimant, Some(transaction_id), Utc::now())
    }

    pub fn release(&self, item_id: ItemId) {
        self.entries.lock().remove(&item_id);
    }

    /// Releases the reservation when it belongs to `transaction_id`. A callback
    /// without a transaction id matches any live reservation for the item.
    pub fn release_matching(
        &self,
        item_id: ItemId,
        transaction_id: Option<TransactionId>,
    ) -> Correlation {
        let now = Utc::now();
        let mut entries = self.entries.lock();
        let Some(current) = entries.get(&item_id).copied() else {
            return Correlation::Missing;
        };
        if current.expires_at <= now {
            entries.remove(&item_id);
            return Correlation::Missing;
        }
        match (current.transaction_id, transaction_id) {
            (Some(live), Some(incoming)) if live != incoming => Correlation::Mismatched(current),
            _ => {
                entries.remove(&item_id);
                Correlation::Matched(current)
            }
        }
    }

    /// Purges expired reservations, returning how many were removed.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Utc::now())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_reserved_at(&self, item_id: ItemId, now: DateTime<Utc>) -> bool {
        let mut entries = self.entries.lock();
        match entries.get(&item_id) {
            Some(reservation) if reservation.expires_at > now => true,
            Some(_) => {
                entries.remove(&item_id);
                false
            }
            None => false,
        }
    }

    fn reserve_at(
        &self,
        item_id: ItemId,
        claimant: CharacterId,
        transaction_id: Option<TransactionId>,
        now: DateTime<Utc>,
    ) -> bool {
        let mut entries = self.entries.lock();
        if let Some(existing) = entries.get(&item_id) {
            if existing.expires_at > now {
                return false;
            }
        }
        entries.insert(
            item_id,
            Reservation {
                claimant,
                transaction_id,
                expires_at: now + self.ttl,
            },
        );
        true
    }

    fn sweep_at(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, reservation| reservation.expires_at > now);
        before - entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> ReservationCache {
        ReservationCache::new(Duration::from_secs(300))
    }

    #[test]
    fn second_claimant_is_refused_until_release() {
        let cache = cache();
        assert!(cache.reserve(ItemId(1), CharacterId(10)));
        assert!(!cache.reserve(ItemId(1), CharacterId(11)));
        assert!(cache.is_reserved(ItemId(1)));

        cache.release(ItemId(1));
        assert!(!cache.is_reserved(ItemId(1)));
        assert!(cache.reserve(ItemId(1), CharacterId(11)));
    }

    #[test]
    fn release_is_idempotent() {
        let cache = cache();
        cache.release(ItemId(5));
        assert!(cache.reserve(ItemId(5), CharacterId(1)));
        cache.release(ItemId(5));
        cache.release(ItemId(5));
        assert!(cache.is_empty());
    }

    #[test]
    fn expired_reservation_reads_as_free_and_can_be_reclaimed() {
        let cache = cache();
        let start = Utc::now();
        assert!(cache.reserve_at(ItemId(2), CharacterId(1), None, start));
        let later = start + chrono::Duration::seconds(301);
        assert!(cache.is_reserved_at(ItemId(2), start + chrono::Duration::seconds(299)));
        assert!(!cache.is_reserved_at(ItemId(2), later));
        assert!(cache.reserve_at(ItemId(2), CharacterId(2), None, later));
    }

    #[test]
    fn sweep_purges_only_expired_entries() {
        let cache = cache();
        let start = Utc::now();
        assert!(cache.reserve_at(ItemId(1), CharacterId(1), None, start));
        assert!(cache.reserve_at(
            ItemId(2),
            CharacterId(1),
            None,
            start + chrono::Duration::seconds(120)
        ));

        assert_eq!(cache.sweep_at(start + chrono::Duration::seconds(60)), 0);
        assert_eq!(cache.sweep_at(start + chrono::Duration::seconds(301)), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.sweep_at(start + chrono::Duration::seconds(500)), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn real_clock_expiry_is_observable() {
        let cache = ReservationCache::new(Duration::from_millis(20));
        assert!(cache.reserve(ItemId(3), CharacterId(1)));
        std::thread::sleep(Duration::from_millis(40));
        assert!(!cache.is_reserved(ItemId(3)));
        assert_eq!(cache.sweep(), 0);
    }

    #[test]
    fn callbacks_correlate_on_transaction_id() {
        let cache = cache();
        let first = TransactionId::generate();
        let other = TransactionId::generate();
        assert!(cache.reserve_for(ItemId(4), CharacterId(1), first));

        assert!(matches!(
            cache.release_matching(ItemId(4), Some(other)),
            Correlation::Mismatched(_)
        ));
        assert!(cache.is_reserved(ItemId(4)));

        match cache.release_matching(ItemId(4), Some(first)) {
            Correlation::Matched(reservation) => {
                assert_eq!(reservation.claimant, CharacterId(1));
                assert_eq!(reservation.transaction_id, Some(first));
            }
            other => panic!("unexpected correlation {:?}", other),
        }
        assert_eq!(cache.release_matching(ItemId(4), Some(first)), Correlation::Missing);
    }

    #[test]
    fn callback_without_transaction_id_matches_by_item() {
        let cache = cache();
        assert!(cache.reserve_for(ItemId(8), CharacterId(2), TransactionId::generate()));
        assert!(matches!(
            cache.release_matching(ItemId(8), None),
            Correlation::Matched(_)
        ));
        assert!(!cache.is_reserved(ItemId(8)));
    }

    #[test]
    fn concurrent_claims_admit_exactly_one_winner() {
        let cache = std::sync::Arc::new(cache());
        let handles: Vec<_> = (0..16)
            .map(|claimant| {
                let cache = cache.clone();
                std::thread::spawn(move || cache.reserve(ItemId(99), CharacterId(claimant)))
            })
            .collect();
        let winners = handles
            .into_iter()
            .map(|handle| handle.join().expect("join"))
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
    }
}
