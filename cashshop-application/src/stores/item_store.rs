use chrono::{Duration, Utc};
use rand::Rng;
use tracing::debug;

use cashshop_domain::messages::{CashItemStatusEvent, Topic};
use cashshop_domain::ports::StoreTransaction;
use cashshop_domain::{CashId, CharacterId, Item, ItemId, NewItem, TemplateId};

use crate::{MessageBuffer, WorkflowError};

pub struct ItemSpec {
    pub template_id: TemplateId,
    pub quantity: u32,
    pub purchased_by: CharacterId,
    pub expiration_days: i64,
}

pub async fn create(
    tx: &mut dyn StoreTransaction,
    buffer: &mut MessageBuffer,
    spec: ItemSpec,
) -> Result<Item, WorkflowError> {
    create_with(tx, buffer, spec, random_cash_id).await
}

/// Draws cash ids from `next_cash_id` until one is unused.
pub async fn create_with<F>(
    tx: &mut dyn StoreTransaction,
    buffer: &mut MessageBuffer,
    spec: ItemSpec,
    mut next_cash_id: F,
) -> Result<Item, WorkflowError>
where
    F: FnMut() -> CashId + Send,
{
    let cash_id = loop {
        let candidate = next_cash_id();
        if !tx.cash_id_exists(candidate).await? {
            break candidate;
        }
        debug!("cash id {} already taken, drawing again", candidate);
    };

    let item = tx
        .insert_item(NewItem {
            cash_id,
            template_id: spec.template_id,
            quantity: spec.quantity,
            flag: 0,
            purchased_by: spec.purchased_by,
            expiration: Utc::now() + Duration::days(spec.expiration_days),
        })
        .await?;
    buffer.put(
        Topic::CashItemStatus,
        item.id,
        &CashItemStatusEvent::from(&item),
    )?;
    Ok(item)
}

pub async fn get_by_id(
    tx: &mut dyn StoreTransaction,
    item_id: ItemId,
) -> Result<Item, WorkflowError> {
    tx.item_by_id(item_id)
        .await?
        .ok_or_else(|| WorkflowError::ItemNotFound(format!("item {}", item_id)))
}

/// Non-negative 63-bit serial.
fn random_cash_id() -> CashId {
    CashId(rand::thread_rng().gen_range(1..=i64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cashshop_domain::ports::Store;
    use cashshop_infrastructure::InMemoryStore;

    fn spec() -> ItemSpec {
        ItemSpec {
            template_id: TemplateId(5_211_000),
            quantity: 1,
            purchased_by: CharacterId(3),
            expiration_days: 30,
        }
    }

    #[tokio::test]
    async fn colliding_cash_ids_are_redrawn() {
        let store = InMemoryStore::default();
        let mut buffer = MessageBuffer::default();
        let mut tx = store.begin().await.expect("begin");

        let first = create_with(tx.as_mut(), &mut buffer, spec(), || CashId(42))
            .await
            .expect("first");
        assert_eq!(first.cash_id, CashId(42));

        let mut draws = vec![CashId(43), CashId(42), CashId(42)];
        let mut attempts = 0;
        let second = create_with(tx.as_mut(), &mut buffer, spec(), || {
            attempts += 1;
            draws.pop().unwrap_or(CashId(44))
        })
        .await
        .expect("second");
        assert_eq!(second.cash_id, CashId(43));
        assert_eq!(attempts, 3);
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn created_item_expires_in_thirty_days_and_is_announced() {
        let store = InMemoryStore::default();
        let mut buffer = MessageBuffer::default();
        let mut tx = store.begin().await.expect("begin");
        let item = create(tx.as_mut(), &mut buffer, spec()).await.expect("create");

        assert_eq!(item.flag, 0);
        assert!(item.cash_id.0 > 0);
        let days = (item.expiration - Utc::now()).num_days();
        assert!((29..=30).contains(&days));
        assert_eq!(buffer.topics(), vec![Topic::CashItemStatus]);

        let loaded = get_by_id(tx.as_mut(), item.id).await.expect("load");
        assert_eq!(loaded, item);
    }

    #[tokio::test]
    async fn many_random_items_never_share_a_cash_id() {
        let store = InMemoryStore::default();
        let mut buffer = MessageBuffer::default();
        let mut tx = store.begin().await.expect("begin");
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            let item = create(tx.as_mut(), &mut buffer, spec()).await.expect("create");
            assert!(seen.insert(item.cash_id));
        }
    }
}
