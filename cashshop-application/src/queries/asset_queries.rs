use cashshop_domain::{AssetId, AssetView};

use crate::stores::asset_store;
use crate::{AppError, AppState};

/// One asset with its item joined.
pub async fn get_asset(state: &AppState, asset_id: AssetId) -> Result<Option<AssetView>, AppError> {
    let mut tx = state.store.begin().await?;
    Ok(asset_store::get_by_id(tx.as_mut(), asset_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cashshop_domain::{CharacterId, Decoration, SerialNumber};

    use crate::commands::purchase_commands::{purchase, PurchaseOutcome, PurchaseRequest};
    use crate::test_support::Harness;

    #[tokio::test]
    async fn purchased_asset_is_read_with_its_item() {
        let harness = Harness::new();
        harness.seed_account(1, 10, 100).await;
        harness.add_commodity(20_000_001, 5_211_048, 60);

        let outcome = purchase(
            &harness.state,
            PurchaseRequest {
                character_id: CharacterId(10),
                currency: 1,
                serial_number: SerialNumber(20_000_001),
                idempotency_key: None,
            },
        )
        .await
        .expect("purchase");
        let PurchaseOutcome::Completed(receipt) = outcome else {
            panic!("purchase not completed: {:?}", outcome);
        };

        let view = get_asset(&harness.state, receipt.asset_id)
            .await
            .expect("read")
            .expect("asset");
        assert_eq!(view.asset.item_id, receipt.item_id);
        assert!(matches!(&view.item, Decoration::Resolved(item) if item.id == receipt.item_id));
        assert!(get_asset(&harness.state, AssetId::generate())
            .await
            .expect("read")
            .is_none());
    }
}
