// Compartment entity

use serde::{Deserialize, Serialize};

use crate::entities::{AssetView, Decoration};
use crate::value_objects::{AccountId, CashId, CompartmentId, CompartmentType};

pub const DEFAULT_COMPARTMENT_CAPACITY: u32 = 55;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compartment {
    pub id: CompartmentId,
    pub account_id: AccountId,
    pub compartment_type: CompartmentType,
    pub capacity: u32,
}

impl Compartment {
    pub fn new(account_id: AccountId, compartment_type: CompartmentType, capacity: u32) -> Self {
        Self {
            id: CompartmentId::generate(),
            account_id,
            compartment_type,
            capacity,
        }
    }
}

/// A compartment with its assets, each asset joined with its item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompartmentView {
    pub compartment: Compartment,
    pub assets: Decoration<Vec<AssetView>>,
}

impl CompartmentView {
    /// `None` when the asset listing could not be read.
    pub fn has_free_slot(&self) -> Option<bool> {
        match &self.assets {
            Decoration::Resolved(assets) => Some((assets.len() as u64) < u64::from(self.compartment.capacity)),
            Decoration::Absent => Some(self.compartment.capacity > 0),
            Decoration::Unavailable(_) => None,
        }
    }

    pub fn find_by_cash_id(&self, cash_id: CashId) -> Option<&AssetView> {
        self.assets
            .resolved()
            .and_then(|assets| assets.iter().find(|view| view.holds_cash_id(cash_id)))
    }

    /// Assets whose item could not be joined.
    pub fn partial_assets(&self) -> usize {
        self.assets
            .resolved()
            .map(|assets| assets.iter().filter(|view| view.item.is_partial()).count())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Asset, Item};
    use crate::value_objects::{AssetId, CharacterId, ItemId, TemplateId};

    fn view_with(capacity: u32, assets: Decoration<Vec<AssetView>>) -> CompartmentView {
        CompartmentView {
            compartment: Compartment::new(AccountId(1), CompartmentType::Explorer, capacity),
            assets,
        }
    }

    fn asset_view(item_id: u32, cash_id: i64) -> AssetView {
        AssetView {
            asset: Asset {
                id: AssetId::generate(),
                compartment_id: CompartmentId::generate(),
                item_id: ItemId(item_id),
            },
            item: Decoration::Resolved(Item {
                id: ItemId(item_id),
                cash_id: CashId(cash_id),
                template_id: TemplateId(5_000_000),
                quantity: 1,
                flag: 0,
                purchased_by: CharacterId(1),
                expiration: chrono::Utc::now(),
            }),
        }
    }

    #[test]
    fn free_slot_respects_capacity() {
        let full = view_with(1, Decoration::Resolved(vec![asset_view(1, 10)]));
        assert_eq!(full.has_free_slot(), Some(false));
        let open = view_with(2, Decoration::Resolved(vec![asset_view(1, 10)]));
        assert_eq!(open.has_free_slot(), Some(true));
        let unknown = view_with(2, Decoration::Unavailable("offline".to_string()));
        assert_eq!(unknown.has_free_slot(), None);
    }

    #[test]
    fn cash_id_lookup_skips_partial_assets() {
        let mut partial = asset_view(2, 20);
        partial.item = Decoration::Unavailable("offline".to_string());
        let view = view_with(5, Decoration::Resolved(vec![asset_view(1, 10), partial]));
        assert_eq!(
            view.find_by_cash_id(CashId(10)).map(|found| found.asset.item_id),
            Some(ItemId(1))
        );
        assert!(view.find_by_cash_id(CashId(20)).is_none());
        assert_eq!(view.partial_assets(), 1);
    }
}
