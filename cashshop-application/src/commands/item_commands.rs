// Administrative item grants. The item is created and announced but not
// placed in any compartment.

use tracing::{error, info};

use cashshop_domain::{CharacterId, Item, TemplateId};

use crate::commands::flush_committed;
use crate::stores::item_store::{self, ItemSpec};
use crate::{AppState, MessageBuffer, WorkflowError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemGrant {
    pub character_id: CharacterId,
    pub template_id: TemplateId,
    pub quantity: u32,
    pub purchased_by: CharacterId,
}

pub async fn grant_item(state: &AppState, grant: ItemGrant) -> Result<Item, WorkflowError> {
    let mut buffer = MessageBuffer::default();
    let result = create_granted_item(state, &mut buffer, &grant).await;
    match result {
        Ok(item) => {
            flush_committed(state, buffer).await;
            state.metrics.record_item_granted();
            info!(
                "granted item {} of template {} for character {}",
                item.id, item.template_id, grant.character_id
            );
            Ok(item)
        }
        Err(err) => {
            state.metrics.record_workflow_error();
            error!(
                "granting template {} to character {} failed: {:?}",
                grant.template_id, grant.character_id, err
            );
            Err(err)
        }
    }
}

async fn create_granted_item(
    state: &AppState,
    buffer: &mut MessageBuffer,
    grant: &ItemGrant,
) -> Result<Item, WorkflowError> {
    let mut tx = state.store.begin().await?;
    let item = item_store::create(
        tx.as_mut(),
        buffer,
        ItemSpec {
            template_id: grant.template_id,
            quantity: grant.quantity,
            purchased_by: grant.purchased_by,
            expiration_days: state.config.item_expiration_days,
        },
    )
    .await?;
    tx.commit().await?;
    Ok(item)
}
