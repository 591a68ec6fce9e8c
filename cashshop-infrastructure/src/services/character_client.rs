use std::collections::HashMap;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

use cashshop_domain::ports::CharacterDirectory;
use cashshop_domain::{
    AccountId, Character, CharacterId, InventoryCapacities, InventoryType, LookupError,
};

use crate::services::json_api::{self, Document, Resource};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CharacterAttributes {
    account_id: u32,
    name: String,
    job_id: u16,
}

#[derive(Debug, Deserialize)]
struct CompartmentAttributes {
    #[serde(rename = "type")]
    inventory_type: u8,
    capacity: u32,
}

/// Character service client. Inventory tabs come back as included
/// `compartments` resources when requested.
pub struct RestCharacterDirectory {
    client: Client,
    base_url: String,
}

impl RestCharacterDirectory {
    /// `base_url` must end with a slash.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl CharacterDirectory for RestCharacterDirectory {
    async fn character_by_id(
        &self,
        character_id: CharacterId,
        with_inventory: bool,
    ) -> Result<Character, LookupError> {
        let mut url = format!("{}characters/{}", self.base_url, character_id);
        if with_inventory {
            url.push_str("?include=inventory");
        }
        let document = json_api::fetch(&self.client, &url, format!("character {}", character_id))
            .await?;
        Ok(to_character(character_id, with_inventory, document))
    }
}

fn to_character(
    character_id: CharacterId,
    with_inventory: bool,
    document: Document<CharacterAttributes, Resource<CompartmentAttributes>>,
) -> Character {
    let inventory = with_inventory.then(|| {
        document
            .included
            .iter()
            .filter(|resource| resource.kind.is_empty() || resource.kind == "compartments")
            .fold(InventoryCapacities::default(), |capacities, resource| {
                match InventoryType::try_from(resource.attributes.inventory_type) {
                    Ok(inventory_type) => {
                        capacities.with(inventory_type, resource.attributes.capacity)
                    }
                    Err(err) => {
                        warn!("character {} has {}", character_id, err);
                        capacities
                    }
                }
            })
    });
    let attributes = document.data.attributes;
    Character {
        id: character_id,
        account_id: AccountId(attributes.account_id),
        name: attributes.name,
        job_id: attributes.job_id,
        inventory,
    }
}

/// Fixed character set kept in memory.
#[derive(Default)]
pub struct InMemoryCharacterDirectory {
    characters: RwLock<HashMap<CharacterId, Character>>,
}

impl InMemoryCharacterDirectory {
    pub fn insert(&self, character: Character) {
        self.characters.write().insert(character.id, character);
    }
}

#[async_trait]
impl CharacterDirectory for InMemoryCharacterDirectory {
    async fn character_by_id(
        &self,
        character_id: CharacterId,
        with_inventory: bool,
    ) -> Result<Character, LookupError> {
        let mut character = self
            .characters
            .read()
            .get(&character_id)
            .cloned()
            .ok_or_else(|| LookupError::NotFound(format!("character {}", character_id)))?;
        if !with_inventory {
            character.inventory = None;
        }
        Ok(character)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
        "data": {
            "type": "characters",
            "id": "10",
            "attributes": { "accountId": 1, "name": "Atlas", "jobId": 1100 }
        },
        "included": [
            { "type": "compartments", "id": "a", "attributes": { "type": 1, "capacity": 24 } },
            { "type": "compartments", "id": "b", "attributes": { "type": 4, "capacity": 48 } },
            { "type": "compartments", "id": "c", "attributes": { "type": 9, "capacity": 1 } }
        ]
    }"#;

    #[test]
    fn parses_character_with_inventory() {
        let document = json_api::parse(BODY).expect("parse");
        let character = to_character(CharacterId(10), true, document);
        assert_eq!(character.account_id, AccountId(1));
        assert_eq!(character.job_id, 1_100);
        let inventory = character.inventory.expect("inventory");
        assert_eq!(inventory.capacity(InventoryType::Equip), Some(24));
        assert_eq!(inventory.capacity(InventoryType::Etc), Some(48));
        assert_eq!(inventory.capacity(InventoryType::Use), None);
    }

    #[test]
    fn inventory_is_omitted_unless_requested() {
        let document = json_api::parse(BODY).expect("parse");
        assert_eq!(to_character(CharacterId(10), false, document).inventory, None);
    }

    #[tokio::test]
    async fn in_memory_directory_strips_unrequested_inventory() {
        let directory = InMemoryCharacterDirectory::default();
        directory.insert(Character {
            id: CharacterId(10),
            account_id: AccountId(1),
            name: "Atlas".to_string(),
            job_id: 0,
            inventory: Some(InventoryCapacities::default().with(InventoryType::Cash, 24)),
        });
        let character = directory
            .character_by_id(CharacterId(10), false)
            .await
            .expect("character");
        assert_eq!(character.inventory, None);
        assert!(directory
            .character_by_id(CharacterId(11), true)
            .await
            .is_err());
    }
}
