use std::collections::HashMap;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::Client;
use serde::Deserialize;

use cashshop_domain::ports::CommodityCatalog;
use cashshop_domain::{Commodity, LookupError, SerialNumber, TemplateId};

use crate::services::json_api::{self, Document};

const COMMODITY_RESOURCE: &str = "data/commodity/items";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommodityAttributes {
    item_id: u32,
    #[serde(default)]
    count: u32,
    price: u32,
    #[serde(default)]
    period: u32,
    #[serde(default)]
    priority: u32,
    #[serde(default)]
    gender: u8,
    #[serde(default)]
    on_sale: bool,
}

/// Commodity catalog served by the data service.
pub struct RestCommodityCatalog {
    client: Client,
    base_url: String,
}

impl RestCommodityCatalog {
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
impl CommodityCatalog for RestCommodityCatalog {
    async fn commodity_by_serial(&self, serial_number: SerialNumber) -> Result<Commodity, LookupError> {
        let url = format!("{}{}/{}", self.base_url, COMMODITY_RESOURCE, serial_number);
        let document: Document<CommodityAttributes> =
            json_api::fetch(&self.client, &url, format!("commodity {}", serial_number)).await?;
        Ok(to_commodity(serial_number, document))
    }
}

fn to_commodity(serial_number: SerialNumber, document: Document<CommodityAttributes>) -> Commodity {
    let attributes = document.data.attributes;
    Commodity {
        serial_number,
        template_id: TemplateId(attributes.item_id),
        count: attributes.count,
        price: attributes.price,
        period: attributes.period,
        priority: attributes.priority,
        gender: attributes.gender,
        on_sale: attributes.on_sale,
    }
}

/// Fixed catalog kept in memory.
#[derive(Default)]
pub struct InMemoryCommodityCatalog {
    commodities: RwLock<HashMap<SerialNumber, Commodity>>,
}

impl InMemoryCommodityCatalog {
    pub fn insert(&self, commodity: Commodity) {
        self.commodities
            .write()
            .insert(commodity.serial_number, commodity);
    }
}

#[async_trait]
impl CommodityCatalog for InMemoryCommodityCatalog {
    async fn commodity_by_serial(&self, serial_number: SerialNumber) -> Result<Commodity, LookupError> {
        self.commodities
            .read()
            .get(&serial_number)
            .cloned()
            .ok_or_else(|| LookupError::NotFound(format!("commodity {}", serial_number)))
    }
}
