// Commodity catalog entry

use serde::{Deserialize, Serialize};

use crate::value_objects::{SerialNumber, TemplateId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commodity {
    pub serial_number: SerialNumber,
    pub template_id: TemplateId,
    pub count: u32,
    pub price: u32,
    pub period: u32,
    pub priority: u32,
    pub gender: u8,
    pub on_sale: bool,
}
