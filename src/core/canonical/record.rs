use super::schema::{Destination, Group, MEDIA, VARIANTS};
use crate::core::path::PathError;
use crate::core::value::Value;
use indexmap::IndexMap;
use serde::Serialize;

/// Generates by-name slot accessors for a group of optional fields.
macro_rules! field_slots {
    ($ty:ident { $($field:ident),+ $(,)? }) => {
        impl $ty {
            fn slot(&self, name: &str) -> Option<&Option<Value>> {
                match name {
                    $(stringify!($field) => Some(&self.$field),)+
                    _ => None,
                }
            }

            fn slot_mut(&mut self, name: &str) -> Option<&mut Option<Value>> {
                match name {
                    $(stringify!($field) => Some(&mut self.$field),)+
                    _ => None,
                }
            }
        }
    };
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CanonicalIdentifiers {
    pub sku: Option<Value>,
    pub upc_ean: Option<Value>,
    pub mpn: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CanonicalBasicInfo {
    pub title: Option<Value>,
    pub description_text: Option<Value>,
    pub description_html: Option<Value>,
    pub brand: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CanonicalPricing {
    pub cost: Option<Value>,
    pub msrp: Option<Value>,
    pub map: Option<Value>,
    pub currency: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CanonicalInventory {
    pub quantity: Option<Value>,
    pub warehouse_name: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CanonicalClassification {
    pub category: Option<Value>,
    pub tags: Option<Value>,
    pub gender: Option<Value>,
    pub product_type: Option<Value>,
}

/// One purchasable variant. A default value is the placeholder used when a
/// later index is written first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CanonicalVariant {
    pub sku: Option<Value>,
    pub title: Option<Value>,
    pub price: Option<Value>,
    pub compare_at_price: Option<Value>,
    pub barcode: Option<Value>,
    pub inventory_quantity: Option<Value>,
    pub option_values: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CanonicalMedia {
    pub url: Option<Value>,
    pub position: Option<Value>,
    pub alt_text: Option<Value>,
}

field_slots!(CanonicalIdentifiers { sku, upc_ean, mpn });
field_slots!(CanonicalBasicInfo {
    title,
    description_text,
    description_html,
    brand
});
field_slots!(CanonicalPricing { cost, msrp, map, currency });
field_slots!(CanonicalInventory { quantity, warehouse_name });
field_slots!(CanonicalClassification {
    category,
    tags,
    gender,
    product_type
});
field_slots!(CanonicalVariant {
    sku,
    title,
    price,
    compare_at_price,
    barcode,
    inventory_quantity
});
field_slots!(CanonicalMedia { url, position, alt_text });

/// Supplier-independent product record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CanonicalProduct {
    pub identifiers: CanonicalIdentifiers,
    pub basic_info: CanonicalBasicInfo,
    pub pricing: CanonicalPricing,
    pub inventory: CanonicalInventory,
    pub classification: CanonicalClassification,
    pub variants: Vec<CanonicalVariant>,
    pub media: Vec<CanonicalMedia>,
    pub attributes: IndexMap<String, Value>,
}

impl CanonicalProduct {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `value` at `destination`, growing sequences with placeholders.
    pub fn assign(&mut self, destination: &Destination, value: Value) -> Result<(), PathError> {
        let unknown = |parent: &str, name: &str| PathError::UnknownField {
            path: destination.to_string(),
            parent: parent.to_string(),
            segment: name.to_string(),
        };
        match destination {
            Destination::Field { group, name } => {
                let slot = self
                    .group_slot_mut(*group, name)
                    .ok_or_else(|| unknown(group.name(), name))?;
                *slot = Some(value);
            }
            Destination::Variant { index, name } => {
                let slot = grow_to(&mut self.variants, *index)
                    .slot_mut(name)
                    .ok_or_else(|| unknown(VARIANTS, name))?;
                *slot = Some(value);
            }
            Destination::VariantOption { index, key } => {
                grow_to(&mut self.variants, *index)
                    .option_values
                    .insert(key.clone(), value);
            }
            Destination::Media { index, name } => {
                let slot = grow_to(&mut self.media, *index)
                    .slot_mut(name)
                    .ok_or_else(|| unknown(MEDIA, name))?;
                *slot = Some(value);
            }
            Destination::Attribute(key) => {
                self.attributes.insert(key.clone(), value);
            }
        }
        Ok(())
    }

    /// Read the value stored at `destination`, if any.
    pub fn get(&self, destination: &Destination) -> Option<&Value> {
        match destination {
            Destination::Field { group, name } => self.group_slot(*group, name)?.as_ref(),
            Destination::Variant { index, name } => self.variants.get(*index)?.slot(name)?.as_ref(),
            Destination::VariantOption { index, key } => {
                self.variants.get(*index)?.option_values.get(key)
            }
            Destination::Media { index, name } => self.media.get(*index)?.slot(name)?.as_ref(),
            Destination::Attribute(key) => self.attributes.get(key),
        }
    }

    fn group_slot(&self, group: Group, name: &str) -> Option<&Option<Value>> {
        match group {
            Group::Identifiers => self.identifiers.slot(name),
            Group::BasicInfo => self.basic_info.slot(name),
            Group::Pricing => self.pricing.slot(name),
            Group::Inventory => self.inventory.slot(name),
            Group::Classification => self.classification.slot(name),
        }
    }

    fn group_slot_mut(&mut self, group: Group, name: &str) -> Option<&mut Option<Value>> {
        match group {
            Group::Identifiers => self.identifiers.slot_mut(name),
            Group::BasicInfo => self.basic_info.slot_mut(name),
            Group::Pricing => self.pricing.slot_mut(name),
            Group::Inventory => self.inventory.slot_mut(name),
            Group::Classification => self.classification.slot_mut(name),
        }
    }
}

fn grow_to<T: Default>(items: &mut Vec<T>, index: usize) -> &mut T {
    if items.len() <= index {
        items.resize_with(index + 1, T::default);
    }
    &mut items[index]
}
