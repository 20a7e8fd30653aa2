use crate::core::path::{FieldPath, PathError, PathSegment};
use serde::Serialize;
use std::fmt;

/// Highest sequence index a destination may address.
pub const MAX_SEQUENCE_INDEX: usize = 1000;

pub const VARIANTS: &str = "variants";
pub const MEDIA: &str = "media";
pub const ATTRIBUTES: &str = "attributes";
pub const OPTION_VALUES: &str = "option_values";

/// Expected shape of a canonical scalar field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Decimal,
    Integer,
    TextList,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Text => "text",
            FieldKind::Decimal => "decimal",
            FieldKind::Integer => "integer",
            FieldKind::TextList => "list of text",
        };
        f.write_str(name)
    }
}

type FieldTable = &'static [(&'static str, FieldKind)];

const IDENTIFIER_FIELDS: FieldTable = &[
    ("sku", FieldKind::Text),
    ("upc_ean", FieldKind::Text),
    ("mpn", FieldKind::Text),
];

const BASIC_INFO_FIELDS: FieldTable = &[
    ("title", FieldKind::Text),
    ("description_text", FieldKind::Text),
    ("description_html", FieldKind::Text),
    ("brand", FieldKind::Text),
];

const PRICING_FIELDS: FieldTable = &[
    ("cost", FieldKind::Decimal),
    ("msrp", FieldKind::Decimal),
    ("map", FieldKind::Decimal),
    ("currency", FieldKind::Text),
];

const INVENTORY_FIELDS: FieldTable = &[
    ("quantity", FieldKind::Integer),
    ("warehouse_name", FieldKind::Text),
];

const CLASSIFICATION_FIELDS: FieldTable = &[
    ("category", FieldKind::Text),
    ("tags", FieldKind::TextList),
    ("gender", FieldKind::Text),
    ("product_type", FieldKind::Text),
];

pub const VARIANT_FIELDS: FieldTable = &[
    ("sku", FieldKind::Text),
    ("title", FieldKind::Text),
    ("price", FieldKind::Decimal),
    ("compare_at_price", FieldKind::Decimal),
    ("barcode", FieldKind::Text),
    ("inventory_quantity", FieldKind::Integer),
];

pub const MEDIA_FIELDS: FieldTable = &[
    ("url", FieldKind::Text),
    ("position", FieldKind::Integer),
    ("alt_text", FieldKind::Text),
];

/// Fixed top-level groups of scalar fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    Identifiers,
    BasicInfo,
    Pricing,
    Inventory,
    Classification,
}

impl Group {
    pub const ALL: [Group; 5] = [
        Group::Identifiers,
        Group::BasicInfo,
        Group::Pricing,
        Group::Inventory,
        Group::Classification,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Group::Identifiers => "identifiers",
            Group::BasicInfo => "basic_info",
            Group::Pricing => "pricing",
            Group::Inventory => "inventory",
            Group::Classification => "classification",
        }
    }

    pub fn from_name(name: &str) -> Option<Group> {
        Group::ALL.into_iter().find(|group| group.name() == name)
    }

    pub fn fields(&self) -> FieldTable {
        match self {
            Group::Identifiers => IDENTIFIER_FIELDS,
            Group::BasicInfo => BASIC_INFO_FIELDS,
            Group::Pricing => PRICING_FIELDS,
            Group::Inventory => INVENTORY_FIELDS,
            Group::Classification => CLASSIFICATION_FIELDS,
        }
    }
}

fn find_field(table: FieldTable, name: &str) -> Option<(&'static str, FieldKind)> {
    table.iter().copied().find(|(field, _)| *field == name)
}

/// A destination path resolved against the canonical shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Destination {
    Field { group: Group, name: &'static str },
    Variant { index: usize, name: &'static str },
    VariantOption { index: usize, key: String },
    Media { index: usize, name: &'static str },
    Attribute(String),
}

impl Destination {
    /// Resolve a parsed path to a canonical slot, or explain why it has none.
    pub fn compile(path: &FieldPath) -> Result<Self, PathError> {
        let text = path.to_string();
        let segments = path.segments();
        let Some((first, rest)) = segments.split_first() else {
            return Err(PathError::Empty);
        };
        let root = match first {
            PathSegment::Key(key) => key.as_str(),
            PathSegment::Index(_) => {
                return Err(PathError::UnknownField {
                    path: text,
                    parent: "record".to_string(),
                    segment: first.to_string(),
                })
            }
        };

        match root {
            VARIANTS => compile_variant(&text, rest),
            MEDIA => {
                let (index, tail) = sequence_index(&text, MEDIA, rest)?;
                let name = single_field(&text, MEDIA, MEDIA_FIELDS, tail)?;
                Ok(Destination::Media { index, name })
            }
            ATTRIBUTES => match rest {
                [] => Err(PathError::Incomplete { path: text }),
                [key] => Ok(Destination::Attribute(key.as_key().into_owned())),
                [_, extra, ..] => Err(PathError::TooDeep {
                    path: text.clone(),
                    segment: extra.to_string(),
                }),
            },
            other => match Group::from_name(other) {
                Some(group) => {
                    let name = single_field(&text, group.name(), group.fields(), rest)?;
                    Ok(Destination::Field { group, name })
                }
                None => Err(PathError::UnknownField {
                    path: text.clone(),
                    parent: "record".to_string(),
                    segment: other.to_string(),
                }),
            },
        }
    }

    /// Expected kind of the addressed field; `None` for open maps.
    pub fn kind(&self) -> Option<FieldKind> {
        match self {
            Destination::Field { group, name } => find_field(group.fields(), name).map(|f| f.1),
            Destination::Variant { name, .. } => find_field(VARIANT_FIELDS, name).map(|f| f.1),
            Destination::Media { name, .. } => find_field(MEDIA_FIELDS, name).map(|f| f.1),
            Destination::VariantOption { .. } => Some(FieldKind::Text),
            Destination::Attribute(_) => None,
        }
    }
}

fn compile_variant(text: &str, rest: &[PathSegment]) -> Result<Destination, PathError> {
    let (index, tail) = sequence_index(text, VARIANTS, rest)?;
    match tail {
        [PathSegment::Key(key), option] if key == OPTION_VALUES => Ok(Destination::VariantOption {
            index,
            key: option.as_key().into_owned(),
        }),
        [PathSegment::Key(key)] if key == OPTION_VALUES => Err(PathError::Incomplete {
            path: text.to_string(),
        }),
        [PathSegment::Key(key), _, extra, ..] if key == OPTION_VALUES => Err(PathError::TooDeep {
            path: text.to_string(),
            segment: extra.to_string(),
        }),
        _ => {
            let name = single_field(text, VARIANTS, VARIANT_FIELDS, tail)?;
            Ok(Destination::Variant { index, name })
        }
    }
}

fn sequence_index<'p>(
    text: &str,
    parent: &str,
    rest: &'p [PathSegment],
) -> Result<(usize, &'p [PathSegment]), PathError> {
    match rest {
        [] => Err(PathError::Incomplete {
            path: text.to_string(),
        }),
        [PathSegment::Index(index), tail @ ..] => {
            if *index > MAX_SEQUENCE_INDEX {
                return Err(PathError::IndexTooLarge {
                    path: text.to_string(),
                    index: *index,
                    max: MAX_SEQUENCE_INDEX,
                });
            }
            Ok((*index, tail))
        }
        [other, ..] => Err(PathError::ExpectedIndex {
            path: text.to_string(),
            parent: parent.to_string(),
            segment: other.to_string(),
        }),
    }
}

fn single_field(
    text: &str,
    parent: &str,
    table: FieldTable,
    rest: &[PathSegment],
) -> Result<&'static str, PathError> {
    match rest {
        [] => Err(PathError::Incomplete {
            path: text.to_string(),
        }),
        [segment] => find_field(table, &segment.as_key())
            .map(|(name, _)| name)
            .ok_or_else(|| PathError::UnknownField {
                path: text.to_string(),
                parent: parent.to_string(),
                segment: segment.to_string(),
            }),
        [_, extra, ..] => Err(PathError::TooDeep {
            path: text.to_string(),
            segment: extra.to_string(),
        }),
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Field { group, name } => write!(f, "{}.{}", group.name(), name),
            Destination::Variant { index, name } => write!(f, "{}.{}.{}", VARIANTS, index, name),
            Destination::VariantOption { index, key } => {
                write!(f, "{}.{}.{}.{}", VARIANTS, index, OPTION_VALUES, key)
            }
            Destination::Media { index, name } => write!(f, "{}.{}.{}", MEDIA, index, name),
            Destination::Attribute(key) => write!(f, "{}.{}", ATTRIBUTES, key),
        }
    }
}
