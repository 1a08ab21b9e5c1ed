//! Furniture factory: attribute-map validation and construction.
//!
//! The factory is the single entry point for turning untyped attribute
//! maps (request bodies, seed files) into [`FurnitureItem`] values.
//! Unknown categories, missing fields and out-of-range values are
//! rejected with typed errors before anything is constructed.

use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use thiserror::Error;

use oakline_core::Price;

use crate::models::furniture::{CategoryDetails, FurnitureItem};

/// Errors raised while validating or constructing a furniture item.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FactoryError {
    /// The category tag is not registered.
    #[error("unknown furniture category: {0}")]
    InvalidCategory(String),

    /// A required field is absent.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A field's JSON value has the wrong type.
    #[error("field {field} must be a {expected}")]
    InvalidType {
        field: String,
        expected: &'static str,
    },

    /// A field's value violates a constraint.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    /// A dynamic category registration was rejected.
    #[error("invalid category registration: {0}")]
    InvalidRegistration(String),
}

/// Constructor logic for one category: maps validated attributes to the
/// category payload.
pub type CategoryBuilder =
    Box<dyn Fn(&Map<String, Value>) -> Result<CategoryDetails, FactoryError> + Send + Sync>;

/// Validating factory for furniture items.
///
/// The five built-in categories are preregistered; additional categories
/// can be registered at runtime with [`FurnitureFactory::register`].
pub struct FurnitureFactory {
    builders: HashMap<String, CategoryBuilder>,
}

impl Default for FurnitureFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl FurnitureFactory {
    /// Create a factory with the built-in categories registered.
    #[must_use]
    pub fn new() -> Self {
        let mut factory = Self {
            builders: HashMap::new(),
        };
        factory.register_builtin("Chair", |attrs| {
            Ok(CategoryDetails::Chair {
                has_wheels: bool_attr(attrs, "has_wheels")?,
                leg_count: u32_attr(attrs, "leg_count")?,
            })
        });
        factory.register_builtin("Sofa", |attrs| {
            Ok(CategoryDetails::Sofa {
                seat_count: u32_attr(attrs, "seat_count")?,
                convertible_to_bed: bool_attr(attrs, "convertible_to_bed")?,
            })
        });
        factory.register_builtin("Table", |attrs| {
            Ok(CategoryDetails::Table {
                expandable: bool_attr(attrs, "expandable")?,
                seat_count: u32_attr(attrs, "seat_count")?,
                foldable: bool_attr(attrs, "foldable")?,
            })
        });
        factory.register_builtin("Bed", |attrs| {
            Ok(CategoryDetails::Bed {
                has_storage: bool_attr(attrs, "has_storage")?,
                has_headboard: bool_attr(attrs, "has_headboard")?,
            })
        });
        factory.register_builtin("Closet", |attrs| {
            Ok(CategoryDetails::Closet {
                has_mirrors: bool_attr(attrs, "has_mirrors")?,
                shelf_count: u32_attr(attrs, "shelf_count")?,
                door_count: u32_attr(attrs, "door_count")?,
            })
        });
        factory
    }

    fn register_builtin(
        &mut self,
        tag: &str,
        builder: impl Fn(&Map<String, Value>) -> Result<CategoryDetails, FactoryError>
        + Send
        + Sync
        + 'static,
    ) {
        self.builders.insert(tag.to_string(), Box::new(builder));
    }

    /// Register a new category tag at runtime.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::InvalidRegistration`] for an empty tag or
    /// a tag that is already registered.
    pub fn register(&mut self, tag: &str, builder: CategoryBuilder) -> Result<(), FactoryError> {
        if tag.trim().is_empty() {
            return Err(FactoryError::InvalidRegistration(
                "category tag cannot be empty".to_string(),
            ));
        }
        if self.builders.contains_key(tag) {
            return Err(FactoryError::InvalidRegistration(format!(
                "category {tag} is already registered"
            )));
        }
        self.builders.insert(tag.to_string(), builder);
        Ok(())
    }

    /// Whether a category tag is known to the factory.
    #[must_use]
    pub fn knows(&self, tag: &str) -> bool {
        self.builders.contains_key(tag)
    }

    /// Validate an attribute map and construct the matching item.
    ///
    /// The category tag is the discriminator and is never stored as a
    /// free-form attribute on the result.
    ///
    /// # Errors
    ///
    /// See [`FactoryError`]; validation stops at the first failure.
    pub fn create(
        &self,
        category_tag: &str,
        attrs: &Map<String, Value>,
    ) -> Result<FurnitureItem, FactoryError> {
        let builder = self
            .builders
            .get(category_tag)
            .ok_or_else(|| FactoryError::InvalidCategory(category_tag.to_string()))?;

        let name = nonempty_str_attr(attrs, "name")?;
        let description = str_attr(attrs, "description")?;
        let price_amount = decimal_attr(attrs, "price")?;
        let dimensions = str_attr(attrs, "dimensions")?;
        let serial_number = nonempty_str_attr(attrs, "serial_number")?;
        let quantity = u32_attr(attrs, "quantity")?;
        let weight = decimal_attr(attrs, "weight")?;
        let manufacturing_country = str_attr(attrs, "manufacturing_country")?;

        let price = Price::new(price_amount).map_err(|_| FactoryError::InvalidValue {
            field: "price".to_string(),
            reason: "must be a positive value".to_string(),
        })?;
        if weight <= Decimal::ZERO {
            return Err(FactoryError::InvalidValue {
                field: "weight".to_string(),
                reason: "must be a positive value".to_string(),
            });
        }

        let details = builder(attrs)?;

        Ok(FurnitureItem {
            name,
            description,
            price,
            dimensions,
            serial_number,
            quantity,
            weight,
            manufacturing_country,
            details,
        })
    }
}

// =============================================================================
// Attribute readers (shared with custom category builders)
// =============================================================================

fn required<'a>(attrs: &'a Map<String, Value>, field: &str) -> Result<&'a Value, FactoryError> {
    attrs
        .get(field)
        .ok_or_else(|| FactoryError::MissingField(field.to_string()))
}

/// Read a string attribute.
///
/// # Errors
///
/// [`FactoryError::MissingField`] / [`FactoryError::InvalidType`].
pub fn str_attr(attrs: &Map<String, Value>, field: &str) -> Result<String, FactoryError> {
    required(attrs, field)?
        .as_str()
        .map(ToString::to_string)
        .ok_or_else(|| FactoryError::InvalidType {
            field: field.to_string(),
            expected: "string",
        })
}

/// Read a string attribute that must not be empty.
///
/// # Errors
///
/// [`FactoryError::InvalidValue`] on an empty string, plus the
/// [`str_attr`] errors.
pub fn nonempty_str_attr(attrs: &Map<String, Value>, field: &str) -> Result<String, FactoryError> {
    let value = str_attr(attrs, field)?;
    if value.trim().is_empty() {
        return Err(FactoryError::InvalidValue {
            field: field.to_string(),
            reason: "cannot be empty".to_string(),
        });
    }
    Ok(value)
}

/// Read a boolean attribute.
///
/// # Errors
///
/// [`FactoryError::MissingField`] / [`FactoryError::InvalidType`].
pub fn bool_attr(attrs: &Map<String, Value>, field: &str) -> Result<bool, FactoryError> {
    required(attrs, field)?
        .as_bool()
        .ok_or_else(|| FactoryError::InvalidType {
            field: field.to_string(),
            expected: "boolean",
        })
}

/// Read a non-negative integer attribute.
///
/// # Errors
///
/// [`FactoryError::InvalidValue`] for negatives or values beyond `u32`,
/// [`FactoryError::InvalidType`] for non-integers.
pub fn u32_attr(attrs: &Map<String, Value>, field: &str) -> Result<u32, FactoryError> {
    let value = required(attrs, field)?;
    let n = value.as_u64().ok_or_else(|| {
        if value.is_number() {
            FactoryError::InvalidValue {
                field: field.to_string(),
                reason: "must be a non-negative integer".to_string(),
            }
        } else {
            FactoryError::InvalidType {
                field: field.to_string(),
                expected: "non-negative integer",
            }
        }
    })?;
    u32::try_from(n).map_err(|_| FactoryError::InvalidValue {
        field: field.to_string(),
        reason: "value too large".to_string(),
    })
}

/// Read a decimal attribute from a JSON number or numeric string.
///
/// # Errors
///
/// [`FactoryError::MissingField`] / [`FactoryError::InvalidType`].
pub fn decimal_attr(attrs: &Map<String, Value>, field: &str) -> Result<Decimal, FactoryError> {
    let value = required(attrs, field)?;
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        _ => {
            return Err(FactoryError::InvalidType {
                field: field.to_string(),
                expected: "number",
            });
        }
    };
    Decimal::from_str(&text).map_err(|_| FactoryError::InvalidType {
        field: field.to_string(),
        expected: "number",
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use rust_decimal::dec;
    use serde_json::json;

    use super::*;

    /// Full valid attribute map for a chair, shared with other modules'
    /// tests.
    pub(crate) fn chair_attrs() -> Map<String, Value> {
        json!({
            "name": "Office Chair",
            "description": "Ergonomic swivel chair",
            "price": 120.00,
            "dimensions": "60x60x110cm",
            "serial_number": "CH-1001",
            "quantity": 10,
            "weight": 12.5,
            "manufacturing_country": "Denmark",
            "has_wheels": true,
            "leg_count": 5
        })
        .as_object()
        .unwrap()
        .clone()
    }

    #[test]
    fn test_create_chair_preserves_fields() {
        let factory = FurnitureFactory::new();
        let item = factory.create("Chair", &chair_attrs()).unwrap();

        assert_eq!(item.name, "Office Chair");
        assert_eq!(item.price.amount(), dec!(120.00));
        assert_eq!(item.serial_number, "CH-1001");
        assert_eq!(item.quantity, 10);
        assert_eq!(item.weight, dec!(12.5));
        assert_eq!(
            item.details,
            CategoryDetails::Chair {
                has_wheels: true,
                leg_count: 5
            }
        );
    }

    #[test]
    fn test_unknown_category() {
        let factory = FurnitureFactory::new();
        assert_eq!(
            factory.create("Hammock", &chair_attrs()),
            Err(FactoryError::InvalidCategory("Hammock".to_string()))
        );
    }

    #[test]
    fn test_missing_shared_field() {
        let factory = FurnitureFactory::new();
        for field in [
            "name",
            "description",
            "price",
            "dimensions",
            "serial_number",
            "quantity",
            "weight",
            "manufacturing_country",
        ] {
            let mut attrs = chair_attrs();
            attrs.remove(field);
            assert_eq!(
                factory.create("Chair", &attrs),
                Err(FactoryError::MissingField(field.to_string())),
                "expected MissingField for {field}"
            );
        }
    }

    #[test]
    fn test_missing_category_field() {
        let factory = FurnitureFactory::new();
        let mut attrs = chair_attrs();
        attrs.remove("leg_count");
        assert_eq!(
            factory.create("Chair", &attrs),
            Err(FactoryError::MissingField("leg_count".to_string()))
        );
    }

    #[test]
    fn test_invalid_types_and_values() {
        let factory = FurnitureFactory::new();

        let mut attrs = chair_attrs();
        attrs.insert("price".to_string(), json!(0));
        assert!(matches!(
            factory.create("Chair", &attrs),
            Err(FactoryError::InvalidValue { field, .. }) if field == "price"
        ));

        let mut attrs = chair_attrs();
        attrs.insert("weight".to_string(), json!(-3));
        assert!(matches!(
            factory.create("Chair", &attrs),
            Err(FactoryError::InvalidValue { field, .. }) if field == "weight"
        ));

        let mut attrs = chair_attrs();
        attrs.insert("quantity".to_string(), json!(-1));
        assert!(matches!(
            factory.create("Chair", &attrs),
            Err(FactoryError::InvalidValue { field, .. }) if field == "quantity"
        ));

        let mut attrs = chair_attrs();
        attrs.insert("has_wheels".to_string(), json!("yes"));
        assert!(matches!(
            factory.create("Chair", &attrs),
            Err(FactoryError::InvalidType { field, .. }) if field == "has_wheels"
        ));

        let mut attrs = chair_attrs();
        attrs.insert("name".to_string(), json!("  "));
        assert!(matches!(
            factory.create("Chair", &attrs),
            Err(FactoryError::InvalidValue { field, .. }) if field == "name"
        ));
    }

    #[test]
    fn test_register_custom_category() {
        let mut factory = FurnitureFactory::new();
        factory
            .register(
                "BeanBag",
                Box::new(|attrs| {
                    Ok(CategoryDetails::Custom {
                        tag: "BeanBag".to_string(),
                        attributes: attrs
                            .iter()
                            .filter(|(k, _)| *k == "fill_material")
                            .map(|(k, v)| (k.clone(), v.clone()))
                            .collect(),
                    })
                }),
            )
            .unwrap();

        assert!(factory.knows("BeanBag"));

        let mut attrs = chair_attrs();
        attrs.insert("fill_material".to_string(), json!("foam"));
        let item = factory.create("BeanBag", &attrs).unwrap();
        assert_eq!(item.category_tag(), "BeanBag");
    }

    #[test]
    fn test_register_rejects_empty_and_duplicate_tags() {
        let mut factory = FurnitureFactory::new();
        let builder = || -> CategoryBuilder {
            Box::new(|_| {
                Ok(CategoryDetails::Custom {
                    tag: "X".to_string(),
                    attributes: Map::new(),
                })
            })
        };

        assert!(matches!(
            factory.register("", builder()),
            Err(FactoryError::InvalidRegistration(_))
        ));
        assert!(matches!(
            factory.register("Chair", builder()),
            Err(FactoryError::InvalidRegistration(_))
        ));
    }
}
