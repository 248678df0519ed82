use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, de};

use sellerhub_core::{Entity, FieldErrors, ProductId, SellerId, Validated};

use crate::rules;
use crate::seller::Seller;

pub const NAME_REQUIRED: &str = "name is required";
pub const VALUE_REQUIRED: &str = "value is required";
pub const VALUE_NOT_EXACT: &str = "value must be a plain decimal of at most 28 significant digits";
pub const SELLER_ID_REQUIRED: &str = "seller id is required";

/// A sellable item owned by exactly one seller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id: ProductId,
    name: String,
    value: Decimal,
    seller_id: SellerId,
}

impl Product {
    /// Build a brand-new product with a fresh identifier.
    pub fn new(record: ProductRecord) -> Self {
        Self {
            id: ProductId::new(),
            name: record.name,
            value: record.value,
            seller_id: record.seller_id,
        }
    }

    /// Rehydrate a stored product.
    pub fn from_parts(id: ProductId, name: String, value: Decimal, seller_id: SellerId) -> Self {
        Self {
            id,
            name,
            value,
            seller_id,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn seller_id(&self) -> SellerId {
        self.seller_id
    }

    /// Replace every mutable field with the validated record. The id is kept.
    pub fn apply(&mut self, record: ProductRecord) {
        self.name = record.name;
        self.value = record.value;
        self.seller_id = record.seller_id;
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Outward shape of a product: the stored fields plus its resolved seller.
///
/// `seller` is `None` only if the owning seller vanished underneath the
/// product, which the cascading seller delete is meant to prevent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub value: Decimal,
    pub seller: Option<Seller>,
}

impl ProductView {
    pub fn new(product: Product, seller: Option<Seller>) -> Self {
        Self {
            id: product.id,
            name: product.name,
            value: product.value,
            seller,
        }
    }
}

/// Raw product request body, before validation.
///
/// `value` accepts a JSON number or a decimal string. Unknown fields,
/// including a client-supplied `id`, are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPayload {
    pub name: Option<String>,
    pub value: Option<DecimalText>,
    #[serde(rename = "sellerId", alias = "vendedorId")]
    pub seller_id: Option<SellerId>,
}

/// A decimal amount exactly as the client wrote it.
///
/// JSON numbers are taken from their source text, never through `f64`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecimalText(String);

impl DecimalText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The exact decimal, or `None` when the text would need rounding, uses
    /// exponent notation, or is not a decimal at all.
    pub fn to_decimal(&self) -> Option<Decimal> {
        let plain = !self.0.is_empty()
            && self
                .0
                .bytes()
                .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+'));
        if !plain {
            return None;
        }
        Decimal::from_str_exact(&self.0).ok()
    }
}

impl From<Decimal> for DecimalText {
    fn from(value: Decimal) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for DecimalText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Number(n) => Ok(Self(n.to_string())),
            serde_json::Value::String(s) => Ok(Self(s)),
            other => Err(de::Error::custom(format!(
                "invalid type: {other}, expected a decimal number or string"
            ))),
        }
    }
}

/// Validated product fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    pub name: String,
    pub value: Decimal,
    pub seller_id: SellerId,
}

impl ProductPayload {
    pub fn validate(self) -> Validated<ProductRecord> {
        let mut errors = FieldErrors::new();

        let name = rules::not_blank(&mut errors, "name", self.name, NAME_REQUIRED);
        let value = rules::not_null(&mut errors, "value", self.value, VALUE_REQUIRED).and_then(|text| {
            let exact = text.to_decimal();
            if exact.is_none() {
                errors.reject("value", VALUE_NOT_EXACT);
            }
            exact
        });
        let seller_id = rules::not_null(&mut errors, "sellerId", self.seller_id, SELLER_ID_REQUIRED);

        match (name, value, seller_id) {
            (Some(name), Some(value), Some(seller_id)) => Ok(ProductRecord {
                name,
                value,
                seller_id,
            }),
            _ => Err(errors),
        }
    }
}
