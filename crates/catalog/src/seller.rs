use serde::{Deserialize, Serialize};

use sellerhub_core::{Entity, FieldErrors, SellerId, Validated};

use crate::rules;

pub const NAME_REQUIRED: &str = "name is required";
pub const EMAIL_REQUIRED: &str = "email is required";
pub const EMAIL_INVALID: &str = "invalid email format";

/// A vendor offering products.
///
/// The products a seller owns are a back-reference only: they are found
/// through `ProductStore::find_by_seller` and never serialized with the seller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Seller {
    id: SellerId,
    name: String,
    email: String,
}

impl Seller {
    /// Build a brand-new seller with a fresh identifier.
    pub fn new(record: SellerRecord) -> Self {
        Self {
            id: SellerId::new(),
            name: record.name,
            email: record.email,
        }
    }

    /// Rehydrate a stored seller.
    pub fn from_parts(id: SellerId, name: String, email: String) -> Self {
        Self { id, name, email }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Replace every mutable field with the validated record. The id is kept.
    pub fn apply(&mut self, record: SellerRecord) {
        self.name = record.name;
        self.email = record.email;
    }
}

impl Entity for Seller {
    type Id = SellerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Raw seller request body, before validation.
///
/// Every field is optional so that missing fields surface as field errors
/// rather than as a body parse failure. Unknown fields (including `id`) are
/// ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SellerPayload {
    #[serde(alias = "nome")]
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Validated seller fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SellerRecord {
    pub name: String,
    pub email: String,
}

impl SellerPayload {
    pub fn validate(self) -> Validated<SellerRecord> {
        let mut errors = FieldErrors::new();

        let name = rules::not_blank(&mut errors, "name", self.name, NAME_REQUIRED);
        let email = rules::not_blank(&mut errors, "email", self.email, EMAIL_REQUIRED);
        if let Some(email) = &email {
            if !rules::is_email(email) {
                errors.reject("email", EMAIL_INVALID);
            }
        }

        match (name, email) {
            (Some(name), Some(email)) if errors.is_empty() => Ok(SellerRecord { name, email }),
            _ => Err(errors),
        }
    }
}
