//! Navigation links (HAL `_links` / `_embedded`) for outgoing representations.

use std::collections::BTreeMap;
use std::convert::Infallible;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use serde::Serialize;

/// Configured public base URL, installed as a request extension by the router.
#[derive(Debug, Clone, Default)]
pub struct PublicBaseUrl(pub Option<String>);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: String,
}

/// Relation name → link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Links(BTreeMap<&'static str, Link>);

impl Links {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, rel: &'static str, href: String) -> Self {
        self.0.insert(rel, Link { href });
        self
    }

    pub fn get(&self, rel: &str) -> Option<&Link> {
        self.0.get(rel)
    }
}

/// A record with its navigation links.
#[derive(Debug, Clone, Serialize)]
pub struct Resource<T> {
    #[serde(flatten)]
    pub record: T,
    #[serde(rename = "_links")]
    pub links: Links,
}

/// A list of linked records plus the list's own links.
///
/// `_embedded` is left out entirely for an empty list.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionResource<T> {
    #[serde(rename = "_embedded", skip_serializing_if = "BTreeMap::is_empty")]
    pub embedded: BTreeMap<&'static str, Vec<Resource<T>>>,
    #[serde(rename = "_links")]
    pub links: Links,
}

impl<T> CollectionResource<T> {
    pub fn new(rel: &'static str, items: Vec<Resource<T>>, links: Links) -> Self {
        let mut embedded = BTreeMap::new();
        if !items.is_empty() {
            embedded.insert(rel, items);
        }
        Self { embedded, links }
    }
}

/// Builds hrefs for the current request.
///
/// The base is the configured public URL when there is one, otherwise
/// `http://{Host}`; without either, hrefs are relative paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkBuilder {
    base: String,
}

impl LinkBuilder {
    pub fn new(base: impl Into<String>) -> Self {
        let base: String = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn href(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// `self` + collection links for one record of the `collection` resource.
    pub fn item(&self, collection: &'static str, id: impl core::fmt::Display) -> Links {
        Links::new()
            .with("self", self.href(&format!("/{collection}/{id}")))
            .with(collection, self.href(&format!("/{collection}")))
    }

    /// `self` link of the `collection` resource.
    pub fn collection(&self, collection: &'static str) -> Links {
        Links::new().with("self", self.href(&format!("/{collection}")))
    }

    fn from_parts(parts: &Parts) -> Self {
        if let Some(PublicBaseUrl(Some(base))) = parts.extensions.get::<PublicBaseUrl>() {
            return Self::new(base.clone());
        }

        let host = parts
            .headers
            .get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|h| !h.is_empty());

        match host {
            Some(host) => Self::new(format!("http://{host}")),
            None => Self::new(""),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for LinkBuilder
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts))
    }
}
