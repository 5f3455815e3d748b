//! Decoding of the upstream RSS JSON feeds.
//!
//! Every scalar in these feeds is wrapped in a `{"label": ..., "attributes": {...}}`
//! envelope, and some fields switch between a single object and an array depending
//! on how many values the upstream has. Both shapes are resolved here, once, so the
//! rest of the crate only ever sees flat lists.

use serde::de::value::{MapAccessDeserializer, SeqAccessDeserializer};
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// Reads a field that the upstream emits as one object, an array of them, or null
///
/// The shape is chosen from the JSON token, so a malformed element is an error
/// rather than a fallback to the other shape.
fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    struct OneOrMany<T>(PhantomData<T>);

    impl<'de, T: Deserialize<'de>> Visitor<'de> for OneOrMany<T> {
        type Value = Vec<T>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an object, an array of objects or null")
        }

        fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<Self::Value, A::Error> {
            Vec::<T>::deserialize(SeqAccessDeserializer::new(seq))
        }

        fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
            T::deserialize(MapAccessDeserializer::new(map)).map(|item| vec![item])
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(OneOrMany(PhantomData))
}

/// Top-level `{"feed": {"entry": ...}}` document
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct Document<T> {
    feed: Feed<T>,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct Feed<T> {
    /// Absent or null when the feed is empty, a bare object when it holds one entry
    #[serde(default, rename = "entry", deserialize_with = "one_or_many")]
    entries: Vec<T>,
}

/// Decodes a catalog (top apps) feed
pub fn decode_catalog(bytes: &[u8]) -> Result<Vec<CatalogEntry>, serde_json::Error> {
    serde_json::from_slice::<Document<CatalogEntry>>(bytes).map(|doc| doc.feed.entries)
}

/// Decodes a customer reviews feed
pub fn decode_reviews(bytes: &[u8]) -> Result<Vec<ReviewEntry>, serde_json::Error> {
    serde_json::from_slice::<Document<ReviewEntry>>(bytes).map(|doc| doc.feed.entries)
}

/// `{"label": "..."}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Label {
    pub label: String,
}

#[cfg(test)]
impl Label {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

/// One application from the catalog feed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogEntry {
    #[serde(rename = "im:name")]
    pub name: Label,
    /// Artwork variants, smallest first
    #[serde(rename = "im:image")]
    pub images: Vec<Image>,
    pub summary: Label,
    #[serde(rename = "im:price")]
    pub price: Price,
    #[serde(rename = "im:contentType")]
    pub content_type: ContentType,
    pub rights: Label,
    pub title: Label,
    #[serde(rename = "link", deserialize_with = "one_or_many")]
    pub links: Vec<Link>,
    pub id: EntryId,
    #[serde(rename = "im:artist")]
    pub artist: Artist,
    pub category: Category,
    #[serde(rename = "im:releaseDate")]
    pub release_date: ReleaseDate,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Image {
    pub label: String,
    pub attributes: ImageAttributes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageAttributes {
    pub height: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Price {
    pub label: String,
    pub attributes: PriceAttributes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceAttributes {
    pub amount: String,
    pub currency: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentType {
    pub attributes: ContentTypeAttributes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentTypeAttributes {
    pub term: String,
    pub label: String,
}

/// Store identifier; `label` is the store URL, the ids live in the attributes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryId {
    pub label: String,
    pub attributes: EntryIdAttributes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryIdAttributes {
    #[serde(rename = "im:id")]
    pub id: String,
    #[serde(rename = "im:bundleId")]
    pub bundle_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Artist {
    pub label: String,
    pub attributes: ArtistAttributes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtistAttributes {
    pub href: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Category {
    pub attributes: CategoryAttributes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryAttributes {
    #[serde(rename = "im:id")]
    pub id: String,
    pub term: String,
    pub scheme: String,
    pub label: String,
}

/// `label` is an ISO timestamp, `attributes.label` the human readable date
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseDate {
    pub label: String,
    pub attributes: Label,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Link {
    pub attributes: LinkAttributes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkAttributes {
    pub rel: String,
    #[serde(rename = "type")]
    pub media_type: String,
    pub href: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(rename = "im:duration", skip_serializing_if = "String::is_empty")]
    pub duration: String,
    #[serde(rename = "im:assetType", skip_serializing_if = "String::is_empty")]
    pub asset_type: String,
}

/// One customer review from the reviews feed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewEntry {
    pub id: Label,
    pub author: ReviewAuthor,
    pub content: Label,
    #[serde(rename = "im:rating")]
    pub rating: Label,
    /// RFC3339 timestamp of the review
    pub updated: Label,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewAuthor {
    pub name: Label,
}
