//! Wire-level enumerations shared between the designer and the backend.
//!
//! Everything here serializes to the exact tag strings the execution
//! service expects. `DataType` is deliberately open: the backend's
//! function catalog may introduce payload kinds this crate has never
//! heard of, and those must survive a round trip unchanged.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The kind of payload a param carries.
///
/// Open enumeration: well-known kinds get a variant, anything else is
/// preserved verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataType {
    Text,
    Audio,
    Image,
    Video,
    Label,
    Number,
    Boolean,
    Embedding,
    /// A catalog-supplied kind unknown to this crate.
    Other(String),
}

impl DataType {
    pub fn as_str(&self) -> &str {
        match self {
            DataType::Text => "text",
            DataType::Audio => "audio",
            DataType::Image => "image",
            DataType::Video => "video",
            DataType::Label => "label",
            DataType::Number => "number",
            DataType::Boolean => "boolean",
            DataType::Embedding => "embedding",
            DataType::Other(s) => s,
        }
    }
}

impl From<&str> for DataType {
    fn from(s: &str) -> Self {
        match s {
            "text" => DataType::Text,
            "audio" => DataType::Audio,
            "image" => DataType::Image,
            "video" => DataType::Video,
            "label" => DataType::Label,
            "number" => DataType::Number,
            "boolean" => DataType::Boolean,
            "embedding" => DataType::Embedding,
            other => DataType::Other(other.to_string()),
        }
    }
}

impl FromStr for DataType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(DataType::from(s))
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DataType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DataType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(DataType::from(s.as_str()))
    }
}

/// The structural role of a node in the serialized document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    Asset,
    Input,
    Output,
    Script,
    Router,
    Decision,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Asset => "ASSET",
            NodeType::Input => "INPUT",
            NodeType::Output => "OUTPUT",
            NodeType::Script => "SCRIPT",
            NodeType::Router => "ROUTER",
            NodeType::Decision => "DECISION",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction tag of a param slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParamType {
    Input,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetType {
    Model,
}

/// Backend handling class for asset nodes. Segmentors and reconstructors
/// get special fan-out/fan-in treatment server-side; the client only tags
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionType {
    Ai,
    Segmentor,
    Reconstructor,
    Utility,
    Metric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RouteType {
    CheckType,
    CheckValue,
}

/// Comparison applied by a route when matching its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Equal,
    Different,
    Contain,
    NotContain,
}
