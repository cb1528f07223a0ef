//! Typed configuration for every placeable page block.
//!
//! Stored rows keep the config as a bare JSON object and the kind in
//! `component_types.name`; [`ComponentConfig::from_parts`] joins the two into
//! the tagged enum the renderers consume. Display-only fields are parsed
//! leniently: a value of the wrong shape falls back to the field default so a
//! slightly malformed block still renders.

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::{AppError, AppResult};

/// Key carrying the component kind inside a tagged config object.
pub const TAG_KEY: &str = "component";

pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn default_true() -> bool {
    true
}

fn default_heading_level() -> i64 {
    2
}

fn default_columns() -> u32 {
    2
}

fn default_thickness() -> u32 {
    1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Animation {
    #[default]
    Fade,
    Slide,
    Zoom,
    None,
}

/// Fields every variant accepts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub style: BTreeMap<String, Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub animation: Animation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// Width/height given either as pixels or as a CSS length such as `"50%"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dimension {
    Pixels(u32),
    Css(String),
}

impl Dimension {
    pub fn to_css(&self) -> String {
        match self {
            Dimension::Pixels(px) => format!("{}px", px),
            Dimension::Css(value) => value
                .chars()
                .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '%' | '-'))
                .collect(),
        }
    }
}

/// Content slot that holds either text or another block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Block {
    Text(String),
    Component(Box<ComponentConfig>),
}

impl Default for Block {
    fn default() -> Self {
        Block::Text(String::new())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadingConfig {
    #[serde(flatten)]
    pub common: CommonProps,
    pub text: String,
    #[serde(default = "default_heading_level", deserialize_with = "lenient")]
    pub level: i64,
    #[serde(default, deserialize_with = "lenient")]
    pub align: Alignment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphConfig {
    #[serde(flatten)]
    pub common: CommonProps,
    pub text: String,
    #[serde(default, deserialize_with = "lenient")]
    pub align: TextAlign,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    #[serde(flatten)]
    pub common: CommonProps,
    #[serde(alias = "url")]
    pub src: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub width: Option<Dimension>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub height: Option<Dimension>,
    #[serde(default, deserialize_with = "lenient")]
    pub align: Alignment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardConfig {
    #[serde(flatten)]
    pub common: CommonProps,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Block,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridConfig {
    #[serde(flatten)]
    pub common: CommonProps,
    #[serde(default = "default_columns", deserialize_with = "lenient")]
    pub columns: u32,
    #[serde(default)]
    pub items: Vec<Block>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DividerVariant {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DividerConfig {
    #[serde(flatten)]
    pub common: CommonProps,
    #[serde(default, deserialize_with = "lenient")]
    pub variant: DividerVariant,
    #[serde(default = "default_thickness", deserialize_with = "lenient")]
    pub thickness: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ButtonVariant {
    #[default]
    Primary,
    Secondary,
    Outline,
    Ghost,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonConfig {
    #[serde(flatten)]
    pub common: CommonProps,
    pub text: String,
    #[serde(default, deserialize_with = "lenient")]
    pub variant: ButtonVariant,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub disabled: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub loading: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ListStyle {
    Ordered,
    #[default]
    Unordered,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListConfig {
    #[serde(flatten)]
    pub common: CommonProps,
    pub items: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub list_style: ListStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QuoteVariant {
    #[default]
    Default,
    Bordered,
    Highlighted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteConfig {
    #[serde(flatten)]
    pub common: CommonProps,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub variant: QuoteVariant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoConfig {
    #[serde(flatten)]
    pub common: CommonProps,
    pub url: String,
    #[serde(default, deserialize_with = "lenient")]
    pub autoplay: bool,
    #[serde(default = "default_true")]
    pub controls: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableConfig {
    #[serde(flatten)]
    pub common: CommonProps,
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<Value>>,
    #[serde(default, deserialize_with = "lenient")]
    pub striped: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub bordered: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileConfig {
    #[serde(flatten)]
    pub common: CommonProps,
    pub url: String,
    pub name: String,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "component", rename_all = "lowercase")]
pub enum ComponentConfig {
    Heading(HeadingConfig),
    Paragraph(ParagraphConfig),
    Image(ImageConfig),
    Card(CardConfig),
    Grid(GridConfig),
    Divider(DividerConfig),
    Button(ButtonConfig),
    List(ListConfig),
    Quote(QuoteConfig),
    Video(VideoConfig),
    Table(TableConfig),
    File(FileConfig),
}

impl ComponentConfig {
    pub const TAGS: [&'static str; 12] = [
        "heading",
        "paragraph",
        "image",
        "card",
        "grid",
        "divider",
        "button",
        "list",
        "quote",
        "video",
        "table",
        "file",
    ];

    /// Builds the typed config from a component type name and its stored
    /// payload. `null` is read as an empty object.
    pub fn from_parts(tag: &str, config: &Value) -> AppResult<Self> {
        if !Self::TAGS.contains(&tag) {
            return Err(AppError::UnsupportedComponent(tag.to_string()));
        }

        let mut object = match config {
            Value::Object(map) => map.clone(),
            Value::Null => serde_json::Map::new(),
            other => {
                return Err(AppError::InvalidConfig(format!(
                    "{} config must be an object, got {}",
                    tag, other
                )))
            }
        };
        object.insert(TAG_KEY.to_string(), Value::String(tag.to_string()));

        serde_json::from_value(Value::Object(object))
            .map_err(|e| AppError::InvalidConfig(format!("{}: {}", tag, e)))
    }

    pub fn tag(&self) -> &'static str {
        match self {
            ComponentConfig::Heading(_) => "heading",
            ComponentConfig::Paragraph(_) => "paragraph",
            ComponentConfig::Image(_) => "image",
            ComponentConfig::Card(_) => "card",
            ComponentConfig::Grid(_) => "grid",
            ComponentConfig::Divider(_) => "divider",
            ComponentConfig::Button(_) => "button",
            ComponentConfig::List(_) => "list",
            ComponentConfig::Quote(_) => "quote",
            ComponentConfig::Video(_) => "video",
            ComponentConfig::Table(_) => "table",
            ComponentConfig::File(_) => "file",
        }
    }

    pub fn common(&self) -> &CommonProps {
        match self {
            ComponentConfig::Heading(c) => &c.common,
            ComponentConfig::Paragraph(c) => &c.common,
            ComponentConfig::Image(c) => &c.common,
            ComponentConfig::Card(c) => &c.common,
            ComponentConfig::Grid(c) => &c.common,
            ComponentConfig::Divider(c) => &c.common,
            ComponentConfig::Button(c) => &c.common,
            ComponentConfig::List(c) => &c.common,
            ComponentConfig::Quote(c) => &c.common,
            ComponentConfig::Video(c) => &c.common,
            ComponentConfig::Table(c) => &c.common,
            ComponentConfig::File(c) => &c.common,
        }
    }
}
