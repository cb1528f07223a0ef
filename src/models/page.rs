use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use sqlx::FromRow;

use crate::models::component::PageComponentModel;
use crate::models::component_config::lenient;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CustomPage {
    pub id: String,
    pub title: String,
    pub path: String,
    pub class_id: Option<String>,
    #[sqlx(skip)]
    pub config: Option<Value>,
    #[sqlx(default)]
    pub config_str: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl CustomPage {
    pub fn parse_json_fields(&mut self) {
        if let Some(ref config_str) = self.config_str {
            self.config = serde_json::from_str(config_str).ok();
        }
    }
}

/// Config every new page starts from before the caller's partial config is
/// merged over it.
pub fn default_page_config() -> Value {
    json!({"layout": "standard", "theme": "default"})
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PageLayout {
    #[default]
    Standard,
    Wide,
    Full,
    Sidebar,
    TwoColumn,
}

impl PageLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageLayout::Standard => "standard",
            PageLayout::Wide => "wide",
            PageLayout::Full => "full",
            PageLayout::Sidebar => "sidebar",
            PageLayout::TwoColumn => "two-column",
        }
    }
}

fn default_theme() -> String {
    "default".to_string()
}

/// Typed view over the stored page config. Unknown keys stay in the stored
/// JSON and are ignored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    #[serde(default, deserialize_with = "lenient")]
    pub layout: PageLayout,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default, alias = "backgroundColor", deserialize_with = "lenient")]
    pub background_color: Option<String>,
    #[serde(default, alias = "textColor", deserialize_with = "lenient")]
    pub text_color: Option<String>,
    #[serde(default, alias = "headerImage", deserialize_with = "lenient")]
    pub header_image: Option<String>,
}

impl Default for PageConfig {
    fn default() -> Self {
        PageConfig {
            layout: PageLayout::Standard,
            theme: default_theme(),
            background_color: None,
            text_color: None,
            header_image: None,
        }
    }
}

impl PageConfig {
    pub fn from_value(value: Option<&Value>) -> Self {
        value
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
pub struct CustomPageForm {
    pub title: String,
    pub path: String,
    #[serde(default)]
    pub class_id: Option<String>,
    #[serde(default)]
    pub config: Option<Value>,
}

fn deserialize_some<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Default, Deserialize)]
pub struct CustomPageUpdateForm {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    /// Absent leaves the class untouched; explicit `null` makes the page
    /// school-wide.
    #[serde(default, deserialize_with = "deserialize_some")]
    pub class_id: Option<Option<String>>,
    #[serde(default)]
    pub config: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomPageModel {
    pub id: String,
    pub title: String,
    pub path: String,
    pub class_id: Option<String>,
    pub config: Value,
    pub created_at: i64,
    pub updated_at: i64,
}

impl CustomPageModel {
    pub fn page_config(&self) -> PageConfig {
        PageConfig::from_value(Some(&self.config))
    }
}

impl From<CustomPage> for CustomPageModel {
    fn from(mut page: CustomPage) -> Self {
        page.parse_json_fields();
        CustomPageModel {
            id: page.id,
            title: page.title,
            path: page.path,
            class_id: page.class_id,
            config: page.config.unwrap_or_else(default_page_config),
            created_at: page.created_at,
            updated_at: page.updated_at,
        }
    }
}

/// A page plus its blocks in render order.
#[derive(Debug, Clone, Serialize)]
pub struct PageWithComponents {
    #[serde(flatten)]
    pub page: CustomPageModel,
    pub components: Vec<PageComponentModel>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_config_from_value() {
        let config = PageConfig::from_value(Some(&json!({
            "layout": "two-column",
            "theme": "dark",
            "backgroundColor": "#000",
            "extra": true
        })));
        assert_eq!(config.layout, PageLayout::TwoColumn);
        assert_eq!(config.theme, "dark");
        assert_eq!(config.background_color.as_deref(), Some("#000"));
    }

    #[test]
    fn test_page_config_unknown_layout_falls_back() {
        let config = PageConfig::from_value(Some(&json!({"layout": "masonry"})));
        assert_eq!(config.layout, PageLayout::Standard);
        assert_eq!(config.theme, "default");
        assert_eq!(PageConfig::from_value(None), PageConfig::default());
    }

    #[test]
    fn test_page_config_mistyped_colour_keeps_other_keys() {
        let config = PageConfig::from_value(Some(&json!({
            "layout": "wide",
            "theme": "ocean",
            "backgroundColor": 5,
            "textColor": "#fff",
            "headerImage": ["banner.png"]
        })));
        assert_eq!(config.layout, PageLayout::Wide);
        assert_eq!(config.theme, "ocean");
        assert_eq!(config.background_color, None);
        assert_eq!(config.text_color.as_deref(), Some("#fff"));
        assert_eq!(config.header_image, None);
    }

    #[test]
    fn test_update_form_distinguishes_null_class() {
        let cleared: CustomPageUpdateForm =
            serde_json::from_value(json!({"class_id": null})).unwrap();
        assert_eq!(cleared.class_id, Some(None));

        let untouched: CustomPageUpdateForm =
            serde_json::from_value(json!({"title": "New"})).unwrap();
        assert_eq!(untouched.class_id, None);
    }
}
