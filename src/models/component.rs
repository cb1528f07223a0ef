use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ComponentType {
    pub id: String,
    /// Tag used by the renderer registry, e.g. `heading`.
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PageComponent {
    pub id: String,
    pub page_id: String,
    pub component_type_id: String,
    pub position: i64,
    #[sqlx(skip)]
    pub config: Option<Value>,
    #[sqlx(default)]
    pub config_str: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl PageComponent {
    pub fn parse_json_fields(&mut self) {
        if let Some(ref config_str) = self.config_str {
            self.config = serde_json::from_str(config_str).ok();
        }
    }
}

/// Component row joined with its type, as read for rendering.
#[derive(Debug, Clone, FromRow)]
pub struct PageComponentRow {
    pub id: String,
    pub page_id: String,
    pub component_type_id: String,
    pub position: i64,
    pub config_str: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub type_name: Option<String>,
    pub type_display_name: Option<String>,
    pub type_description: Option<String>,
    pub type_icon: Option<String>,
    pub type_created_at: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct PageComponentForm {
    pub page_id: String,
    pub component_type_id: String,
    #[serde(default)]
    pub position: i64,
    #[serde(default)]
    pub config: Value,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageComponentUpdateForm {
    #[serde(default)]
    pub component_type_id: Option<String>,
    #[serde(default)]
    pub position: Option<i64>,
    /// Replaces the stored config as a whole.
    #[serde(default)]
    pub config: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct ReorderForm {
    pub component_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageComponentModel {
    pub id: String,
    pub page_id: String,
    pub component_type_id: String,
    pub position: i64,
    pub config: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_type: Option<ComponentType>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl PageComponentModel {
    /// Registry tag for this block, if its type resolved.
    pub fn type_name(&self) -> Option<&str> {
        self.component_type.as_ref().map(|t| t.name.as_str())
    }
}

impl From<PageComponent> for PageComponentModel {
    fn from(mut component: PageComponent) -> Self {
        component.parse_json_fields();
        PageComponentModel {
            id: component.id,
            page_id: component.page_id,
            component_type_id: component.component_type_id,
            position: component.position,
            config: component.config.unwrap_or(Value::Null),
            component_type: None,
            created_at: component.created_at,
            updated_at: component.updated_at,
        }
    }
}

impl From<PageComponentRow> for PageComponentModel {
    fn from(row: PageComponentRow) -> Self {
        let config = row
            .config_str
            .as_deref()
            .and_then(|s| serde_json::from_str(s).ok())
            .unwrap_or(Value::Null);

        let component_type = match (row.type_name, row.type_display_name) {
            (Some(name), Some(display_name)) => Some(ComponentType {
                id: row.component_type_id.clone(),
                name,
                display_name,
                description: row.type_description,
                icon: row.type_icon,
                created_at: row.type_created_at.unwrap_or_default(),
            }),
            _ => None,
        };

        PageComponentModel {
            id: row.id,
            page_id: row.page_id,
            component_type_id: row.component_type_id,
            position: row.position,
            config,
            component_type,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
