use crate::db::Database;
use crate::error::{AppError, AppResult};
use crate::models::page::{
    default_page_config, CustomPage, CustomPageForm, CustomPageUpdateForm, PageWithComponents,
};
use crate::services::component::ComponentService;
use crate::utils::misc::{generate_uuid, normalize_page_path, shallow_merge};
use crate::utils::time::current_timestamp;

const PAGE_COLUMNS: &str = "id, title, path, class_id, config AS config_str, created_at, updated_at";

pub struct PageService<'a> {
    db: &'a Database,
}

impl<'a> PageService<'a> {
    pub fn new(db: &'a Database) -> Self {
        PageService { db }
    }

    /// All pages ordered by title.
    pub async fn get_custom_pages(&self) -> AppResult<Vec<CustomPage>> {
        let pages = sqlx::query_as::<_, CustomPage>(&format!(
            "SELECT {} FROM custom_pages ORDER BY title ASC, created_at ASC",
            PAGE_COLUMNS
        ))
        .fetch_all(&self.db.pool)
        .await?;

        tracing::debug!("Loaded {} custom pages", pages.len());
        Ok(pages)
    }

    /// Pages visible inside a class: the class's own pages plus school-wide
    /// ones (no class).
    pub async fn get_pages_for_class(&self, class_id: &str) -> AppResult<Vec<CustomPage>> {
        let pages = sqlx::query_as::<_, CustomPage>(&format!(
            "SELECT {} FROM custom_pages
             WHERE class_id = $1 OR class_id IS NULL
             ORDER BY title ASC, created_at ASC",
            PAGE_COLUMNS
        ))
        .bind(class_id)
        .fetch_all(&self.db.pool)
        .await?;

        Ok(pages)
    }

    pub async fn get_page_by_id(&self, id: &str) -> AppResult<Option<CustomPage>> {
        let page = sqlx::query_as::<_, CustomPage>(&format!(
            "SELECT {} FROM custom_pages WHERE id = $1",
            PAGE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db.pool)
        .await?;

        Ok(page)
    }

    /// Exact path match, with components in render order.
    pub async fn get_page_by_path(&self, path: &str) -> AppResult<PageWithComponents> {
        let page = sqlx::query_as::<_, CustomPage>(&format!(
            "SELECT {} FROM custom_pages WHERE path = $1",
            PAGE_COLUMNS
        ))
        .bind(path)
        .fetch_optional(&self.db.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No page at path '{}'", path)))?;

        let components = ComponentService::new(self.db)
            .get_components_by_page(&page.id)
            .await?;

        tracing::debug!(
            "Loaded page '{}' with {} components",
            page.path,
            components.len()
        );

        Ok(PageWithComponents {
            page: page.into(),
            components,
        })
    }

    pub async fn insert_new_page(&self, form_data: &CustomPageForm) -> AppResult<CustomPage> {
        let title = form_data.title.trim();
        if title.is_empty() {
            return Err(AppError::Validation("Page title is required".to_string()));
        }

        let path = normalize_page_path(&form_data.path);
        if path.is_empty() {
            return Err(AppError::Validation("Page path is required".to_string()));
        }

        let mut config = default_page_config();
        if let Some(partial) = &form_data.config {
            if !partial.is_object() {
                return Err(AppError::Validation(
                    "Page config must be an object".to_string(),
                ));
            }
            shallow_merge(&mut config, partial);
        }

        let now = current_timestamp();
        let id = generate_uuid();

        sqlx::query(
            r#"
            INSERT INTO custom_pages (id, title, path, class_id, config, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&id)
        .bind(title)
        .bind(&path)
        .bind(&form_data.class_id)
        .bind(serde_json::to_string(&config)?)
        .bind(now)
        .bind(now)
        .execute(&self.db.pool)
        .await?;

        tracing::info!("Created page '{}' at /{}", title, path);

        self.get_page_by_id(&id)
            .await?
            .ok_or_else(|| AppError::Internal("Failed to create page".to_string()))
    }

    /// Partial patch. A supplied config is merged key by key over the stored one.
    pub async fn update_page_by_id(
        &self,
        id: &str,
        form_data: &CustomPageUpdateForm,
    ) -> AppResult<CustomPage> {
        let mut existing = self
            .get_page_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Page not found".to_string()))?;
        existing.parse_json_fields();

        let title = match &form_data.title {
            Some(title) if title.trim().is_empty() => {
                return Err(AppError::Validation("Page title is required".to_string()))
            }
            Some(title) => title.trim().to_string(),
            None => existing.title.clone(),
        };

        let path = match &form_data.path {
            Some(path) => {
                let normalized = normalize_page_path(path);
                if normalized.is_empty() {
                    return Err(AppError::Validation("Page path is required".to_string()));
                }
                normalized
            }
            None => existing.path.clone(),
        };

        let class_id = match &form_data.class_id {
            Some(class_id) => class_id.clone(),
            None => existing.class_id.clone(),
        };

        let mut config = existing.config.clone().unwrap_or_else(default_page_config);
        if let Some(incoming) = &form_data.config {
            if !incoming.is_object() {
                return Err(AppError::Validation(
                    "Page config must be an object".to_string(),
                ));
            }
            shallow_merge(&mut config, incoming);
        }

        let result = sqlx::query(
            r#"
            UPDATE custom_pages
            SET title = $1, path = $2, class_id = $3, config = $4, updated_at = $5
            WHERE id = $6
            "#,
        )
        .bind(&title)
        .bind(&path)
        .bind(&class_id)
        .bind(serde_json::to_string(&config)?)
        .bind(current_timestamp())
        .bind(id)
        .execute(&self.db.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Page not found".to_string()));
        }

        tracing::info!("Updated page {}", id);

        self.get_page_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Page not found".to_string()))
    }

    /// Deletes the page row; its components go with it through the schema's
    /// `ON DELETE CASCADE`.
    pub async fn delete_page_by_id(&self, id: &str) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM custom_pages WHERE id = $1")
            .bind(id)
            .execute(&self.db.pool)
            .await?;

        tracing::info!("Deleted page {} ({} rows)", id, result.rows_affected());
        Ok(())
    }
}
