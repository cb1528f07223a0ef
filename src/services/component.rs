use crate::config::ReorderMode;
use crate::db::Database;
use crate::error::{AppError, AppResult};
use crate::models::component::{
    ComponentType, PageComponent, PageComponentForm, PageComponentModel, PageComponentRow,
    PageComponentUpdateForm,
};
use crate::models::component_config::ComponentConfig;
use crate::utils::misc::generate_uuid;
use crate::utils::time::current_timestamp;

const COMPONENT_COLUMNS: &str =
    "id, page_id, component_type_id, position, config AS config_str, created_at, updated_at";

pub struct ComponentService<'a> {
    db: &'a Database,
}

impl<'a> ComponentService<'a> {
    pub fn new(db: &'a Database) -> Self {
        ComponentService { db }
    }

    /// The type catalog ordered by name.
    pub async fn get_component_types(&self) -> AppResult<Vec<ComponentType>> {
        let types = sqlx::query_as::<_, ComponentType>(
            r#"
            SELECT id, name, display_name, description, icon, created_at
            FROM component_types
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.db.pool)
        .await?;

        Ok(types)
    }

    pub async fn get_component_type_by_id(&self, id: &str) -> AppResult<Option<ComponentType>> {
        let component_type = sqlx::query_as::<_, ComponentType>(
            r#"
            SELECT id, name, display_name, description, icon, created_at
            FROM component_types
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db.pool)
        .await?;

        Ok(component_type)
    }

    pub async fn get_component_by_id(&self, id: &str) -> AppResult<Option<PageComponent>> {
        let component = sqlx::query_as::<_, PageComponent>(&format!(
            "SELECT {} FROM page_components WHERE id = $1",
            COMPONENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db.pool)
        .await?;

        Ok(component)
    }

    /// Components of a page in render order, each with its type resolved.
    /// Equal positions keep insertion order.
    pub async fn get_components_by_page(&self, page_id: &str) -> AppResult<Vec<PageComponentModel>> {
        let rows = sqlx::query_as::<_, PageComponentRow>(
            r#"
            SELECT pc.id, pc.page_id, pc.component_type_id, pc.position,
                   pc.config AS config_str, pc.created_at, pc.updated_at,
                   ct.name AS type_name,
                   ct.display_name AS type_display_name,
                   ct.description AS type_description,
                   ct.icon AS type_icon,
                   ct.created_at AS type_created_at
            FROM page_components pc
            LEFT JOIN component_types ct ON ct.id = pc.component_type_id
            WHERE pc.page_id = $1
            ORDER BY pc.position ASC, pc.created_at ASC, pc.rowid ASC
            "#,
        )
        .bind(page_id)
        .fetch_all(&self.db.pool)
        .await?;

        Ok(rows.into_iter().map(PageComponentModel::from).collect())
    }

    /// Checks the payload against the type's config shape.
    async fn validate_config(
        &self,
        component_type_id: &str,
        config: &serde_json::Value,
    ) -> AppResult<()> {
        let component_type = self
            .get_component_type_by_id(component_type_id)
            .await?
            .ok_or_else(|| {
                AppError::Validation(format!("Unknown component type '{}'", component_type_id))
            })?;

        ComponentConfig::from_parts(&component_type.name, config)
            .map(|_| ())
            .map_err(|e| AppError::Validation(e.to_string()))
    }

    /// Duplicate positions are accepted.
    pub async fn insert_new_component(
        &self,
        form_data: &PageComponentForm,
    ) -> AppResult<PageComponent> {
        self.validate_config(&form_data.component_type_id, &form_data.config)
            .await?;

        let now = current_timestamp();
        let id = generate_uuid();
        let config = if form_data.config.is_null() {
            serde_json::json!({})
        } else {
            form_data.config.clone()
        };

        sqlx::query(
            r#"
            INSERT INTO page_components (id, page_id, component_type_id, position, config, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&id)
        .bind(&form_data.page_id)
        .bind(&form_data.component_type_id)
        .bind(form_data.position)
        .bind(serde_json::to_string(&config)?)
        .bind(now)
        .bind(now)
        .execute(&self.db.pool)
        .await?;

        tracing::info!(
            "Added {} component {} to page {} at position {}",
            form_data.component_type_id,
            id,
            form_data.page_id,
            form_data.position
        );

        self.get_component_by_id(&id)
            .await?
            .ok_or_else(|| AppError::Internal("Failed to add component".to_string()))
    }

    pub async fn update_component_by_id(
        &self,
        id: &str,
        form_data: &PageComponentUpdateForm,
    ) -> AppResult<PageComponent> {
        let mut existing = self
            .get_component_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Component not found".to_string()))?;
        existing.parse_json_fields();

        let component_type_id = form_data
            .component_type_id
            .as_ref()
            .unwrap_or(&existing.component_type_id);
        let position = form_data.position.unwrap_or(existing.position);
        let config = form_data
            .config
            .clone()
            .or(existing.config.clone())
            .unwrap_or_else(|| serde_json::json!({}));

        if form_data.component_type_id.is_some() || form_data.config.is_some() {
            self.validate_config(component_type_id, &config).await?;
        }

        let result = sqlx::query(
            r#"
            UPDATE page_components
            SET component_type_id = $1, position = $2, config = $3, updated_at = $4
            WHERE id = $5
            "#,
        )
        .bind(component_type_id)
        .bind(position)
        .bind(serde_json::to_string(&config)?)
        .bind(current_timestamp())
        .bind(id)
        .execute(&self.db.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Component not found".to_string()));
        }

        tracing::info!("Updated component {}", id);

        self.get_component_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Component not found".to_string()))
    }

    pub async fn delete_component_by_id(&self, id: &str) -> AppResult<()> {
        sqlx::query("DELETE FROM page_components WHERE id = $1")
            .bind(id)
            .execute(&self.db.pool)
            .await?;

        tracing::info!("Deleted component {}", id);
        Ok(())
    }

    /// Sets `position = index` for each id, scoped to `page_id`. An id that is
    /// not a component of the page is a failed step.
    pub async fn reorder_components(
        &self,
        page_id: &str,
        component_ids: &[String],
        mode: ReorderMode,
    ) -> AppResult<()> {
        match mode {
            ReorderMode::Sequential => self.reorder_sequential(page_id, component_ids).await,
            ReorderMode::Transactional => self.reorder_transactional(page_id, component_ids).await,
        }
    }

    /// One statement per row with no rollback: a failure at step N leaves rows
    /// 0..N renumbered and the rest at their old positions.
    async fn reorder_sequential(&self, page_id: &str, component_ids: &[String]) -> AppResult<()> {
        let total = component_ids.len();
        let now = current_timestamp();

        for (index, component_id) in component_ids.iter().enumerate() {
            let outcome = sqlx::query(
                "UPDATE page_components SET position = $1, updated_at = $2 WHERE id = $3 AND page_id = $4",
            )
            .bind(index as i64)
            .bind(now)
            .bind(component_id)
            .bind(page_id)
            .execute(&self.db.pool)
            .await;

            let message = match outcome {
                Ok(result) if result.rows_affected() > 0 => continue,
                Ok(_) => format!("component {} is not on page {}", component_id, page_id),
                Err(e) => e.to_string(),
            };

            tracing::warn!(
                "Reorder of page {} stopped at step {} of {}: {}",
                page_id,
                index + 1,
                total,
                message
            );
            return Err(AppError::PartialReorder {
                applied: index,
                total,
                message,
            });
        }

        tracing::info!("Reordered {} components on page {}", total, page_id);
        Ok(())
    }

    async fn reorder_transactional(&self, page_id: &str, component_ids: &[String]) -> AppResult<()> {
        let now = current_timestamp();
        let mut tx = self.db.pool.begin().await?;

        for (index, component_id) in component_ids.iter().enumerate() {
            let result = sqlx::query(
                "UPDATE page_components SET position = $1, updated_at = $2 WHERE id = $3 AND page_id = $4",
            )
            .bind(index as i64)
            .bind(now)
            .bind(component_id)
            .bind(page_id)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                tx.rollback().await?;
                return Err(AppError::NotFound(format!(
                    "Component {} is not on page {}",
                    component_id, page_id
                )));
            }
        }

        tx.commit().await?;
        tracing::info!(
            "Reordered {} components on page {} in one transaction",
            component_ids.len(),
            page_id
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_db;
    use crate::models::page::CustomPageForm;
    use crate::services::page::PageService;
    use serde_json::json;

    async fn seed_page(db: &Database, path: &str) -> String {
        PageService::new(db)
            .insert_new_page(&CustomPageForm {
                title: path.to_string(),
                path: path.to_string(),
                class_id: None,
                config: None,
            })
            .await
            .unwrap()
            .id
    }

    async fn add(
        db: &Database,
        page_id: &str,
        type_id: &str,
        position: i64,
        config: serde_json::Value,
    ) -> String {
        ComponentService::new(db)
            .insert_new_component(&PageComponentForm {
                page_id: page_id.to_string(),
                component_type_id: type_id.to_string(),
                position,
                config,
            })
            .await
            .unwrap()
            .id
    }

    async fn ordered_ids(db: &Database, path: &str) -> Vec<String> {
        PageService::new(db)
            .get_page_by_path(path)
            .await
            .unwrap()
            .components
            .into_iter()
            .map(|c| c.id)
            .collect()
    }

    async fn position_of(db: &Database, id: &str) -> i64 {
        ComponentService::new(db)
            .get_component_by_id(id)
            .await
            .unwrap()
            .unwrap()
            .position
    }

    #[tokio::test]
    async fn test_component_types_are_ordered_by_name() {
        let db = test_db().await;
        let names: Vec<String> = ComponentService::new(&db)
            .get_component_types()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();

        assert_eq!(names.len(), 12);
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(names.first().map(String::as_str), Some("button"));
    }

    #[tokio::test]
    async fn test_load_by_path_orders_by_position_with_types() {
        let db = test_db().await;
        let page_id = seed_page(&db, "clubs").await;

        let para = add(&db, &page_id, "ct-paragraph", 5, json!({"text": "b"})).await;
        let heading = add(&db, &page_id, "ct-heading", 1, json!({"text": "a"})).await;
        let divider = add(&db, &page_id, "ct-divider", 9, json!({})).await;

        let page = PageService::new(&db).get_page_by_path("clubs").await.unwrap();
        let ids: Vec<&str> = page.components.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec![heading.as_str(), para.as_str(), divider.as_str()]);
        assert_eq!(page.components[0].type_name(), Some("heading"));
        assert_eq!(page.components[0].config, json!({"text": "a"}));
    }

    #[tokio::test]
    async fn test_duplicate_positions_keep_insertion_order() {
        let db = test_db().await;
        let page_id = seed_page(&db, "dupes").await;

        let first = add(&db, &page_id, "ct-divider", 0, json!({})).await;
        let second = add(&db, &page_id, "ct-divider", 0, json!({})).await;
        let third = add(&db, &page_id, "ct-divider", 0, json!({})).await;

        let expected = vec![first, second, third];
        assert_eq!(ordered_ids(&db, "dupes").await, expected);
        assert_eq!(ordered_ids(&db, "dupes").await, expected);
    }

    #[tokio::test]
    async fn test_insert_rejects_config_of_wrong_shape() {
        let db = test_db().await;
        let page_id = seed_page(&db, "shape").await;

        let err = ComponentService::new(&db)
            .insert_new_component(&PageComponentForm {
                page_id: page_id.clone(),
                component_type_id: "ct-heading".to_string(),
                position: 0,
                config: json!({"level": 1}),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = ComponentService::new(&db)
            .insert_new_component(&PageComponentForm {
                page_id,
                component_type_id: "ct-carousel".to_string(),
                position: 0,
                config: json!({}),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_insert_on_missing_page_is_a_persistence_failure() {
        let db = test_db().await;
        let err = ComponentService::new(&db)
            .insert_new_component(&PageComponentForm {
                page_id: "no-such-page".to_string(),
                component_type_id: "ct-divider".to_string(),
                position: 0,
                config: json!({}),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }

    #[tokio::test]
    async fn test_update_and_delete_component() {
        let db = test_db().await;
        let page_id = seed_page(&db, "edit").await;
        let id = add(&db, &page_id, "ct-heading", 0, json!({"text": "Old"})).await;
        let service = ComponentService::new(&db);

        let mut updated = service
            .update_component_by_id(
                &id,
                &PageComponentUpdateForm {
                    config: Some(json!({"text": "New", "level": 3})),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        updated.parse_json_fields();
        assert_eq!(updated.config, Some(json!({"text": "New", "level": 3})));
        assert_eq!(updated.position, 0);

        let moved = service
            .update_component_by_id(
                &id,
                &PageComponentUpdateForm {
                    position: Some(4),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(moved.position, 4);

        service.delete_component_by_id(&id).await.unwrap();
        assert!(service.get_component_by_id(&id).await.unwrap().is_none());

        let err = service
            .update_component_by_id(&id, &PageComponentUpdateForm::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_reorder_assigns_index_positions() {
        let db = test_db().await;
        let page_id = seed_page(&db, "order").await;
        let c1 = add(&db, &page_id, "ct-divider", 0, json!({})).await;
        let c2 = add(&db, &page_id, "ct-divider", 1, json!({})).await;
        let c3 = add(&db, &page_id, "ct-divider", 2, json!({})).await;

        ComponentService::new(&db)
            .reorder_components(
                &page_id,
                &[c3.clone(), c1.clone(), c2.clone()],
                ReorderMode::Sequential,
            )
            .await
            .unwrap();

        assert_eq!(ordered_ids(&db, "order").await, vec![c3.clone(), c1.clone(), c2.clone()]);
        assert_eq!(position_of(&db, &c3).await, 0);
        assert_eq!(position_of(&db, &c1).await, 1);
        assert_eq!(position_of(&db, &c2).await, 2);
    }

    #[tokio::test]
    async fn test_sequential_reorder_failure_leaves_mixed_positions() {
        let db = test_db().await;
        let page_id = seed_page(&db, "partial").await;
        let c1 = add(&db, &page_id, "ct-divider", 0, json!({})).await;
        let c2 = add(&db, &page_id, "ct-divider", 1, json!({})).await;
        let c3 = add(&db, &page_id, "ct-divider", 2, json!({})).await;

        let err = ComponentService::new(&db)
            .reorder_components(
                &page_id,
                &[c3.clone(), "missing".to_string(), c1.clone()],
                ReorderMode::Sequential,
            )
            .await
            .unwrap_err();

        match err {
            AppError::PartialReorder { applied, total, .. } => {
                assert_eq!(applied, 1);
                assert_eq!(total, 3);
            }
            other => panic!("expected partial reorder, got {:?}", other),
        }

        // c3 was renumbered, the rest kept their old positions.
        assert_eq!(position_of(&db, &c3).await, 0);
        assert_eq!(position_of(&db, &c1).await, 0);
        assert_eq!(position_of(&db, &c2).await, 1);
    }

    #[tokio::test]
    async fn test_reorder_is_scoped_to_the_page() {
        let db = test_db().await;
        let page_a = seed_page(&db, "page-a").await;
        let page_b = seed_page(&db, "page-b").await;
        let a1 = add(&db, &page_a, "ct-divider", 0, json!({})).await;
        let b1 = add(&db, &page_b, "ct-divider", 7, json!({})).await;

        let err = ComponentService::new(&db)
            .reorder_components(&page_a, &[a1.clone(), b1.clone()], ReorderMode::Sequential)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::PartialReorder { applied: 1, .. }));
        assert_eq!(position_of(&db, &b1).await, 7);
    }

    #[tokio::test]
    async fn test_transactional_reorder_is_all_or_nothing() {
        let db = test_db().await;
        let page_id = seed_page(&db, "atomic").await;
        let c1 = add(&db, &page_id, "ct-divider", 0, json!({})).await;
        let c2 = add(&db, &page_id, "ct-divider", 1, json!({})).await;
        let c3 = add(&db, &page_id, "ct-divider", 2, json!({})).await;
        let service = ComponentService::new(&db);

        let err = service
            .reorder_components(
                &page_id,
                &[c3.clone(), "missing".to_string(), c1.clone()],
                ReorderMode::Transactional,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(position_of(&db, &c3).await, 2);
        assert_eq!(position_of(&db, &c1).await, 0);

        service
            .reorder_components(
                &page_id,
                &[c2.clone(), c3.clone(), c1.clone()],
                ReorderMode::Transactional,
            )
            .await
            .unwrap();
        assert_eq!(ordered_ids(&db, "atomic").await, vec![c2, c3, c1]);
    }
}
