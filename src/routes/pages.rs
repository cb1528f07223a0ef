use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{
        component::ReorderForm,
        page::{CustomPageForm, CustomPageModel, CustomPageUpdateForm},
    },
    services::{ComponentService, PageService},
    AppState,
};

pub fn create_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("").route(web::get().to(get_pages)))
        .service(web::resource("/").route(web::get().to(get_pages)))
        .service(web::resource("/create").route(web::post().to(create_new_page)))
        .service(web::resource("/by-path/{path:.*}").route(web::get().to(get_page_by_path)))
        .service(web::resource("/{id}").route(web::get().to(get_page_by_id)))
        .service(web::resource("/{id}/update").route(web::post().to(update_page_by_id)))
        .service(web::resource("/{id}/delete").route(web::delete().to(delete_page_by_id)))
        .service(web::resource("/{id}/components").route(web::get().to(get_page_components)))
        .service(
            web::resource("/{id}/components/reorder")
                .route(web::post().to(reorder_page_components)),
        );
}

#[derive(Debug, Deserialize)]
struct PageListQuery {
    class_id: Option<String>,
}

/// GET / - All pages, or those visible to one class
async fn get_pages(
    state: web::Data<AppState>,
    query: web::Query<PageListQuery>,
) -> AppResult<HttpResponse> {
    let page_service = PageService::new(&state.db);

    let pages = match query.class_id.as_deref() {
        Some(class_id) if !class_id.is_empty() => page_service.get_pages_for_class(class_id).await?,
        _ => page_service.get_custom_pages().await?,
    };

    let pages: Vec<CustomPageModel> = pages.into_iter().map(CustomPageModel::from).collect();
    Ok(HttpResponse::Ok().json(pages))
}

/// POST /create
async fn create_new_page(
    state: web::Data<AppState>,
    form_data: web::Json<CustomPageForm>,
) -> AppResult<HttpResponse> {
    let page_service = PageService::new(&state.db);
    let page = page_service.insert_new_page(&form_data).await?;

    Ok(HttpResponse::Ok().json(CustomPageModel::from(page)))
}

/// GET /by-path/{path} - Page with its components in render order
async fn get_page_by_path(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let page_service = PageService::new(&state.db);
    let page = page_service.get_page_by_path(&path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(page))
}

async fn get_page_by_id(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> AppResult<HttpResponse> {
    let page_service = PageService::new(&state.db);
    let page = page_service
        .get_page_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Page not found".to_string()))?;

    Ok(HttpResponse::Ok().json(CustomPageModel::from(page)))
}

async fn update_page_by_id(
    state: web::Data<AppState>,
    id: web::Path<String>,
    form_data: web::Json<CustomPageUpdateForm>,
) -> AppResult<HttpResponse> {
    let page_service = PageService::new(&state.db);
    let page = page_service.update_page_by_id(&id, &form_data).await?;

    Ok(HttpResponse::Ok().json(CustomPageModel::from(page)))
}

async fn delete_page_by_id(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> AppResult<HttpResponse> {
    let page_service = PageService::new(&state.db);
    page_service.delete_page_by_id(&id).await?;

    Ok(HttpResponse::Ok().json(true))
}

async fn get_page_components(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> AppResult<HttpResponse> {
    let component_service = ComponentService::new(&state.db);
    let components = component_service.get_components_by_page(&id).await?;

    Ok(HttpResponse::Ok().json(components))
}

/// POST /{id}/components/reorder - Positions follow the order of `component_ids`
async fn reorder_page_components(
    state: web::Data<AppState>,
    id: web::Path<String>,
    form_data: web::Json<ReorderForm>,
) -> AppResult<HttpResponse> {
    let component_service = ComponentService::new(&state.db);
    component_service
        .reorder_components(&id, &form_data.component_ids, state.config.reorder_mode)
        .await?;

    let components = component_service.get_components_by_page(&id).await?;
    Ok(HttpResponse::Ok().json(components))
}
