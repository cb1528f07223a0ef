use actix_web::{web, HttpResponse};

use crate::{
    error::{AppError, AppResult},
    models::component::{PageComponentForm, PageComponentModel, PageComponentUpdateForm},
    services::ComponentService,
    AppState,
};

pub fn create_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/create").route(web::post().to(create_new_component)))
        .service(web::resource("/{id}").route(web::get().to(get_component_by_id)))
        .service(web::resource("/{id}/update").route(web::post().to(update_component_by_id)))
        .service(web::resource("/{id}/delete").route(web::delete().to(delete_component_by_id)));
}

async fn create_new_component(
    state: web::Data<AppState>,
    form_data: web::Json<PageComponentForm>,
) -> AppResult<HttpResponse> {
    let component_service = ComponentService::new(&state.db);
    let component = component_service.insert_new_component(&form_data).await?;

    Ok(HttpResponse::Ok().json(PageComponentModel::from(component)))
}

async fn get_component_by_id(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> AppResult<HttpResponse> {
    let component_service = ComponentService::new(&state.db);
    let component = component_service
        .get_component_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Component not found".to_string()))?;

    Ok(HttpResponse::Ok().json(PageComponentModel::from(component)))
}

/// POST /{id}/update - A supplied config replaces the stored one
async fn update_component_by_id(
    state: web::Data<AppState>,
    id: web::Path<String>,
    form_data: web::Json<PageComponentUpdateForm>,
) -> AppResult<HttpResponse> {
    let component_service = ComponentService::new(&state.db);
    let component = component_service
        .update_component_by_id(&id, &form_data)
        .await?;

    Ok(HttpResponse::Ok().json(PageComponentModel::from(component)))
}

async fn delete_component_by_id(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> AppResult<HttpResponse> {
    let component_service = ComponentService::new(&state.db);
    component_service.delete_component_by_id(&id).await?;

    Ok(HttpResponse::Ok().json(true))
}
