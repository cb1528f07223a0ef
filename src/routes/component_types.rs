use actix_web::{web, HttpResponse};

use crate::{
    error::{AppError, AppResult},
    services::ComponentService,
    AppState,
};

pub fn create_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("").route(web::get().to(get_component_types)))
        .service(web::resource("/").route(web::get().to(get_component_types)))
        .service(web::resource("/{id}").route(web::get().to(get_component_type_by_id)));
}

/// GET / - The component catalog, by name
async fn get_component_types(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let component_service = ComponentService::new(&state.db);
    let component_types = component_service.get_component_types().await?;

    Ok(HttpResponse::Ok().json(component_types))
}

async fn get_component_type_by_id(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> AppResult<HttpResponse> {
    let component_service = ComponentService::new(&state.db);
    let component_type = component_service
        .get_component_type_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Component type not found".to_string()))?;

    Ok(HttpResponse::Ok().json(component_type))
}
