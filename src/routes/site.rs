use actix_web::{http::header, http::StatusCode, web, HttpResponse};
use serde::Deserialize;

use crate::{
    render::{
        page::{render_document, RenderMode},
        registry,
        view::{LoadState, PageView},
    },
    services::PageService,
    AppState,
};

pub fn create_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/p/{path:.*}").route(web::get().to(view_page)));
}

#[derive(Debug, Deserialize)]
struct ViewQuery {
    #[serde(default)]
    edit: bool,
}

/// GET /p/{path} - The page as a full HTML document
async fn view_page(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<ViewQuery>,
) -> HttpResponse {
    let path = path.into_inner();
    let mode = if query.edit {
        RenderMode::Edit
    } else {
        RenderMode::View
    };

    let mut view = PageView::new();
    let ticket = view.begin(&path);
    let result = PageService::new(&state.db).get_page_by_path(&path).await;
    view.complete(ticket, result);

    let status = match view.state() {
        LoadState::Loaded(_) => StatusCode::OK,
        LoadState::NotFound { .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let body = view.render(registry::global(), mode);
    let html = render_document(&view.title(), &state.config.site_name, &body);

    HttpResponse::build(status)
        .insert_header((header::CONTENT_TYPE, "text/html; charset=utf-8"))
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .body(html)
}
