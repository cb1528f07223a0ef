pub mod component_types;
pub mod components;
pub mod pages;
pub mod site;

use actix_web::web;

pub fn create_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/pages").configure(pages::create_routes))
        .service(web::scope("/components").configure(components::create_routes))
        .service(web::scope("/component-types").configure(component_types::create_routes));
}

#[cfg(test)]
pub(crate) async fn test_app() -> actix_web::App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let state = crate::AppState {
        db: crate::db::test_db().await,
        config: std::sync::Arc::new(crate::config::Config::default()),
    };

    actix_web::App::new()
        .app_data(web::Data::new(state))
        .configure(crate::configure_app)
}
