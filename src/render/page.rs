//! Composes a loaded page into HTML.

use crate::error::AppError;
use crate::models::component::PageComponentModel;
use crate::models::page::PageWithComponents;
use crate::render::animation;
use crate::render::components::{css_value, image_error_indicator};
use crate::render::image;
use crate::render::node::{Element, Node};
use crate::render::registry::ComponentRegistry;
use crate::utils::misc::safe_url;
use crate::utils::time::format_date;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    View,
    /// Blocks carry their id and position for the authoring UI, and dispatch
    /// failures show their reason.
    Edit,
}

const BASE_STYLES: &str = "body{margin:0;font-family:system-ui,sans-serif;line-height:1.6}\
.lms-page{margin:0 auto;padding:0 1rem 3rem}\
.lms-layout--standard .lms-page-content{max-width:48rem;margin:0 auto}\
.lms-layout--wide .lms-page-content{max-width:72rem;margin:0 auto}\
.lms-layout--full .lms-page-content{max-width:none}\
.lms-layout--sidebar .lms-page-content{display:grid;grid-template-columns:16rem 1fr;gap:2rem}\
.lms-layout--two-column .lms-page-content{display:grid;grid-template-columns:1fr 1fr;gap:2rem}\
.lms-page-header{padding:2rem 0;background-size:cover;background-position:center}\
.lms-card{border-radius:8px;padding:1rem;box-shadow:0 1px 3px rgba(0,0,0,.12);transition:transform .2s,box-shadow .2s}\
.lms-card--hoverable:hover{transform:translateY(-4px);box-shadow:0 8px 20px rgba(0,0,0,.15)}\
.lms-image-placeholder{min-height:8rem;background:#e5e7eb;border-radius:4px}\
.lms-image--pending{position:absolute;opacity:0;pointer-events:none}\
.lms-image-error{padding:1rem;color:#b91c1c;background:#fee2e2;border-radius:4px}\
.lms-table--striped tbody tr:nth-child(even){background:#f3f4f6}\
.lms-table--bordered td,.lms-table--bordered th{border:1px solid #d1d5db}\
.lms-unsupported{padding:1rem;border:2px dashed #f59e0b;color:#92400e;border-radius:4px}\
.lms-editable{outline:1px dashed #9ca3af;margin:.5rem 0}\
.lms-loading{padding:3rem;text-align:center;color:#6b7280}";

/// Visible stand-in for a block that could not be dispatched.
pub fn unsupported_placeholder(tag: &str, reason: Option<&str>) -> Node {
    let mut placeholder = Element::new("div")
        .class("lms-unsupported")
        .attr("role", "note")
        .attr("data-component-type", tag)
        .text(format!("Unsupported component: {}", tag));
    if let Some(reason) = reason {
        placeholder = placeholder.child(Element::new("small").text(reason.to_string()));
    }
    placeholder.into()
}

pub fn render_page_component(
    registry: &ComponentRegistry,
    component: &PageComponentModel,
    mode: RenderMode,
) -> Node {
    let tag = component
        .type_name()
        .unwrap_or(component.component_type_id.as_str());

    let rendered = match component.type_name() {
        Some(tag) => registry.render(tag, &component.config),
        None => Err(AppError::UnsupportedComponent(component.component_type_id.clone())),
    };

    let node = match rendered {
        Ok(node) => node,
        Err(e) => {
            tracing::warn!("Component {} on page {} not rendered: {}", component.id, component.page_id, e);
            let reason = e.to_string();
            unsupported_placeholder(tag, (mode == RenderMode::Edit).then_some(reason.as_str()))
        }
    };

    match mode {
        RenderMode::View => node,
        RenderMode::Edit => Element::new("div")
            .class("lms-editable")
            .attr("data-component-id", component.id.clone())
            .attr("data-component-type", tag)
            .attr("data-position", component.position.to_string())
            .child(node)
            .into(),
    }
}

/// The page body: header, then every component in the order given.
pub fn render_page(page: &PageWithComponents, registry: &ComponentRegistry, mode: RenderMode) -> Node {
    let config = page.page.page_config();

    let mut main = Element::new("main")
        .class("lms-page")
        .class(&format!("lms-layout--{}", config.layout.as_str()))
        .attr("data-page-id", page.page.id.clone())
        .attr("data-theme", css_value(&config.theme));
    if let Some(color) = config.background_color.as_deref().map(css_value) {
        main.add_style(&format!("background-color: {}", color));
    }
    if let Some(color) = config.text_color.as_deref().map(css_value) {
        main.add_style(&format!("color: {}", color));
    }

    let mut header = Element::new("header").class("lms-page-header");
    if let Some(image) = &config.header_image {
        header.add_style(&format!(
            "background-image: url('{}')",
            css_value(safe_url(image)).replace('\'', "")
        ));
    }
    header = header.child(Element::new("h1").text(page.page.title.clone()));

    let content = Element::new("div").class("lms-page-content").children(
        page.components
            .iter()
            .map(|component| render_page_component(registry, component, mode)),
    );

    let mut main = main.child(header).child(content);
    if page.page.updated_at > 0 {
        let date = format_date(page.page.updated_at);
        main = main.child(
            Element::new("footer")
                .class("lms-page-footer")
                .text("Last updated ")
                .child(Element::new("time").attr("datetime", date.clone()).text(date)),
        );
    }
    main.into()
}

pub fn loading_placeholder() -> Node {
    Element::new("div")
        .class("lms-loading")
        .attr("aria-busy", "true")
        .text("Loading page…")
        .into()
}

pub fn not_found_notice(path: &str) -> Node {
    Element::new("main")
        .class("lms-page lms-not-found")
        .child(Element::new("h1").text("Page not found"))
        .child(Element::new("p").text(format!("There is no page at /{}.", path)))
        .into()
}

pub fn error_notice(message: &str) -> Node {
    Element::new("main")
        .class("lms-page lms-error")
        .attr("role", "alert")
        .child(Element::new("h1").text("This page could not be loaded"))
        .child(Element::new("p").text(message.to_string()))
        .into()
}

/// Full HTML document around a rendered body.
pub fn render_document(title: &str, site_name: &str, body: &Node) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>{} | {}</title><style>{}\n{}</style><script>{}</script></head>\
         <body>{}</body></html>",
        html_escape::encode_text(title),
        html_escape::encode_text(site_name),
        BASE_STYLES,
        animation::stylesheet(),
        image::load_script(&Node::from(image_error_indicator()).to_html()),
        body.to_html()
    )
}
