//! One pure renderer per component kind.
//!
//! Each renderer maps its config to a node whose root carries the author's
//! class name and style overrides. Entrance transitions are added by the
//! caller ([`render_component`] or the registry), except for list items which
//! animate individually.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::models::component_config::{
    Alignment, Block, ButtonConfig, CardConfig, CommonProps, ComponentConfig, DividerConfig,
    DividerVariant, FileConfig, GridConfig, HeadingConfig, ImageConfig, ListConfig, ListStyle,
    ParagraphConfig, QuoteConfig, TableConfig, TextAlign, VideoConfig,
};
use crate::render::animation;
use crate::render::image::ImageLoadState;
use crate::render::node::{Element, Node};
use crate::utils::misc::{css_property_name, safe_url};

const UNITLESS_PROPERTIES: [&str; 7] = [
    "opacity",
    "z-index",
    "font-weight",
    "line-height",
    "flex",
    "order",
    "zoom",
];

/// Drops characters that could end a declaration or break out of the attribute.
pub(crate) fn css_value(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, ';' | '{' | '}' | '<' | '>' | '"' | '\\'))
        .collect::<String>()
        .trim()
        .to_string()
}

fn style_declaration(property: &str, value: &Value) -> Option<String> {
    let property = css_property_name(property);
    if property.is_empty() || !property.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return None;
    }

    let value = match value {
        Value::String(s) => css_value(s),
        Value::Number(n) if UNITLESS_PROPERTIES.contains(&property.as_str()) => n.to_string(),
        Value::Number(n) => format!("{}px", n),
        _ => return None,
    };

    if value.is_empty() {
        None
    } else {
        Some(format!("{}: {}", property, value))
    }
}

/// Applies the shared class name and inline style overrides to a root element.
pub fn apply_common(mut element: Element, common: &CommonProps) -> Element {
    if let Some(class_name) = &common.class_name {
        element.add_class(class_name);
    }
    let declarations: Vec<String> = common
        .style
        .iter()
        .filter_map(|(property, value)| style_declaration(property, value))
        .collect();
    if !declarations.is_empty() {
        element.add_style(&declarations.join("; "));
    }
    element
}

fn alignment_css(align: Alignment) -> &'static str {
    match align {
        Alignment::Left => "left",
        Alignment::Center => "center",
        Alignment::Right => "right",
    }
}

fn text_align_css(align: TextAlign) -> &'static str {
    match align {
        TextAlign::Left => "left",
        TextAlign::Center => "center",
        TextAlign::Right => "right",
        TextAlign::Justify => "justify",
    }
}

/// `h1`..`h6`; anything outside 1-6 renders as `h2`.
pub fn heading_tag(level: i64) -> &'static str {
    match level {
        1 => "h1",
        2 => "h2",
        3 => "h3",
        4 => "h4",
        5 => "h5",
        6 => "h6",
        _ => "h2",
    }
}

pub fn render_heading(config: &HeadingConfig) -> Node {
    let element = Element::new(heading_tag(config.level))
        .class("lms-heading")
        .style(&format!("text-align: {}", alignment_css(config.align)))
        .text(config.text.clone());
    apply_common(element, &config.common).into()
}

/// Splits on newline markers and joins the lines with `<br>`.
fn text_with_breaks(text: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            nodes.push(Element::new("br").into());
        }
        let line = line.strip_suffix('\r').unwrap_or(line);
        if !line.is_empty() {
            nodes.push(Node::text(line));
        }
    }
    nodes
}

pub fn render_paragraph(config: &ParagraphConfig) -> Node {
    let element = Element::new("p")
        .class("lms-paragraph")
        .style(&format!("text-align: {}", text_align_css(config.align)))
        .children(text_with_breaks(&config.text));
    apply_common(element, &config.common).into()
}

/// Server output starts every image in its initial load state; the page
/// script advances it on the element's load or error event.
pub fn render_image(config: &ImageConfig) -> Node {
    render_image_in_state(config, ImageLoadState::default())
}

/// Shown in place of an image whose source failed to load.
pub fn image_error_indicator() -> Element {
    Element::new("div")
        .class("lms-image-error")
        .attr("role", "alert")
        .text("Image failed to load")
}

pub fn render_image_in_state(config: &ImageConfig, state: ImageLoadState) -> Node {
    let mut figure = Element::new("figure")
        .class("lms-image")
        .attr("data-state", state.as_str())
        .style(&format!("text-align: {}", alignment_css(config.align)));

    let mut img = Element::new("img")
        .attr("src", safe_url(&config.src))
        .attr("alt", config.alt.clone())
        .attr("loading", "lazy");
    if let Some(width) = &config.width {
        img.add_style(&format!("width: {}", width.to_css()));
    }
    if let Some(height) = &config.height {
        img.add_style(&format!("height: {}", height.to_css()));
    }

    match state {
        ImageLoadState::Loading => {
            figure = figure
                .child(
                    Element::new("div")
                        .class("lms-image-placeholder")
                        .attr("aria-busy", "true"),
                )
                .child(img.class("lms-image--pending"));
        }
        ImageLoadState::Error => {
            figure = figure.child(image_error_indicator());
        }
        ImageLoadState::Loaded => {
            figure = figure.child(img);
        }
    }

    if let Some(caption) = &config.caption {
        if state != ImageLoadState::Error {
            figure = figure.child(Element::new("figcaption").text(caption.clone()));
        }
    }

    apply_common(figure, &config.common).into()
}

/// Text becomes a paragraph; a nested block goes through [`render_component`].
pub fn render_block(block: &Block) -> Node {
    match block {
        Block::Text(text) if text.is_empty() => Node::Fragment(Vec::new()),
        Block::Text(text) => Element::new("p").children(text_with_breaks(text)).into(),
        Block::Component(config) => {
            animation::wrap(render_component(config), config.common().animation)
        }
    }
}

pub fn render_card(config: &CardConfig) -> Node {
    let mut card = Element::new("div").class("lms-card lms-card--hoverable");

    if let Some(image) = &config.image {
        card = card.child(render_image(image));
    }
    if let Some(title) = &config.title {
        card = card.child(Element::new("h3").class("lms-card-title").text(title.clone()));
    }
    card = card.child(
        Element::new("div")
            .class("lms-card-content")
            .child(render_block(&config.content)),
    );

    apply_common(card, &config.common).into()
}

pub fn render_grid(config: &GridConfig) -> Node {
    let columns = config.columns.clamp(1, 12);
    let grid = Element::new("div")
        .class("lms-grid")
        .attr("data-columns", columns.to_string())
        .style(&format!(
            "display: grid; grid-template-columns: repeat({}, minmax(0, 1fr)); gap: 1rem",
            columns
        ))
        .children(
            config
                .items
                .iter()
                .map(|item| Element::new("div").class("lms-grid-item").child(render_block(item))),
        );
    apply_common(grid, &config.common).into()
}

pub fn render_divider(config: &DividerConfig) -> Node {
    let line = match config.variant {
        DividerVariant::Solid => "solid",
        DividerVariant::Dashed => "dashed",
        DividerVariant::Dotted => "dotted",
    };
    let color = config
        .color
        .as_deref()
        .map(css_value)
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| "currentColor".to_string());

    let hr = Element::new("hr").class("lms-divider").style(&format!(
        "border: none; border-top: {}px {} {}",
        config.thickness.max(1),
        line,
        color
    ));
    apply_common(hr, &config.common).into()
}

pub fn render_button(config: &ButtonConfig) -> Node {
    let variant = serde_json::to_value(config.variant)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_else(|| "primary".to_string());

    let mut button = match &config.href {
        Some(href) if !config.disabled => Element::new("a")
            .attr("href", safe_url(href))
            .attr("role", "button"),
        _ => Element::new("button").attr("type", "button"),
    };
    button = button
        .class("lms-button")
        .class(&format!("lms-button--{}", variant))
        .attr_if(config.disabled, "disabled", "disabled")
        .attr_if(config.disabled, "aria-disabled", "true");

    if config.loading {
        button = button
            .attr("aria-busy", "true")
            .child(Element::new("span").class("lms-spinner").attr("aria-hidden", "true"));
    } else if let Some(icon) = &config.icon {
        button = button.child(
            Element::new("span")
                .class("lms-icon")
                .attr("data-icon", icon.clone())
                .attr("aria-hidden", "true"),
        );
    }
    button = button.child(Element::new("span").text(config.text.clone()));

    apply_common(button, &config.common).into()
}

/// Items enter one after another, [`animation::STAGGER_MS`] apart, in
/// document order.
pub fn render_list(config: &ListConfig) -> Node {
    let tag = match config.list_style {
        ListStyle::Ordered => "ol",
        ListStyle::Unordered => "ul",
    };
    let items = config.items.iter().enumerate().map(|(i, item)| {
        animation::apply(
            Element::new("li").text(item.clone()),
            config.common.animation,
            animation::stagger_delay(i),
        )
    });
    let list = Element::new(tag).class("lms-list").children(items);
    apply_common(list, &config.common).into()
}

pub fn render_quote(config: &QuoteConfig) -> Node {
    let variant = serde_json::to_value(config.variant)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_else(|| "default".to_string());

    let mut quote = Element::new("blockquote")
        .class("lms-quote")
        .class(&format!("lms-quote--{}", variant))
        .child(Element::new("p").children(text_with_breaks(&config.text)));
    if let Some(citation) = &config.citation {
        quote = quote.child(
            Element::new("footer").child(Element::new("cite").text(citation.clone())),
        );
    }
    apply_common(quote, &config.common).into()
}

/// Watch, short and embed URLs on the YouTube hosts only.
static YOUTUBE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^https?://(?:(?:www|m)\.)?(?:youtube\.com/(?:watch\?(?:[^#]*&)?v=|embed/)|youtu\.be/)([A-Za-z0-9_-]+)",
    )
    .expect("YouTube URL pattern is valid")
});

/// YouTube id from a watch, short or embed URL.
fn youtube_id(url: &str) -> Option<&str> {
    YOUTUBE_URL
        .captures(url.trim())
        .and_then(|caps| caps.get(1))
        .map(|id| id.as_str())
}

pub fn render_video(config: &VideoConfig) -> Node {
    let player = match youtube_id(&config.url) {
        Some(id) => {
            let autoplay = if config.autoplay { 1 } else { 0 };
            let controls = if config.controls { 1 } else { 0 };
            Element::new("iframe")
                .attr(
                    "src",
                    format!(
                        "https://www.youtube.com/embed/{}?autoplay={}&controls={}",
                        id, autoplay, controls
                    ),
                )
                .attr("allow", "autoplay; encrypted-media; picture-in-picture")
                .attr("allowfullscreen", "allowfullscreen")
                .attr("title", "Embedded video")
        }
        None => Element::new("video")
            .attr("src", safe_url(&config.url))
            .attr("preload", "metadata")
            .attr_if(config.controls, "controls", "controls")
            .attr_if(config.autoplay, "autoplay", "autoplay")
            .attr_if(config.autoplay, "muted", "muted")
            .attr_if(config.autoplay, "playsinline", "playsinline"),
    };

    let wrapper = Element::new("div").class("lms-video").child(player);
    apply_common(wrapper, &config.common).into()
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn render_table(config: &TableConfig) -> Node {
    let mut table = Element::new("table")
        .class("lms-table")
        .attr_if(config.striped, "data-striped", "true")
        .attr_if(config.bordered, "data-bordered", "true");
    if config.striped {
        table.add_class("lms-table--striped");
    }
    if config.bordered {
        table.add_class("lms-table--bordered");
    }

    if !config.headers.is_empty() {
        table = table.child(
            Element::new("thead").child(
                Element::new("tr").children(
                    config
                        .headers
                        .iter()
                        .map(|h| Element::new("th").attr("scope", "col").text(h.clone())),
                ),
            ),
        );
    }

    let body = Element::new("tbody").children(config.rows.iter().map(|row| {
        Element::new("tr").children(row.iter().map(|cell| Element::new("td").text(cell_text(cell))))
    }));
    table = table.child(body);

    let wrapper = Element::new("div").class("lms-table-wrapper").child(table);
    apply_common(wrapper, &config.common).into()
}

/// Human-readable byte size, e.g. `1.5 MB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut size = bytes as f64 / 1024.0;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", size, UNITS[unit])
}

fn file_icon(config: &FileConfig) -> String {
    if let Some(icon) = &config.icon {
        return icon.clone();
    }
    let mime = config.file_type.as_deref().unwrap_or_default();
    let icon = if mime.starts_with("image/") {
        "file-image"
    } else if mime.starts_with("video/") {
        "file-video"
    } else if mime.starts_with("audio/") {
        "file-audio"
    } else if mime == "application/pdf" {
        "file-pdf"
    } else {
        "file"
    };
    icon.to_string()
}

pub fn render_file(config: &FileConfig) -> Node {
    let mut link = Element::new("a")
        .class("lms-file")
        .attr("href", safe_url(&config.url))
        .attr("download", config.name.clone())
        .child(
            Element::new("span")
                .class("lms-icon")
                .attr("data-icon", file_icon(config))
                .attr("aria-hidden", "true"),
        )
        .child(Element::new("span").class("lms-file-name").text(config.name.clone()));
    if let Some(size) = config.size {
        link = link.child(
            Element::new("span")
                .class("lms-file-size")
                .text(format_file_size(size)),
        );
    }
    apply_common(link, &config.common).into()
}

/// Exhaustive dispatch over the closed config enum. No transition wrapper.
pub fn render_component(config: &ComponentConfig) -> Node {
    match config {
        ComponentConfig::Heading(c) => render_heading(c),
        ComponentConfig::Paragraph(c) => render_paragraph(c),
        ComponentConfig::Image(c) => render_image(c),
        ComponentConfig::Card(c) => render_card(c),
        ComponentConfig::Grid(c) => render_grid(c),
        ComponentConfig::Divider(c) => render_divider(c),
        ComponentConfig::Button(c) => render_button(c),
        ComponentConfig::List(c) => render_list(c),
        ComponentConfig::Quote(c) => render_quote(c),
        ComponentConfig::Video(c) => render_video(c),
        ComponentConfig::Table(c) => render_table(c),
        ComponentConfig::File(c) => render_file(c),
    }
}
