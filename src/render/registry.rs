use once_cell::sync::Lazy;
use serde_json::Value;
use std::collections::HashMap;

use crate::error::{AppError, AppResult};
use crate::models::component_config::ComponentConfig;
use crate::render::animation;
use crate::render::components::{
    render_button, render_card, render_divider, render_file, render_grid, render_heading,
    render_image, render_list, render_paragraph, render_quote, render_table, render_video,
};
use crate::render::node::Node;

/// Returns `None` when handed a config of another kind.
pub type Renderer = fn(&ComponentConfig) -> Option<Node>;

macro_rules! renderer {
    ($variant:ident, $render:path) => {
        |config: &ComponentConfig| match config {
            ComponentConfig::$variant(c) => Some($render(c)),
            _ => None,
        }
    };
}

static GLOBAL: Lazy<ComponentRegistry> = Lazy::new(ComponentRegistry::with_builtin);

/// Process-wide registry with every built-in kind. Built on first use.
pub fn global() -> &'static ComponentRegistry {
    &GLOBAL
}

pub struct ComponentRegistry {
    renderers: HashMap<&'static str, Renderer>,
}

impl ComponentRegistry {
    pub fn empty() -> Self {
        ComponentRegistry {
            renderers: HashMap::new(),
        }
    }

    pub fn with_builtin() -> Self {
        let mut registry = Self::empty();
        registry.register("heading", renderer!(Heading, render_heading));
        registry.register("paragraph", renderer!(Paragraph, render_paragraph));
        registry.register("image", renderer!(Image, render_image));
        registry.register("card", renderer!(Card, render_card));
        registry.register("grid", renderer!(Grid, render_grid));
        registry.register("divider", renderer!(Divider, render_divider));
        registry.register("button", renderer!(Button, render_button));
        registry.register("list", renderer!(List, render_list));
        registry.register("quote", renderer!(Quote, render_quote));
        registry.register("video", renderer!(Video, render_video));
        registry.register("table", renderer!(Table, render_table));
        registry.register("file", renderer!(File, render_file));
        registry
    }

    pub fn register(&mut self, tag: &'static str, renderer: Renderer) {
        self.renderers.insert(tag, renderer);
    }

    pub fn is_registered(&self, tag: &str) -> bool {
        self.renderers.contains_key(tag)
    }

    pub fn tags(&self) -> Vec<&'static str> {
        let mut tags: Vec<&'static str> = self.renderers.keys().copied().collect();
        tags.sort_unstable();
        tags
    }

    /// Renders a stored block: resolves the renderer for `tag`, parses the
    /// payload as that kind and applies the entrance transition.
    pub fn render(&self, tag: &str, config: &Value) -> AppResult<Node> {
        if !self.is_registered(tag) {
            return Err(AppError::UnsupportedComponent(tag.to_string()));
        }
        let config = ComponentConfig::from_parts(tag, config)?;
        self.render_config_as(tag, &config)
    }

    fn render_config_as(&self, tag: &str, config: &ComponentConfig) -> AppResult<Node> {
        let renderer = self
            .renderers
            .get(tag)
            .ok_or_else(|| AppError::UnsupportedComponent(tag.to_string()))?;

        let node = renderer(config).ok_or_else(|| {
            AppError::InvalidConfig(format!(
                "renderer for '{}' received a {} config",
                tag,
                config.tag()
            ))
        })?;

        Ok(animation::wrap(node, config.common().animation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_every_kind_is_registered() {
        let registry = global();
        assert_eq!(registry.tags().len(), ComponentConfig::TAGS.len());
        for tag in ComponentConfig::TAGS {
            assert!(registry.is_registered(tag), "{} missing", tag);
        }
    }

    #[test]
    fn test_unknown_tag_is_a_configuration_error() {
        let err = global().render("carousel", &json!({})).unwrap_err();
        assert!(matches!(err, AppError::UnsupportedComponent(ref t) if t == "carousel"));

        let err = ComponentRegistry::empty()
            .render("heading", &json!({"text": "x"}))
            .unwrap_err();
        assert!(matches!(err, AppError::UnsupportedComponent(_)));
    }

    #[test]
    fn test_malformed_payload_is_rejected_at_dispatch() {
        let err = global().render("paragraph", &json!({"align": "left"})).unwrap_err();
        assert!(matches!(err, AppError::InvalidConfig(_)));
    }

    #[test]
    fn test_wrong_variant_for_renderer_is_rejected() {
        let mut registry = ComponentRegistry::empty();
        registry.register("heading", renderer!(List, render_list));

        let config = ComponentConfig::from_parts("heading", &json!({"text": "x"})).unwrap();
        let err = registry.render_config_as("heading", &config).unwrap_err();
        assert!(matches!(err, AppError::InvalidConfig(_)));
    }

    #[test]
    fn test_heading_level_nine_renders_as_valid_heading() {
        let node = global()
            .render("heading", &json!({"text": "Field Day", "level": 9}))
            .unwrap();
        let heading = node.find(|el| el.tag.starts_with('h') && el.tag.len() == 2).unwrap();
        assert_eq!(heading.tag, "h2");
    }

    #[test]
    fn test_default_animation_wraps_in_fade() {
        let node = global().render("divider", &json!({})).unwrap();
        let wrapper = node.as_element().unwrap();
        assert_eq!(wrapper.get_attr(animation::ANIMATION_ATTR), Some("fade"));
    }

    #[test]
    fn test_animation_none_renders_without_transition() {
        for (tag, config) in [
            ("heading", json!({"text": "t", "animation": "none"})),
            ("paragraph", json!({"text": "t", "animation": "none"})),
            ("list", json!({"items": ["a", "b"], "animation": "none"})),
            ("card", json!({"title": "c", "animation": "none"})),
            ("image", json!({"src": "/a.png", "animation": "none"})),
        ] {
            let node = global().render(tag, &config).unwrap();
            assert!(!animation::is_animated(&node), "{} was animated", tag);
        }
    }
}
