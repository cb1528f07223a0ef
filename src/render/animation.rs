use crate::models::component_config::Animation;
use crate::render::node::{Element, Node};

/// Entrance transition length for every preset.
pub const DURATION_MS: u32 = 300;

/// Delay added per list item when items animate one after another.
pub const STAGGER_MS: u32 = 100;

/// Marker attribute carried by every transition wrapper.
pub const ANIMATION_ATTR: &str = "data-animation";

/// Start and end states of one entrance transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub keyframes: &'static str,
    pub from: &'static str,
    pub to: &'static str,
}

pub const FADE: Preset = Preset {
    name: "fade",
    keyframes: "lms-fade",
    from: "opacity: 0",
    to: "opacity: 1",
};

pub const SLIDE: Preset = Preset {
    name: "slide",
    keyframes: "lms-slide",
    from: "opacity: 0; transform: translateY(20px)",
    to: "opacity: 1; transform: translateY(0)",
};

pub const ZOOM: Preset = Preset {
    name: "zoom",
    keyframes: "lms-zoom",
    from: "opacity: 0; transform: scale(0.9)",
    to: "opacity: 1; transform: scale(1)",
};

pub fn preset(animation: Animation) -> Option<Preset> {
    match animation {
        Animation::Fade => Some(FADE),
        Animation::Slide => Some(SLIDE),
        Animation::Zoom => Some(ZOOM),
        Animation::None => None,
    }
}

/// Wraps `node` in an entrance transition. `Animation::None` returns the node
/// unchanged.
pub fn wrap(node: Node, animation: Animation) -> Node {
    wrap_delayed(node, animation, 0)
}

pub fn wrap_delayed(node: Node, animation: Animation, delay_ms: u32) -> Node {
    let Some(preset) = preset(animation) else {
        return node;
    };

    Element::new("div")
        .class("lms-animate")
        .attr(ANIMATION_ATTR, preset.name)
        .attr("data-duration", DURATION_MS.to_string())
        .style(&format!(
            "animation: {} {}ms ease-out {}ms 1 both",
            preset.keyframes, DURATION_MS, delay_ms
        ))
        .child(node)
        .into()
}

/// Puts the transition on `element` itself instead of a wrapper, for children
/// that must stay direct descendants (list items).
pub fn apply(mut element: Element, animation: Animation, delay_ms: u32) -> Element {
    if let Some(preset) = preset(animation) {
        element.set_attr(ANIMATION_ATTR, preset.name);
        element.add_style(&format!(
            "animation: {} {}ms ease-out {}ms 1 both",
            preset.keyframes, DURATION_MS, delay_ms
        ));
    }
    element
}

/// Start delay of the `index`-th item in a staggered run. Saturates instead
/// of wrapping for very long lists.
pub fn stagger_delay(index: usize) -> u32 {
    u32::try_from(index)
        .unwrap_or(u32::MAX)
        .saturating_mul(STAGGER_MS)
}

/// Keyframes for all presets, emitted once per document.
pub fn stylesheet() -> String {
    [FADE, SLIDE, ZOOM]
        .iter()
        .map(|p| format!("@keyframes {} {{ from {{ {} }} to {{ {} }} }}", p.keyframes, p.from, p.to))
        .collect::<Vec<_>>()
        .join("\n")
}

/// True when any element in the subtree is a transition wrapper.
#[cfg(test)]
pub fn is_animated(node: &Node) -> bool {
    node.find(|el| el.get_attr(ANIMATION_ATTR).is_some()).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn para() -> Node {
        Element::new("p").text("hello").into()
    }

    #[test]
    fn test_none_returns_node_untouched() {
        let wrapped = wrap(para(), Animation::None);
        assert_eq!(wrapped, para());
        assert!(!is_animated(&wrapped));
    }

    #[test]
    fn test_presets_wrap_with_fixed_duration() {
        for (animation, name) in [
            (Animation::Fade, "fade"),
            (Animation::Slide, "slide"),
            (Animation::Zoom, "zoom"),
        ] {
            let wrapped = wrap(para(), animation);
            let wrapper = wrapped.as_element().unwrap();
            assert_eq!(wrapper.get_attr(ANIMATION_ATTR), Some(name));
            assert_eq!(wrapper.get_attr("data-duration"), Some("300"));
            assert!(wrapper.get_attr("style").unwrap().contains(" 1 both"));
            assert_eq!(wrapper.children[0], para());
        }
    }

    #[test]
    fn test_delay_is_applied() {
        let wrapped = wrap_delayed(para(), Animation::Fade, 200);
        let style = wrapped.as_element().unwrap().get_attr("style").unwrap();
        assert!(style.contains("300ms ease-out 200ms"));
    }

    #[test]
    fn test_apply_on_element() {
        let li = apply(Element::new("li").text("a"), Animation::Slide, 100);
        assert_eq!(li.get_attr(ANIMATION_ATTR), Some("slide"));
        assert!(li.get_attr("style").unwrap().contains("100ms 1 both"));

        let plain = apply(Element::new("li").text("a"), Animation::None, 100);
        assert!(plain.get_attr(ANIMATION_ATTR).is_none());
        assert!(plain.get_attr("style").is_none());
    }

    #[test]
    fn test_stagger_delay_saturates() {
        assert_eq!(stagger_delay(0), 0);
        assert_eq!(stagger_delay(3), 300);
        assert_eq!(stagger_delay(50_000_000), u32::MAX);
        assert_eq!(stagger_delay(usize::MAX), u32::MAX);
    }

    #[test]
    fn test_stylesheet_defines_every_preset() {
        let css = stylesheet();
        assert!(css.contains("@keyframes lms-fade { from { opacity: 0 } to { opacity: 1 } }"));
        assert!(css.contains("translateY(20px)"));
        assert!(css.contains("scale(0.9)"));
    }
}
