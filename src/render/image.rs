//! Image load lifecycle: a placeholder while the source loads, an inline
//! error if it fails, the picture once it arrives.
//!
//! The browser drives the transitions. [`load_script`] ships the table built
//! from [`ImageLoadState::next`], so the page follows exactly these rules.

use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImageLoadState {
    #[default]
    Loading,
    Error,
    Loaded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageEvent {
    Load,
    Error,
}

impl ImageEvent {
    pub const ALL: [ImageEvent; 2] = [ImageEvent::Load, ImageEvent::Error];

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageEvent::Load => "load",
            ImageEvent::Error => "error",
        }
    }
}

impl ImageLoadState {
    pub const ALL: [ImageLoadState; 3] = [
        ImageLoadState::Loading,
        ImageLoadState::Error,
        ImageLoadState::Loaded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageLoadState::Loading => "loading",
            ImageLoadState::Error => "error",
            ImageLoadState::Loaded => "loaded",
        }
    }

    /// Leaves `Loading` at most once; `Error` and `Loaded` are terminal, so a
    /// failed source never shows as loaded.
    pub fn next(self, event: ImageEvent) -> Option<ImageLoadState> {
        match (self, event) {
            (ImageLoadState::Loading, ImageEvent::Load) => Some(ImageLoadState::Loaded),
            (ImageLoadState::Loading, ImageEvent::Error) => Some(ImageLoadState::Error),
            _ => None,
        }
    }
}

/// `{state: {event: next_state}}` for every allowed transition.
pub fn transition_table() -> Value {
    let mut table = Map::new();
    for state in ImageLoadState::ALL {
        let mut moves = Map::new();
        for event in ImageEvent::ALL {
            if let Some(next) = state.next(event) {
                moves.insert(event.as_str().to_string(), Value::from(next.as_str()));
            }
        }
        table.insert(state.as_str().to_string(), Value::Object(moves));
    }
    Value::Object(table)
}

const LOAD_SCRIPT: &str = "(function(){var T=__TABLE__,E=__ERROR__;\
function settle(e,ev){var i=e.target;if(i.tagName!=='IMG'||!i.classList.contains('lms-image--pending'))return;\
var f=i.closest('figure.lms-image');if(!f)return;var next=(T[f.dataset.state]||{})[ev];if(!next)return;\
f.dataset.state=next;var p=f.querySelector('.lms-image-placeholder');if(p)p.remove();\
if(next==='__LOADED__'){i.classList.remove('lms-image--pending');return;}\
i.remove();var c=f.querySelector('figcaption');if(c)c.remove();f.insertAdjacentHTML('afterbegin',E);}\
document.addEventListener('__LOAD__',function(e){settle(e,'__LOAD__');},true);\
document.addEventListener('__ERROR_EVENT__',function(e){settle(e,'__ERROR_EVENT__');},true);})();";

/// Document script that moves `figure.lms-image` elements through the
/// transition table. Listeners run in the capture phase since load and error
/// events do not bubble. `error_markup` replaces the image on failure.
pub fn load_script(error_markup: &str) -> String {
    let error_markup = Value::from(error_markup).to_string().replace("</", "<\\/");

    LOAD_SCRIPT
        .replace("__TABLE__", &transition_table().to_string())
        .replace("__ERROR__", &error_markup)
        .replace("__LOADED__", ImageLoadState::Loaded.as_str())
        .replace("__LOAD__", ImageEvent::Load.as_str())
        .replace("__ERROR_EVENT__", ImageEvent::Error.as_str())
}
