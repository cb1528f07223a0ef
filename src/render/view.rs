use crate::error::{AppError, AppResult};
use crate::models::page::PageWithComponents;
use crate::render::page::{error_notice, loading_placeholder, not_found_notice, render_page, RenderMode};
use crate::render::node::Node;
use crate::render::registry::ComponentRegistry;

#[derive(Debug, Clone)]
pub enum LoadState {
    Idle,
    Loading { path: String },
    Loaded(Box<PageWithComponents>),
    NotFound { path: String },
    Failed { message: String },
}

/// Identifies one load. Only the ticket from the latest `begin` is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Resolves a path to what should be on screen. A load started for an older
/// path can finish after a newer one; its result is dropped.
#[derive(Debug)]
pub struct PageView {
    generation: u64,
    state: LoadState,
}

impl Default for PageView {
    fn default() -> Self {
        PageView::new()
    }
}

impl PageView {
    pub fn new() -> Self {
        PageView {
            generation: 0,
            state: LoadState::Idle,
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn begin(&mut self, path: &str) -> LoadTicket {
        self.generation += 1;
        self.state = LoadState::Loading {
            path: path.to_string(),
        };
        LoadTicket(self.generation)
    }

    /// Applies a finished load. Returns false when the ticket is stale and
    /// the result was discarded.
    pub fn complete(&mut self, ticket: LoadTicket, result: AppResult<PageWithComponents>) -> bool {
        if ticket.0 != self.generation {
            tracing::debug!("Discarding stale page load {} (current {})", ticket.0, self.generation);
            return false;
        }

        let path = match &self.state {
            LoadState::Loading { path } => path.clone(),
            _ => return false,
        };

        self.state = match result {
            Ok(page) => LoadState::Loaded(Box::new(page)),
            Err(AppError::NotFound(_)) => LoadState::NotFound { path },
            Err(e) => {
                tracing::error!("Loading page '{}' failed: {}", path, e);
                LoadState::Failed {
                    message: "Something went wrong while loading this page.".to_string(),
                }
            }
        };
        true
    }

    pub fn title(&self) -> String {
        match &self.state {
            LoadState::Loaded(page) => page.page.title.clone(),
            LoadState::NotFound { .. } => "Page not found".to_string(),
            LoadState::Failed { .. } => "Error".to_string(),
            LoadState::Idle | LoadState::Loading { .. } => "Loading".to_string(),
        }
    }

    pub fn render(&self, registry: &ComponentRegistry, mode: RenderMode) -> Node {
        match &self.state {
            LoadState::Idle | LoadState::Loading { .. } => loading_placeholder(),
            LoadState::Loaded(page) => render_page(page, registry, mode),
            LoadState::NotFound { path } => not_found_notice(path),
            LoadState::Failed { message } => error_notice(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::page::CustomPageModel;
    use crate::render::registry::global;
    use serde_json::json;

    fn loaded(title: &str, path: &str) -> PageWithComponents {
        PageWithComponents {
            page: CustomPageModel {
                id: format!("id-{}", path),
                title: title.to_string(),
                path: path.to_string(),
                class_id: None,
                config: json!({}),
                created_at: 0,
                updated_at: 0,
            },
            components: vec![],
        }
    }

    #[test]
    fn test_shows_loading_until_complete() {
        let mut view = PageView::new();
        let ticket = view.begin("welcome");
        let node = view.render(global(), RenderMode::View);
        assert!(node.find(|el| el.has_class("lms-loading")).is_some());

        assert!(view.complete(ticket, Ok(loaded("Welcome", "welcome"))));
        assert_eq!(view.title(), "Welcome");
        assert!(view.render(global(), RenderMode::View).find_tag("h1").is_some());
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut view = PageView::new();
        let first = view.begin("old-page");
        let second = view.begin("new-page");

        assert!(view.complete(second, Ok(loaded("New", "new-page"))));
        assert!(!view.complete(first, Ok(loaded("Old", "old-page"))));
        assert_eq!(view.title(), "New");
    }

    #[test]
    fn test_stale_response_does_not_end_current_loading() {
        let mut view = PageView::new();
        let first = view.begin("a");
        let _second = view.begin("b");

        assert!(!view.complete(first, Ok(loaded("A", "a"))));
        assert!(matches!(view.state(), LoadState::Loading { path } if path == "b"));
    }

    #[test]
    fn test_not_found_and_failure_states() {
        let mut view = PageView::new();
        let ticket = view.begin("missing");
        view.complete(ticket, Err(AppError::NotFound("Page not found".to_string())));
        assert!(matches!(view.state(), LoadState::NotFound { path } if path == "missing"));
        let text = view.render(global(), RenderMode::View).text_content();
        assert!(text.contains("/missing"));

        let ticket = view.begin("broken");
        view.complete(ticket, Err(AppError::Internal("disk on fire".to_string())));
        let text = view.render(global(), RenderMode::View).text_content();
        assert!(!text.contains("disk on fire"));
        assert_eq!(view.title(), "Error");
    }

    #[test]
    fn test_ticket_is_single_use() {
        let mut view = PageView::new();
        let ticket = view.begin("a");
        assert!(view.complete(ticket, Ok(loaded("A", "a"))));
        assert!(!view.complete(ticket, Ok(loaded("A2", "a"))));
        assert_eq!(view.title(), "A");
    }
}
