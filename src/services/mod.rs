pub mod component;
pub mod page;

pub use component::ComponentService;
pub use page::PageService;
