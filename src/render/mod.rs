pub mod animation;
pub mod components;
pub mod image;
pub mod node;
pub mod page;
pub mod registry;
pub mod view;
