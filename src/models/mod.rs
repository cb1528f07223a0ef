pub mod component;
pub mod component_config;
pub mod page;
