mod components;
mod view;

pub use view::{PromptRender, UiContext, draw};
