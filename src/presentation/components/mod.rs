mod fields;
mod footer;
mod prompt;

pub use fields::render_fields;
pub use footer::render_footer;
pub use prompt::render_prompt;
