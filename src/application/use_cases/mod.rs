mod interactive_chat;
mod list_models;
mod prompt_testing;

pub use interactive_chat::*;
pub use list_models::*;
pub use prompt_testing::*;
