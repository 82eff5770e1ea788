pub mod chat_controller;
pub mod models_controller;
pub mod prompt_test_controller;

pub use chat_controller::ChatController;
pub use models_controller::ModelsController;
pub use prompt_test_controller::PromptTestController;
