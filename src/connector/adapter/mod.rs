mod in_memory_session_store;
mod mock_completion;
mod openai_client;
mod openai_model_directory;

pub use in_memory_session_store::*;
pub use mock_completion::*;
pub use openai_client::*;
pub use openai_model_directory::*;
