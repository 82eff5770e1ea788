mod completion_gateway;
mod model_directory;
mod session_store;

pub use completion_gateway::*;
pub use model_directory::*;
pub use session_store::*;
