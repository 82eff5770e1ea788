mod chat_turn;
mod credential;
mod model_selection;
mod session;
mod test_result;

pub use chat_turn::*;
pub use credential::*;
pub use model_selection::*;
pub use session::*;
pub use test_result::*;
