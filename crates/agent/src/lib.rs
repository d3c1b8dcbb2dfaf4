pub mod dispatcher;
pub mod prompt;
pub mod session;

pub use dispatcher::Dispatcher;
pub use session::Session;
