mod command_error;
mod session;

pub use command_error::CommandError;
pub use session::Session;
