mod attachment;
mod author;
mod command;
mod gateway;
mod message;
mod mode;
mod plan;

pub use attachment::*;
pub use author::*;
pub use command::*;
pub use gateway::*;
pub use message::*;
pub use mode::*;
pub use plan::*;
