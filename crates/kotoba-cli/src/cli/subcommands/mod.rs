mod class;
mod content;
mod link;
mod progress;
mod textbook;
mod user;

pub use class::{ClassCommands, Material, MaterialArgs};
pub use content::{GrammarCommands, TopicCommands, WordCommands};
pub use link::{LinkCommands, LinkTargetArgs};
pub use progress::ProgressCommands;
pub use textbook::{LessonCommands, TextbookCommands};
pub use user::{UserCommands, UserRegisterArgs};
