//! Entity structs for all Kotoba domain objects.
//!
//! Each entity maps to one table in the libSQL database. Relationships are
//! plain foreign-key ids; there are no embedded object graphs or back
//! pointers. The `New*` payloads are what the record store inserts: they
//! serialize to exactly the columns they set.

mod class;
mod content;
mod joins;
mod progress;
mod textbook;
mod user;

pub use class::{Class, NewClass};
pub use content::{Grammar, NewGrammar, NewTopic, NewUsefulLink, NewWord, Topic, UsefulLink, Word};
pub use joins::{ClassGrammar, ClassTopic, ClassUserLesson, ClassWord, NewClassLink};
pub use progress::{NewUserLesson, NewUserTextbook, UserLesson, UserTextbook};
pub use textbook::{Lesson, NewLesson, NewTextbook, Textbook};
pub use user::{NewUser, User};
