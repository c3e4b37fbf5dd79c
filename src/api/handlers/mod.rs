mod chat;
mod root;
mod universities;

pub use chat::*;
pub use root::*;
pub use universities::*;
