pub mod backends;
pub mod lines;

pub use backends::*;
pub use lines::{read_value, rewrite_line};

pub mod prelude {
    pub use super::backends::*;
    pub use nta_core::storage::{ConfigStore, RECIPIENT_COMMENT, RECIPIENT_KEY};
}
