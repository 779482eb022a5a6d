//! UI components rendered into pages

mod like_button;

pub use like_button::{LikeButton, LIKE_BUTTON_SCRIPT};
