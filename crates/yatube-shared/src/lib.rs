//! # Yatube Shared
//!
//! Form payloads exchanged between the HTML pages and the handlers.

pub mod forms;

pub use forms::{
    CommentForm, FormErrors, LoginForm, PasswordChangeForm, PostForm, SignupForm, safe_next,
};
