//! Form payloads posted by the HTML pages, with their validation.
//!
//! Every form deserializes from `application/x-www-form-urlencoded` with all
//! fields defaulted, so a missing field is reported by `clean()` rather than
//! rejected by the extractor.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use yatube_core::domain::{NewUser, PostDraft, is_image_path};

pub use yatube_core::messages::{
    BAD_CREDENTIALS, INVALID_CHOICE, INVALID_EMAIL, INVALID_IMAGE, INVALID_USERNAME,
    PASSWORD_MISMATCH, REQUIRED,
};

const USERNAME_MAX_LEN: usize = 150;

/// Key under which errors not tied to one field are stored.
pub const NON_FIELD: &str = "__all__";

/// Validation messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors {
    fields: BTreeMap<&'static str, Vec<String>>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Errors holding a single message.
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Errors holding several messages for one field.
    pub fn field<I, M>(field: &'static str, messages: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<String>,
    {
        let mut errors = Self::new();
        for message in messages {
            errors.add(field, message);
        }
        errors
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn non_field(&self) -> &[String] {
        self.get(NON_FIELD)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn into_result<T>(self, value: T) -> Result<T, FormErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

/// Post create and edit form.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PostForm {
    pub text: String,
    /// Group id, empty for no group.
    pub group: String,
    /// Media path of the image, empty to keep the current one.
    pub image: String,
    #[serde(rename = "image-clear")]
    pub image_clear: Option<String>,
}

impl PostForm {
    /// Form pre-filled from an existing post.
    pub fn from_post(text: &str, group_id: Option<Uuid>, image: Option<&str>) -> Self {
        Self {
            text: text.to_string(),
            group: group_id.map(|id| id.to_string()).unwrap_or_default(),
            image: image.unwrap_or_default().to_string(),
            image_clear: None,
        }
    }

    pub fn clean(&self) -> Result<PostDraft, FormErrors> {
        let mut errors = FormErrors::new();

        let text = self.text.trim();
        if text.is_empty() {
            errors.add("text", REQUIRED);
        }

        let group = self.group.trim();
        let group_id = if group.is_empty() {
            None
        } else {
            match Uuid::parse_str(group) {
                Ok(id) => Some(id),
                Err(_) => {
                    errors.add("group", INVALID_CHOICE);
                    None
                }
            }
        };

        let image = self.image.trim();
        let image = if image.is_empty() {
            None
        } else if is_image_path(image) {
            Some(image.to_string())
        } else {
            errors.add("image", INVALID_IMAGE);
            None
        };

        errors.into_result(PostDraft {
            text: text.to_string(),
            group_id,
            image,
            clear_image: self.image_clear.is_some(),
        })
    }
}

/// Comment form on the post page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CommentForm {
    pub text: String,
}

impl CommentForm {
    /// The trimmed comment text, or `None` when blank.
    pub fn clean(&self) -> Option<&str> {
        let text = self.text.trim();
        (!text.is_empty()).then_some(text)
    }
}

/// Registration form.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SignupForm {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password1: String,
    #[serde(skip_serializing)]
    pub password2: String,
}

impl SignupForm {
    pub fn clean(&self) -> Result<NewUser, FormErrors> {
        let mut errors = FormErrors::new();
        let username = self.username.trim();

        if username.is_empty() {
            errors.add("username", REQUIRED);
        } else if !is_valid_username(username) {
            errors.add("username", INVALID_USERNAME);
        }

        let email = self.email.trim();
        if !email.is_empty() && !is_valid_email(email) {
            errors.add("email", INVALID_EMAIL);
        }

        check_new_password(&mut errors, "password1", "password2", &self.password1, &self.password2);

        errors.into_result(NewUser {
            username: username.to_string(),
            email: email.to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            password: self.password1.clone(),
        })
    }
}

/// Login form. `next` is where to go after a successful login.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub next: Option<String>,
}

impl LoginForm {
    pub fn clean(&self) -> Result<(&str, &str), FormErrors> {
        let mut errors = FormErrors::new();
        if self.username.trim().is_empty() {
            errors.add("username", REQUIRED);
        }
        if self.password.is_empty() {
            errors.add("password", REQUIRED);
        }
        errors.into_result((self.username.trim(), self.password.as_str()))
    }
}

/// Password change form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PasswordChangeForm {
    pub old_password: String,
    pub new_password1: String,
    pub new_password2: String,
}

impl PasswordChangeForm {
    /// The old and new passwords once the new one passes the rules.
    pub fn clean(&self) -> Result<(&str, &str), FormErrors> {
        let mut errors = FormErrors::new();
        if self.old_password.is_empty() {
            errors.add("old_password", REQUIRED);
        }
        check_new_password(
            &mut errors,
            "new_password1",
            "new_password2",
            &self.new_password1,
            &self.new_password2,
        );
        errors.into_result((self.old_password.as_str(), self.new_password1.as_str()))
    }
}

/// A redirect target is followed only when it stays on this site.
pub fn safe_next(next: Option<&str>) -> Option<&str> {
    next.filter(|n| n.starts_with('/') && !n.starts_with("//") && !n.contains('\\'))
}

fn check_new_password(
    errors: &mut FormErrors,
    field: &'static str,
    confirm_field: &'static str,
    password: &str,
    confirmation: &str,
) {
    if password.is_empty() {
        errors.add(field, REQUIRED);
        return;
    }
    if confirmation.is_empty() {
        errors.add(confirm_field, REQUIRED);
        return;
    }
    if password != confirmation {
        errors.add(confirm_field, PASSWORD_MISMATCH);
    }
}

fn is_valid_username(username: &str) -> bool {
    username.chars().count() <= USERNAME_MAX_LEN
        && username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.rsplit_once('@') else {
        return false;
    };
    !local.is_empty()
        && !email.chars().any(char::is_whitespace)
        && domain
            .split('.')
            .all(|label| !label.is_empty() && !label.contains('@'))
        && domain.contains('.')
}
