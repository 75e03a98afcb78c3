//! User-facing validation messages shared by the forms and the services.

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_CHOICE: &str =
    "Select a valid choice. That choice is not one of the available choices.";
pub const INVALID_IMAGE: &str =
    "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";
pub const INVALID_USERNAME: &str = "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.";
pub const INVALID_EMAIL: &str = "Enter a valid email address.";
pub const USERNAME_TAKEN: &str = "A user with that username already exists.";

pub const PASSWORD_NUMERIC: &str = "This password is entirely numeric.";
pub const PASSWORD_MISMATCH: &str = "The two password fields didn’t match.";
pub const WRONG_OLD_PASSWORD: &str =
    "Your old password was entered incorrectly. Please enter it again.";
pub const BAD_CREDENTIALS: &str = "Please enter a correct username and password. Note that both fields may be case-sensitive.";

pub fn password_too_short(min_length: usize) -> String {
    format!("This password is too short. It must contain at least {min_length} characters.")
}
