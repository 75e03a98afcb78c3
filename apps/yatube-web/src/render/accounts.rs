//! Signup, login, logout and password change pages.

use yatube_shared::{FormErrors, SignupForm};

use super::{escape, field_errors, layout, non_field_errors};
use crate::middleware::auth::Identity;

fn input(kind: &str, name: &str, label: &str, value: &str, errors: &FormErrors) -> String {
    format!(
        r#"<div class="form-group">
<label for="id_{name}">{label}</label>
{errors}
<input type="{kind}" name="{name}" id="id_{name}" value="{value}">
</div>"#,
        errors = field_errors(errors, name),
        value = escape(value),
    )
}

fn card(heading: &str, errors: &FormErrors, action: &str, fields: &str, button: &str) -> String {
    format!(
        r#"<div class="card">
<div class="card-header">{heading}</div>
<div class="card-body">
{non_field}
<form method="post" action="{action}">
{fields}
<button type="submit" class="btn btn-primary">{button}</button>
</form>
</div>
</div>"#,
        non_field = non_field_errors(errors),
    )
}

pub fn signup(form: &SignupForm, errors: &FormErrors) -> String {
    let fields = [
        input("text", "first_name", "Имя", &form.first_name, errors),
        input("text", "last_name", "Фамилия", &form.last_name, errors),
        input("text", "username", "Имя пользователя", &form.username, errors),
        input("email", "email", "Адрес электронной почты", &form.email, errors),
        input("password", "password1", "Пароль", "", errors),
        input("password", "password2", "Подтверждение пароля", "", errors),
    ]
    .join("\n");

    layout(
        "Зарегистрироваться",
        None,
        &card("Зарегистрироваться", errors, "/auth/signup/", &fields, "Зарегистрироваться"),
    )
}

pub fn login(username: &str, next: Option<&str>, errors: &FormErrors) -> String {
    let mut fields = vec![
        input("text", "username", "Имя пользователя", username, errors),
        input("password", "password", "Пароль", "", errors),
    ];
    if let Some(next) = next {
        fields.push(format!(
            r#"<input type="hidden" name="next" value="{}">"#,
            escape(next)
        ));
    }

    let body = format!(
        "{}\n<a href=\"/auth/signup/\">Регистрация</a>",
        card("Войти на сайт", errors, "/auth/login/", &fields.join("\n"), "Войти")
    );
    layout("Войти", None, &body)
}

pub fn logged_out() -> String {
    layout(
        "Вы вышли из системы",
        None,
        r#"<div class="card">
<div class="card-header">Выход</div>
<div class="card-body">
<p>Вы вышли из своей учётной записи. Ждём вас снова!</p>
<a href="/auth/login/">Войти снова</a>
</div>
</div>"#,
    )
}

pub fn password_change(errors: &FormErrors, viewer: Option<&Identity>) -> String {
    let fields = [
        input("password", "old_password", "Старый пароль", "", errors),
        input("password", "new_password1", "Новый пароль", "", errors),
        input("password", "new_password2", "Подтверждение нового пароля", "", errors),
    ]
    .join("\n");

    layout(
        "Изменить пароль",
        viewer,
        &card(
            "Изменить пароль",
            errors,
            "/auth/password_change/",
            &fields,
            "Изменить пароль",
        ),
    )
}

pub fn password_change_done(viewer: Option<&Identity>) -> String {
    layout(
        "Пароль изменён",
        viewer,
        r#"<div class="card">
<div class="card-header">Пароль изменён</div>
<div class="card-body"><p>Ваш пароль был изменён.</p></div>
</div>"#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_keeps_next_and_shows_errors() {
        let errors = FormErrors::single(yatube_shared::forms::NON_FIELD, "Bad credentials");

        let html = login("leo", Some("/create/"), &errors);

        assert!(html.contains(r#"name="next" value="/create/""#));
        assert!(html.contains("Bad credentials"));
        assert!(html.contains(r#"value="leo""#));
    }

    #[test]
    fn test_signup_never_echoes_passwords() {
        let form = SignupForm {
            username: "leo".into(),
            password1: "Secret123".into(),
            password2: "Secret123".into(),
            ..Default::default()
        };

        let html = signup(&form, &FormErrors::new());

        assert!(!html.contains("Secret123"));
        assert!(html.contains(r#"value="leo""#));
    }
}
