//! Server-side HTML rendering.
//!
//! Each page is a function from view data to a complete document. Anything
//! that came from a user passes through [`escape`] before it is interpolated.

pub mod about;
pub mod accounts;
pub mod errors;
pub mod posts;

use chrono::{Datelike, Utc};

use yatube_shared::FormErrors;

use crate::middleware::auth::Identity;

/// Escape text for use in element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escaped text with newlines turned into `<br>`.
pub fn linebreaks(text: &str) -> String {
    escape(text).replace("\r\n", "\n").replace('\n', "<br>\n")
}

/// Wrap a page body into the shared document layout.
pub fn layout(title: &str, viewer: Option<&Identity>, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="ru">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
</head>
<body>
<header>{nav}</header>
<main class="container py-5">
{body}
</main>
{footer}
</body>
</html>
"#,
        title = escape(title),
        nav = nav(viewer),
        footer = footer(),
    )
}

fn nav(viewer: Option<&Identity>) -> String {
    let mut links = vec![
        r#"<a class="navbar-brand" href="/"><span>Ya</span>tube</a>"#.to_string(),
        r#"<a href="/about/author/">Об авторе</a>"#.to_string(),
        r#"<a href="/about/tech/">Технологии</a>"#.to_string(),
    ];

    match viewer {
        Some(identity) => {
            links.push(r#"<a href="/follow/">Избранные авторы</a>"#.to_string());
            links.push(r#"<a href="/create/">Новая запись</a>"#.to_string());
            links.push(r#"<a href="/auth/password_change/">Изменить пароль</a>"#.to_string());
            links.push(r#"<a href="/auth/logout/">Выйти</a>"#.to_string());
            links.push(format!(
                r#"<span class="user">Пользователь: <a href="/profile/{0}/">{0}</a></span>"#,
                escape(&identity.username)
            ));
        }
        None => {
            links.push(r#"<a href="/auth/login/">Войти</a>"#.to_string());
            links.push(r#"<a href="/auth/signup/">Регистрация</a>"#.to_string());
        }
    }

    format!(
        "<nav class=\"navbar\">\n{}\n</nav>",
        links.join("\n")
    )
}

fn footer() -> String {
    format!(
        r#"<footer class="border-top text-center py-3">
<p>&copy; {} Copyright <span>Ya</span>tube</p>
</footer>"#,
        Utc::now().year()
    )
}

/// The error list of one form field, empty when it has none.
pub fn field_errors(errors: &FormErrors, field: &str) -> String {
    render_error_list(errors.get(field))
}

/// Errors not attached to a field.
pub fn non_field_errors(errors: &FormErrors) -> String {
    render_error_list(errors.non_field())
}

fn render_error_list(messages: &[String]) -> String {
    if messages.is_empty() {
        return String::new();
    }
    let items: Vec<String> = messages
        .iter()
        .map(|m| format!("<li>{}</li>", escape(m)))
        .collect();
    format!(
        "<ul class=\"errorlist alert alert-danger\">{}</ul>",
        items.concat()
    )
}
