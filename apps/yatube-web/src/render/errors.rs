//! Error pages.

use super::layout;

pub fn not_found() -> String {
    layout(
        "Custom 404",
        None,
        r#"<h1>Custom 404</h1>
<p>Запрошенная страница не существует</p>
<a href="/">Идите на главную</a>"#,
    )
}

pub fn bad_request() -> String {
    layout(
        "Custom 400",
        None,
        r#"<h1>Custom 400</h1>
<p>Запрос не может быть обработан</p>
<a href="/">Идите на главную</a>"#,
    )
}

pub fn forbidden() -> String {
    layout(
        "Custom 403",
        None,
        r#"<h1>Custom 403</h1>
<p>Доступ запрещён</p>
<a href="/">Идите на главную</a>"#,
    )
}

pub fn server_error() -> String {
    layout(
        "Custom 500",
        None,
        r#"<h1>Custom 500</h1>
<p>Что-то пошло не так</p>"#,
    )
}
