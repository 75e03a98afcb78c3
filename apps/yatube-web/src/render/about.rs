use super::layout;
use crate::middleware::auth::Identity;

pub fn author(viewer: Option<&Identity>) -> String {
    layout(
        "Об авторе проекта",
        viewer,
        r#"<h1>Об авторе проекта</h1>
<p>Yatube пишут разработчики, которым нравится вести дневники и читать чужие.</p>
<p>Исходный код, вопросы и предложения принимаются в репозитории проекта.</p>"#,
    )
}

pub fn tech(viewer: Option<&Identity>) -> String {
    layout(
        "Технологии",
        viewer,
        r#"<h1>Технологии</h1>
<ul>
<li>Rust и actix-web для HTTP</li>
<li>SeaORM поверх PostgreSQL или SQLite</li>
<li>tracing для журналирования</li>
<li>JWT-сессии и хэширование паролей Argon2</li>
</ul>"#,
    )
}
