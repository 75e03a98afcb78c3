//! Feed, post and post form pages.

use uuid::Uuid;

use yatube_core::domain::{FeedItem, Group};
use yatube_core::pagination::Page;
use yatube_core::service::{GroupFeed, PostDetail, ProfileFeed};
use yatube_shared::{FormErrors, PostForm};

use super::{escape, field_errors, layout, linebreaks, non_field_errors};
use crate::middleware::auth::Identity;

const DATE_FORMAT: &str = "%d %B %Y";

/// Which link a post card offers besides the detail page.
#[derive(Clone, Copy, PartialEq, Eq)]
enum CardLinks {
    Full,
    NoGroup,
}

fn post_card(item: &FeedItem, links: CardLinks) -> String {
    let post = &item.post;
    let author = &item.author;

    let image = post
        .image
        .as_deref()
        .map(|path| {
            format!(
                r#"<img class="card-img my-2" src="/media/{}" alt="">"#,
                escape(path)
            )
        })
        .unwrap_or_default();

    let group = match (&item.group, links) {
        (Some(group), CardLinks::Full) => format!(
            r#"<a href="/group/{}/">все записи группы</a>"#,
            escape(&group.slug)
        ),
        _ => String::new(),
    };

    format!(
        r#"<article>
<ul>
<li>Автор: <a href="/profile/{username}/">{name}</a></li>
<li>Дата публикации: {date}</li>
</ul>
{image}
<p>{text}</p>
<a href="/posts/{id}/">подробная информация</a>
{group}
</article>"#,
        username = escape(&author.username),
        name = escape(&author.display_name()),
        date = post.pub_date.format(DATE_FORMAT),
        text = linebreaks(&post.text),
        id = post.id,
    )
}

fn post_list(page: &Page<FeedItem>, links: CardLinks) -> String {
    let cards: Vec<String> = page.items.iter().map(|item| post_card(item, links)).collect();
    cards.join("\n<hr>\n")
}

/// Page navigation links, relative to the current path.
fn paginator<T>(page: &Page<T>) -> String {
    if page.num_pages() <= 1 {
        return String::new();
    }

    let mut links = Vec::new();
    if let Some(previous) = page.previous_page_number() {
        links.push(r#"<li><a href="?page=1">Первая</a></li>"#.to_string());
        links.push(format!(r#"<li><a href="?page={previous}">{previous}</a></li>"#));
    }
    links.push(format!(
        r#"<li class="active"><span>{}</span></li>"#,
        page.number()
    ));
    if let Some(next) = page.next_page_number() {
        links.push(format!(r#"<li><a href="?page={next}">{next}</a></li>"#));
        links.push(format!(
            r#"<li><a href="?page={}">Последняя</a></li>"#,
            page.num_pages()
        ));
    }

    format!(
        "<nav class=\"pagination\"><ul>{}</ul></nav>",
        links.concat()
    )
}

pub fn index(page: &Page<FeedItem>, viewer: Option<&Identity>) -> String {
    let body = format!(
        "<h1>Последние обновления на сайте</h1>\n{}\n{}",
        post_list(page, CardLinks::Full),
        paginator(page)
    );
    layout("Последние обновления на сайте", viewer, &body)
}

pub fn group(feed: &GroupFeed, viewer: Option<&Identity>) -> String {
    let group = &feed.group;
    let body = format!(
        "<h1>{title}</h1>\n<p>{description}</p>\n{posts}\n{pages}",
        title = escape(&group.title),
        description = linebreaks(&group.description),
        posts = post_list(&feed.page, CardLinks::NoGroup),
        pages = paginator(&feed.page),
    );
    layout(&format!("Записи сообщества {}", group.title), viewer, &body)
}

pub fn profile(feed: &ProfileFeed, viewer: Option<&Identity>) -> String {
    let author = &feed.author;
    let username = escape(&author.username);

    let follow_button = match viewer {
        Some(identity) if identity.user_id != author.id => {
            if feed.following {
                format!(r#"<a class="btn btn-light" href="/profile/{username}/unfollow/">Отписаться</a>"#)
            } else {
                format!(r#"<a class="btn btn-primary" href="/profile/{username}/follow/">Подписаться</a>"#)
            }
        }
        _ => String::new(),
    };

    let body = format!(
        "<h1>Все посты пользователя {name}</h1>\n<h3>Всего постов: {total}</h3>\n{follow_button}\n{posts}\n{pages}",
        name = escape(&author.display_name()),
        total = feed.page.total(),
        posts = post_list(&feed.page, CardLinks::Full),
        pages = paginator(&feed.page),
    );
    layout(
        &format!("Профайл пользователя {}", author.display_name()),
        viewer,
        &body,
    )
}

pub fn follow_index(page: &Page<FeedItem>, viewer: Option<&Identity>) -> String {
    let body = if page.is_empty() {
        "<h1>Избранные авторы</h1>\n<p>Вы пока ни на кого не подписаны.</p>".to_string()
    } else {
        format!(
            "<h1>Избранные авторы</h1>\n{}\n{}",
            post_list(page, CardLinks::Full),
            paginator(page)
        )
    };
    layout("Избранные авторы", viewer, &body)
}

pub fn detail(detail: &PostDetail, viewer: Option<&Identity>) -> String {
    let item = &detail.item;
    let post = &item.post;

    let group = item
        .group
        .as_ref()
        .map(|g| {
            format!(
                r#"<li>Группа: {title} <a href="/group/{slug}/">все записи группы</a></li>"#,
                title = escape(&g.title),
                slug = escape(&g.slug)
            )
        })
        .unwrap_or_default();

    let image = post
        .image
        .as_deref()
        .map(|path| format!(r#"<img class="card-img my-2" src="/media/{}" alt="">"#, escape(path)))
        .unwrap_or_default();

    let edit = match viewer {
        Some(identity) if identity.user_id == post.author_id => format!(
            r#"<a class="btn btn-primary" href="/posts/{}/edit/">редактировать запись</a>"#,
            post.id
        ),
        _ => String::new(),
    };

    let comment_form = if viewer.is_some() {
        format!(
            r#"<div class="card my-4">
<h5 class="card-header">Добавить комментарий:</h5>
<form method="post" action="/posts/{}/comment/">
<textarea name="text" cols="40" rows="10" required></textarea>
<button type="submit" class="btn btn-primary">Отправить</button>
</form>
</div>"#,
            post.id
        )
    } else {
        String::new()
    };

    let comments: Vec<String> = detail
        .comments
        .iter()
        .map(|entry| {
            format!(
                r#"<div class="media mb-4">
<h5><a href="/profile/{username}/">{username}</a></h5>
<p>{text}</p>
</div>"#,
                username = escape(&entry.author.username),
                text = linebreaks(&entry.comment.text),
            )
        })
        .collect();

    let body = format!(
        r#"<div class="row">
<aside>
<ul>
<li>Дата публикации: {date}</li>
{group}
<li>Автор: {name}</li>
<li>Всего постов автора: <span>{author_posts}</span></li>
<li><a href="/profile/{username}/">все посты пользователя</a></li>
</ul>
</aside>
<article>
{image}
<p>{text}</p>
{edit}
{comment_form}
{comments}
</article>
</div>"#,
        date = post.pub_date.format(DATE_FORMAT),
        name = escape(&item.author.display_name()),
        author_posts = detail.author_posts,
        username = escape(&item.author.username),
        text = linebreaks(&post.text),
        comments = comments.concat(),
    );

    layout(&format!("Пост {post}"), viewer, &body)
}

/// The create form, or the edit form when `post_id` is set.
pub fn post_form(
    form: &PostForm,
    errors: &FormErrors,
    groups: &[Group],
    post_id: Option<Uuid>,
    viewer: Option<&Identity>,
) -> String {
    let is_edit = post_id.is_some();
    let (heading, action, button) = match post_id {
        Some(id) => ("Редактировать пост", format!("/posts/{id}/edit/"), "Сохранить"),
        None => ("Новый пост", "/create/".to_string(), "Добавить"),
    };

    let mut options = vec![format!(
        r#"<option value=""{}>---------</option>"#,
        if form.group.is_empty() { " selected" } else { "" }
    )];
    options.extend(groups.iter().map(|g| {
        let id = g.id.to_string();
        format!(
            r#"<option value="{id}"{selected}>{title}</option>"#,
            selected = if form.group == id { " selected" } else { "" },
            title = escape(&g.title),
        )
    }));

    let image_clear = if is_edit && !form.image.is_empty() {
        format!(
            r#"<p>На данный момент: <a href="/media/{0}">{0}</a>
<input type="checkbox" name="image-clear" id="image-clear_id"> <label for="image-clear_id">Очистить</label></p>"#,
            escape(&form.image)
        )
    } else {
        String::new()
    };

    let body = format!(
        r#"<div class="card">
<div class="card-header">{heading}</div>
<div class="card-body">
{non_field}
<form method="post" action="{action}">
<div class="form-group">
<label for="id_text">Текст поста <span class="required">*</span></label>
{text_errors}
<textarea name="text" id="id_text" cols="40" rows="10">{text}</textarea>
<small class="form-text">Текст нового поста</small>
</div>
<div class="form-group">
<label for="id_group">Группа</label>
{group_errors}
<select name="group" id="id_group">
{options}
</select>
<small class="form-text">Группа, к которой будет относиться пост</small>
</div>
<div class="form-group">
<label for="id_image">Картинка</label>
{image_errors}
{image_clear}
<input type="text" name="image" id="id_image" value="{image}">
</div>
<button type="submit" class="btn btn-primary">{button}</button>
</form>
</div>
</div>"#,
        non_field = non_field_errors(errors),
        text_errors = field_errors(errors, "text"),
        text = escape(&form.text),
        group_errors = field_errors(errors, "group"),
        options = options.join("\n"),
        image_errors = field_errors(errors, "image"),
        image = if is_edit { String::new() } else { escape(&form.image) },
    );

    layout(heading, viewer, &body)
}
