use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use uuid::Uuid;

use yatube_core::domain::{Comment, Group, NewUser, Post, PostDraft, User};
use yatube_core::ports::{PostFilter, Repositories, TokenService};
use yatube_infra::{Argon2PasswordService, DatabaseHandle, JwtConfig, JwtTokenService};

use super::configure_routes;
use crate::config::SiteConfig;
use crate::middleware::auth::SESSION_COOKIE;
use crate::state::AppState;

struct Site {
    state: AppState,
    repos: Repositories,
    tokens: Arc<dyn TokenService>,
    _db: DatabaseHandle,
}

async fn site() -> Site {
    let db = DatabaseHandle::in_memory()
        .await
        .expect("in-memory database");
    let repos = db.repositories();
    let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(JwtConfig {
        secret: "test-secret".to_string(),
        ..Default::default()
    }));
    let state = AppState::new(
        repos.clone(),
        tokens.clone(),
        Arc::new(Argon2PasswordService::default()),
        SiteConfig::default(),
    );

    Site {
        state,
        repos,
        tokens,
        _db: db,
    }
}

impl Site {
    async fn user(&self, username: &str) -> User {
        let user = User::new(
            NewUser {
                username: username.to_string(),
                email: String::new(),
                first_name: String::new(),
                last_name: String::new(),
                password: String::new(),
            },
            "unused".to_string(),
        );
        self.repos.users.insert(user).await.unwrap()
    }

    async fn group(&self, slug: &str) -> Group {
        self.repos
            .groups
            .insert(Group::new(
                format!("Group {slug}"),
                slug.to_string(),
                "description".to_string(),
            ))
            .await
            .unwrap()
    }

    async fn post(&self, author: &User, group: Option<&Group>, text: &str) -> Post {
        let draft = PostDraft {
            text: text.to_string(),
            group_id: group.map(|g| g.id),
            ..Default::default()
        };
        self.repos
            .posts
            .insert(Post::new(author.id, draft))
            .await
            .unwrap()
    }

    fn session(&self, user: &User) -> Cookie<'static> {
        let token = self
            .tokens
            .generate_token(user.id, &user.username)
            .unwrap();
        Cookie::new(SESSION_COOKIE, token)
    }
}

macro_rules! app {
    ($site:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($site.state.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

fn location<B>(resp: &actix_web::dev::ServiceResponse<B>) -> String {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

async fn body_text<B>(resp: actix_web::dev::ServiceResponse<B>) -> String
where
    B: actix_web::body::MessageBody,
{
    let bytes = test::read_body(resp).await;
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[actix_web::test]
async fn test_public_pages_are_available() {
    let site = site().await;
    let author = site.user("leo").await;
    let group = site.group("cats").await;
    let post = site.post(&author, Some(&group), "Hello cats").await;
    let app = app!(site);

    let detail = format!("/posts/{}/", post.id);
    for uri in [
        "/",
        "/group/cats/",
        "/profile/leo/",
        detail.as_str(),
        "/about/author/",
        "/about/tech/",
        "/auth/signup/",
        "/auth/login/",
        "/auth/logout/",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "GET {uri}");
    }
}

#[actix_web::test]
async fn test_user_text_is_escaped_on_every_page() {
    const HOSTILE: &str = "<script>alert('x')</script>";

    let site = site().await;
    let author = site
        .repos
        .users
        .insert(User::new(
            NewUser {
                username: "leo".to_string(),
                email: String::new(),
                first_name: HOSTILE.to_string(),
                last_name: HOSTILE.to_string(),
                password: String::new(),
            },
            "unused".to_string(),
        ))
        .await
        .unwrap();
    let group = site
        .repos
        .groups
        .insert(Group::new(HOSTILE.to_string(), "cats".to_string(), HOSTILE.to_string()))
        .await
        .unwrap();
    let post = site.post(&author, Some(&group), HOSTILE).await;
    site.repos
        .comments
        .insert(Comment::new(post.id, author.id, HOSTILE.to_string()))
        .await
        .unwrap();
    let app = app!(site);

    let detail = format!("/posts/{}/", post.id);
    let edit = format!("/posts/{}/edit/", post.id);
    for uri in ["/", "/group/cats/", "/profile/leo/", detail.as_str(), edit.as_str(), "/create/"] {
        let req = test::TestRequest::get()
            .uri(uri)
            .cookie(site.session(&author))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "GET {uri}");
        let html = body_text(resp).await;
        assert!(!html.contains("<script>"), "GET {uri}");
        assert!(html.contains("&lt;script&gt;"), "GET {uri}");
    }
}

#[actix_web::test]
async fn test_unknown_pages_render_custom_404() {
    let site = site().await;
    let app = app!(site);

    for uri in [
        "/unexisting_page/",
        "/group/nope/",
        "/profile/nobody/",
        "/posts/not-a-uuid/",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "GET {uri}");
        assert!(body_text(resp).await.contains("Custom 404"));
    }

    let missing = format!("/posts/{}/", Uuid::now_v7());
    let req = test::TestRequest::get().uri(&missing).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_anonymous_is_sent_to_login() {
    let site = site().await;
    let author = site.user("leo").await;
    let post = site.post(&author, None, "text").await;
    let app = app!(site);

    let edit = format!("/posts/{}/edit/", post.id);
    for uri in ["/create/", "/follow/", edit.as_str(), "/profile/leo/follow/"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND, "GET {uri}");
        assert_eq!(location(&resp), format!("/auth/login/?next={uri}"));
    }

    let comment = format!("/posts/{}/comment/", post.id);
    let req = test::TestRequest::post()
        .uri(&comment)
        .set_form([("text", "hi")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), format!("/auth/login/?next={comment}"));
    assert!(site.repos.comments.list_for_post(post.id).await.unwrap().is_empty());
}

#[actix_web::test]
async fn test_create_post_redirects_to_profile() {
    let site = site().await;
    let author = site.user("leo").await;
    let group = site.group("cats").await;
    let app = app!(site);
    let group_id = group.id.to_string();

    let req = test::TestRequest::post()
        .uri("/create/")
        .cookie(site.session(&author))
        .set_form([
            ("text", "Brand new post"),
            ("group", group_id.as_str()),
            ("image", "posts/small.gif"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/profile/leo/");

    let posts = site.repos.posts.list(PostFilter::All, 0, 10).await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].text, "Brand new post");
    assert_eq!(posts[0].group_id, Some(group.id));
    assert_eq!(posts[0].author_id, author.id);
    assert_eq!(posts[0].image.as_deref(), Some("posts/small.gif"));
}

#[actix_web::test]
async fn test_invalid_post_form_is_rerendered() {
    let site = site().await;
    let author = site.user("leo").await;
    let app = app!(site);

    let req = test::TestRequest::post()
        .uri("/create/")
        .cookie(site.session(&author))
        .set_form([("text", "   "), ("group", "")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("This field is required."));

    let unknown_group = Uuid::now_v7().to_string();
    let req = test::TestRequest::post()
        .uri("/create/")
        .cookie(site.session(&author))
        .set_form([("text", "text"), ("group", unknown_group.as_str())])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Select a valid choice"));
    assert_eq!(site.repos.posts.count(PostFilter::All).await.unwrap(), 0);
}

#[actix_web::test]
async fn test_author_edits_post() {
    let site = site().await;
    let author = site.user("leo").await;
    let post = site.post(&author, None, "original").await;
    let app = app!(site);
    let uri = format!("/posts/{}/edit/", post.id);

    let req = test::TestRequest::get()
        .uri(&uri)
        .cookie(site.session(&author))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("original"));

    let req = test::TestRequest::post()
        .uri(&uri)
        .cookie(site.session(&author))
        .set_form([("text", "edited")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/posts/{}/", post.id));
    let stored = site.repos.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.text, "edited");
    assert_eq!(stored.author_id, author.id);
    assert_eq!(site.repos.posts.count(PostFilter::All).await.unwrap(), 1);
}

#[actix_web::test]
async fn test_non_author_cannot_edit() {
    let site = site().await;
    let author = site.user("leo").await;
    let intruder = site.user("fedor").await;
    let post = site.post(&author, None, "original").await;
    let app = app!(site);
    let uri = format!("/posts/{}/edit/", post.id);

    let req = test::TestRequest::get()
        .uri(&uri)
        .cookie(site.session(&intruder))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/posts/{}/", post.id));

    let req = test::TestRequest::post()
        .uri(&uri)
        .cookie(site.session(&intruder))
        .set_form([("text", "hacked")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    let stored = site.repos.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.text, "original");
}

#[actix_web::test]
async fn test_comment_appears_on_detail_page() {
    let site = site().await;
    let author = site.user("leo").await;
    let reader = site.user("fedor").await;
    let post = site.post(&author, None, "post").await;
    let app = app!(site);
    let comment_uri = format!("/posts/{}/comment/", post.id);

    let req = test::TestRequest::post()
        .uri(&comment_uri)
        .cookie(site.session(&reader))
        .set_form([("text", "Great post")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), format!("/posts/{}/", post.id));

    let req = test::TestRequest::post()
        .uri(&comment_uri)
        .cookie(site.session(&reader))
        .set_form([("text", "")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    assert_eq!(site.repos.comments.list_for_post(post.id).await.unwrap().len(), 1);

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}/", post.id))
        .to_request();
    let html = body_text(test::call_service(&app, req).await).await;
    assert!(html.contains("Great post"));
    assert!(html.contains("fedor"));
}

#[actix_web::test]
async fn test_index_is_cached_until_cleared() {
    let site = site().await;
    let author = site.user("leo").await;
    site.post(&author, None, "first post").await;
    let app = app!(site);

    let req = test::TestRequest::get().uri("/").to_request();
    let before = body_text(test::call_service(&app, req).await).await;

    site.post(&author, None, "fresh post").await;

    let req = test::TestRequest::get().uri("/").to_request();
    let cached = body_text(test::call_service(&app, req).await).await;
    assert_eq!(before, cached);
    assert!(!cached.contains("fresh post"));

    site.state.index_cache.clear().await;

    let req = test::TestRequest::get().uri("/").to_request();
    let after = body_text(test::call_service(&app, req).await).await;
    assert_ne!(before, after);
    assert!(after.contains("fresh post"));
}

#[actix_web::test]
async fn test_index_cache_holds_one_entry_per_real_page() {
    let site = site().await;
    let author = site.user("leo").await;
    for i in 0..13 {
        site.post(&author, None, &format!("post number {i}")).await;
    }
    let app = app!(site);

    for i in 0..200 {
        let uri = format!("/?page=junk{i}");
        let req = test::TestRequest::get().uri(&uri).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }
    for uri in ["/", "/?page=1", "/?page=2", "/?page=99", "/?page=99999999999999999999"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    assert_eq!(site.state.index_cache.clear().await, 2);
}

#[actix_web::test]
async fn test_pages_hold_ten_posts() {
    let site = site().await;
    let author = site.user("leo").await;
    let group = site.group("cats").await;
    for i in 0..13 {
        site.post(&author, Some(&group), &format!("post number {i}")).await;
    }
    let app = app!(site);

    for (uri, expected) in [
        ("/group/cats/", 10),
        ("/group/cats/?page=2", 3),
        ("/profile/leo/", 10),
        ("/profile/leo/?page=2", 3),
        ("/profile/leo/?page=99", 3),
        ("/profile/leo/?page=abc", 10),
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let html = body_text(test::call_service(&app, req).await).await;
        assert_eq!(html.matches("<article>").count(), expected, "GET {uri}");
    }
}

#[actix_web::test]
async fn test_new_post_shows_only_in_its_group() {
    let site = site().await;
    let author = site.user("leo").await;
    let cats = site.group("cats").await;
    site.group("dogs").await;
    site.post(&author, Some(&cats), "meow meow").await;
    let app = app!(site);

    for (uri, present) in [
        ("/", true),
        ("/group/cats/", true),
        ("/profile/leo/", true),
        ("/group/dogs/", false),
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let html = body_text(test::call_service(&app, req).await).await;
        assert_eq!(html.contains("meow meow"), present, "GET {uri}");
    }
}

#[actix_web::test]
async fn test_follow_and_unfollow() {
    let site = site().await;
    let author = site.user("leo").await;
    let follower = site.user("fedor").await;
    let stranger = site.user("anna").await;
    site.post(&author, None, "for my followers").await;
    let app = app!(site);

    for _ in 0..2 {
        let req = test::TestRequest::get()
            .uri("/profile/leo/follow/")
            .cookie(site.session(&follower))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(location(&resp), "/profile/leo/");
    }
    assert_eq!(
        site.repos.follows.delete_pair(follower.id, author.id).await.unwrap(),
        1
    );

    let req = test::TestRequest::get()
        .uri("/profile/leo/follow/")
        .cookie(site.session(&follower))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get()
        .uri("/follow/")
        .cookie(site.session(&follower))
        .to_request();
    assert!(body_text(test::call_service(&app, req).await).await.contains("for my followers"));

    let req = test::TestRequest::get()
        .uri("/follow/")
        .cookie(site.session(&stranger))
        .to_request();
    assert!(!body_text(test::call_service(&app, req).await).await.contains("for my followers"));

    for _ in 0..2 {
        let req = test::TestRequest::get()
            .uri("/profile/leo/unfollow/")
            .cookie(site.session(&follower))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
    }
    assert!(!site.repos.follows.exists(follower.id, author.id).await.unwrap());
}

#[actix_web::test]
async fn test_follow_self_creates_nothing() {
    let site = site().await;
    let author = site.user("leo").await;
    let app = app!(site);

    let req = test::TestRequest::get()
        .uri("/profile/leo/follow/")
        .cookie(site.session(&author))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(location(&resp), "/profile/leo/");
    assert!(!site.repos.follows.exists(author.id, author.id).await.unwrap());
}

#[actix_web::test]
async fn test_session_of_deleted_account_is_anonymous() {
    let site = site().await;
    let ghost = site.user("ghost").await;
    let session = site.session(&ghost);
    site.repos.users.delete(ghost.id).await.unwrap();
    let app = app!(site);

    let req = test::TestRequest::post()
        .uri("/create/")
        .cookie(session.clone())
        .set_form([("text", "from beyond")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/auth/login/?next=/create/");
    assert_eq!(site.repos.posts.count(PostFilter::All).await.unwrap(), 0);

    let req = test::TestRequest::get()
        .uri("/follow/")
        .cookie(session.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), "/auth/login/?next=/follow/");

    let req = test::TestRequest::get().uri("/").cookie(session).to_request();
    let html = body_text(test::call_service(&app, req).await).await;
    assert!(html.contains("/auth/login/"));
    assert!(!html.contains("ghost"));
}

#[actix_web::test]
async fn test_signup_refuses_weak_password() {
    let site = site().await;
    let app = app!(site);

    let req = test::TestRequest::post()
        .uri("/auth/signup/")
        .set_form([
            ("username", "ivan"),
            ("password1", "1234"),
            ("password2", "1234"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("This password is too short"));
    assert!(html.contains("This password is entirely numeric."));
    assert!(site.repos.users.find_by_username("ivan").await.unwrap().is_none());
}

#[actix_web::test]
async fn test_signup_login_logout() {
    let site = site().await;
    let app = app!(site);

    let req = test::TestRequest::post()
        .uri("/auth/signup/")
        .set_form([
            ("first_name", "Ivan"),
            ("last_name", "Ivanov"),
            ("username", "ivan"),
            ("email", "ivan@example.com"),
            ("password1", "Yaroslav1"),
            ("password2", "Yaroslav1"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");
    assert!(resp.response().cookies().any(|c| c.name() == SESSION_COOKIE));
    assert!(site.repos.users.find_by_username("ivan").await.unwrap().is_some());

    let req = test::TestRequest::post()
        .uri("/auth/login/")
        .set_form([
            ("username", "ivan"),
            ("password", "Yaroslav1"),
            ("next", "/create/"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), "/create/");
    let session = resp
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .unwrap();

    let req = test::TestRequest::get()
        .uri("/create/")
        .cookie(Cookie::new(SESSION_COOKIE, session))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/auth/logout/").to_request();
    let resp = test::call_service(&app, req).await;
    let removal = resp
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .unwrap();
    assert_eq!(removal.value(), "");
}

#[actix_web::test]
async fn test_bad_login_is_rerendered() {
    let site = site().await;
    let app = app!(site);

    let req = test::TestRequest::post()
        .uri("/auth/login/")
        .set_form([("username", "ghost"), ("password", "whatever1")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Please enter a correct username and password"));
}

#[actix_web::test]
async fn test_login_ignores_foreign_next() {
    let site = site().await;
    let app = app!(site);

    let req = test::TestRequest::post()
        .uri("/auth/signup/")
        .set_form([
            ("username", "ivan"),
            ("password1", "Yaroslav1"),
            ("password2", "Yaroslav1"),
        ])
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/auth/login/")
        .set_form([
            ("username", "ivan"),
            ("password", "Yaroslav1"),
            ("next", "https://evil.example/"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(location(&resp), "/");
}

#[actix_web::test]
async fn test_password_change() {
    let site = site().await;
    let app = app!(site);
    let user = site
        .state
        .accounts
        .signup(NewUser {
            username: "ivan".into(),
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            password: "Yaroslav1".into(),
        })
        .await
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/auth/password_change/")
        .cookie(site.session(&user))
        .set_form([
            ("old_password", "wrong"),
            ("new_password1", "NewSecret42"),
            ("new_password2", "NewSecret42"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/auth/password_change/")
        .cookie(site.session(&user))
        .set_form([
            ("old_password", "Yaroslav1"),
            ("new_password1", "NewSecret42"),
            ("new_password2", "NewSecret42"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), "/auth/password_change/done/");

    assert!(site.state.accounts.authenticate("ivan", "NewSecret42").await.is_ok());
}

#[actix_web::test]
async fn test_health_check() {
    let site = site().await;
    let app = app!(site);

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
}
