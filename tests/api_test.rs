//! End-to-end API tests: the real router driven in-process over a temporary database.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use foodgram::config::Config;
use foodgram::db::{self, Fixture};
use foodgram::routes;
use foodgram::state::{AppState, DbPool};

const PNG_1PX: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

struct TestApp {
    _dir: TempDir,
    app: Router,
    pool: DbPool,
}

fn setup() -> TestApp {
    let dir = TempDir::new().unwrap();
    let pool = db::create_pool(&dir.path().join("test.db")).expect("Failed to create test database");
    db::run_migrations(&pool).expect("Failed to run migrations");

    // Ingredients get ids 1..=3 and tags 1..=2 in fixture order.
    let fixture: Fixture = serde_json::from_value(json!({
        "ingredients": [
            {"name": "мука", "measurement_unit": "г"},
            {"name": "молоко", "measurement_unit": "мл"},
            {"name": "яйца", "measurement_unit": "шт"}
        ],
        "tags": [
            {"name": "Завтрак", "slug": "breakfast", "color": "#E26C2D"},
            {"name": "Ужин", "slug": "dinner", "color": "#8775D2"}
        ]
    }))
    .unwrap();
    db::import_fixture(&pool, &fixture).unwrap();

    let mut config = Config::default();
    config.auth.password_cost = 4;
    config.api.page_size = 10;

    let state = AppState {
        db: pool.clone(),
        config,
        media_dir: dir.path().join("media"),
    };

    TestApp {
        app: routes::app(state),
        pool,
        _dir: dir,
    }
}

impl TestApp {
    async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Vec<u8>) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Token {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    async fn json(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let (status, bytes) = self.request(method, uri, token, body).await;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                panic!("non-JSON body ({}): {}", e, String::from_utf8_lossy(&bytes))
            })
        };
        (status, value)
    }

    /// Register a user and log in; returns `(user_id, token)`.
    async fn user(&self, name: &str) -> (i64, String) {
        let (status, body) = self
            .json(
                Method::POST,
                "/api/users/",
                None,
                Some(json!({
                    "email": format!("{}@example.com", name),
                    "username": name,
                    "first_name": "Имя",
                    "last_name": "Фамилия",
                    "password": "Qwerty123"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
        let id = body["id"].as_i64().unwrap();

        let (status, body) = self
            .json(
                Method::POST,
                "/api/auth/token/login/",
                None,
                Some(json!({"email": format!("{}@example.com", name), "password": "Qwerty123"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        (id, body["auth_token"].as_str().unwrap().to_string())
    }

    async fn create_recipe(&self, token: &str, payload: Value) -> (StatusCode, Value) {
        self.json(Method::POST, "/api/recipes/", Some(token), Some(payload))
            .await
    }

    fn count(&self, sql: &str) -> i64 {
        let conn = self.pool.get().unwrap();
        conn.query_row(sql, [], |r| r.get(0)).unwrap()
    }
}

fn recipe_payload(ingredients: Value, tags: Value) -> Value {
    json!({
        "ingredients": ingredients,
        "tags": tags,
        "image": PNG_1PX,
        "name": "Блины",
        "text": "Смешать и пожарить",
        "cooking_time": 30
    })
}

#[tokio::test]
async fn register_login_and_me() {
    let app = setup();
    let (id, token) = app.user("vasya").await;

    let (status, me) = app.json(Method::GET, "/api/users/me/", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], id);
    assert_eq!(me["username"], "vasya");
    assert_eq!(me["is_subscribed"], false);
    assert!(me.get("password").is_none());

    let (status, _) = app.json(Method::GET, "/api/users/me/", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn registration_response_has_user_shape_without_password() {
    let app = setup();
    let (status, body) = app
        .json(
            Method::POST,
            "/api/users/",
            None,
            Some(json!({
                "email": "vasya@example.com",
                "username": "vasya",
                "first_name": "Вася",
                "last_name": "Пупкин",
                "password": "Qwerty123"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["is_subscribed"], false);
    assert_eq!(body["username"], "vasya");
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn registration_rejects_email_without_domain_dot() {
    let app = setup();
    let (status, body) = app
        .json(
            Method::POST,
            "/api/users/",
            None,
            Some(json!({
                "email": "a@b",
                "username": "vasya",
                "first_name": "Вася",
                "last_name": "Пупкин",
                "password": "Qwerty123"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["email"].is_array());
}

#[tokio::test]
async fn invalid_token_is_rejected_on_public_endpoints() {
    let app = setup();

    let (status, _) = app.json(Method::GET, "/api/recipes/", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .json(Method::GET, "/api/recipes/", Some("not-a-real-token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn registration_rejects_duplicates() {
    let app = setup();
    app.user("vasya").await;

    let (status, body) = app
        .json(
            Method::POST,
            "/api/users/",
            None,
            Some(json!({
                "email": "vasya@example.com",
                "username": "vasya",
                "first_name": "В",
                "last_name": "П",
                "password": "Qwerty123"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["username"].is_array());
    assert!(body["email"].is_array());
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let app = setup();
    app.user("vasya").await;

    let (status, body) = app
        .json(
            Method::POST,
            "/api/auth/token/login/",
            None,
            Some(json!({"email": "vasya@example.com", "password": "wrong"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["non_field_errors"].is_array());
}

#[tokio::test]
async fn logout_revokes_token() {
    let app = setup();
    let (_, token) = app.user("vasya").await;

    let (status, _) = app
        .json(Method::POST, "/api/auth/token/logout/", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.json(Method::GET, "/api/users/me/", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn set_password_requires_current_password() {
    let app = setup();
    let (_, token) = app.user("vasya").await;

    let (status, body) = app
        .json(
            Method::POST,
            "/api/users/set_password/",
            Some(&token),
            Some(json!({"new_password": "N3wPassw0rd", "current_password": "nope"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["current_password"].is_array());

    let (status, _) = app
        .json(
            Method::POST,
            "/api/users/set_password/",
            Some(&token),
            Some(json!({"new_password": "N3wPassw0rd", "current_password": "Qwerty123"})),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .json(
            Method::POST,
            "/api/auth/token/login/",
            None,
            Some(json!({"email": "vasya@example.com", "password": "N3wPassw0rd"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn create_recipe_renders_full_shape() {
    let app = setup();
    let (author_id, token) = app.user("chef").await;

    let (status, recipe) = app
        .create_recipe(
            &token,
            recipe_payload(json!([{"id": 1, "amount": 200}, {"id": 2, "amount": 500}]), json!([1])),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", recipe);
    assert_eq!(recipe["author"]["id"], author_id);
    assert_eq!(recipe["name"], "Блины");
    assert_eq!(recipe["cooking_time"], 30);
    assert_eq!(recipe["tags"][0]["slug"], "breakfast");
    assert_eq!(recipe["ingredients"][0]["name"], "мука");
    assert_eq!(recipe["ingredients"][0]["measurement_unit"], "г");
    assert_eq!(recipe["ingredients"][1]["amount"], 500);
    assert_eq!(recipe["is_favorited"], false);
    assert_eq!(recipe["is_in_shopping_cart"], false);

    let image = recipe["image"].as_str().unwrap();
    assert!(image.starts_with("/media/recipes/images/"));
    let (status, bytes) = app.request(Method::GET, image, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(bytes.starts_with(b"\x89PNG"));
}

#[tokio::test]
async fn create_requires_authentication() {
    let app = setup();
    let (status, _) = app
        .json(
            Method::POST,
            "/api/recipes/",
            None,
            Some(recipe_payload(json!([{"id": 1, "amount": 1}]), json!([1]))),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_ingredients_are_rejected_without_side_effects() {
    let app = setup();
    let (_, token) = app.user("chef").await;

    let cases = [
        (
            json!([{"id": 1, "amount": 0}]),
            "Количество должно быть равным или больше 1!",
        ),
        (json!([{"id": 404, "amount": 5}]), "Данного продукта нет в базе!"),
        (
            json!([{"id": 1, "amount": 5}, {"id": 1, "amount": 7}]),
            "Эти продукты уже были в рецепте!",
        ),
    ];

    for (ingredients, message) in cases {
        let (status, body) = app
            .create_recipe(&token, recipe_payload(ingredients, json!([1])))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
        assert_eq!(body["ingredients"][0], message);
    }

    assert_eq!(app.count("SELECT COUNT(*) FROM recipes"), 0);
    assert_eq!(app.count("SELECT COUNT(*) FROM ingredient_recipes"), 0);
    assert_eq!(app.count("SELECT COUNT(*) FROM tag_recipes"), 0);
}

#[tokio::test]
async fn mistyped_fields_are_field_errors() {
    let app = setup();
    let (_, token) = app.user("chef").await;

    for amount in [json!("abc"), json!(1.5)] {
        let (status, body) = app
            .create_recipe(
                &token,
                recipe_payload(json!([{"id": 1, "amount": amount}]), json!([1])),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
        assert!(body["ingredients"].is_array(), "{}", body);
    }

    let (status, bytes) = app
        .request(Method::POST, "/api/recipes/", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["non_field_errors"].is_array());

    assert_eq!(app.count("SELECT COUNT(*) FROM recipes"), 0);
}

#[tokio::test]
async fn oversized_amounts_cannot_break_the_shopping_list() {
    let app = setup();
    let (_, token) = app.user("chef").await;

    let (status, body) = app
        .create_recipe(
            &token,
            recipe_payload(json!([{"id": 1, "amount": i64::MAX / 2 + 1}]), json!([])),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["ingredients"][0], "Количество должно быть не больше 32767!");

    for _ in 0..2 {
        let (status, recipe) = app
            .create_recipe(&token, recipe_payload(json!([{"id": 1, "amount": 32767}]), json!([])))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        app.json(
            Method::POST,
            &format!("/api/recipes/{}/shopping_cart/", recipe["id"]),
            Some(&token),
            None,
        )
        .await;
    }

    let (status, bytes) = app
        .request(Method::GET, "/api/recipes/download_shopping_cart/", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(bytes).unwrap().contains("1. мука (г) - 65534"));
}

#[tokio::test]
async fn update_replaces_relations_and_is_author_only() {
    let app = setup();
    let (_, token) = app.user("chef").await;
    let (_, other) = app.user("critic").await;

    let (_, recipe) = app
        .create_recipe(
            &token,
            recipe_payload(json!([{"id": 1, "amount": 200}, {"id": 2, "amount": 500}]), json!([1, 2])),
        )
        .await;
    let id = recipe["id"].as_i64().unwrap();
    let uri = format!("/api/recipes/{}/", id);

    let mut update = recipe_payload(json!([{"id": 3, "amount": 2}]), json!([2]));
    update["name"] = json!("Омлет");
    update.as_object_mut().unwrap().remove("image");

    let (status, _) = app
        .json(Method::PATCH, &uri, Some(&other), Some(update.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, updated) = app.json(Method::PATCH, &uri, Some(&token), Some(update)).await;
    assert_eq!(status, StatusCode::OK, "{}", updated);
    assert_eq!(updated["name"], "Омлет");
    assert_eq!(updated["image"], recipe["image"]);
    assert_eq!(updated["ingredients"].as_array().unwrap().len(), 1);
    assert_eq!(updated["ingredients"][0]["id"], 3);
    assert_eq!(updated["tags"].as_array().unwrap().len(), 1);
    assert_eq!(updated["tags"][0]["id"], 2);

    assert_eq!(app.count("SELECT COUNT(*) FROM ingredient_recipes"), 1);
    assert_eq!(app.count("SELECT COUNT(*) FROM tag_recipes"), 1);

    let mut bad = recipe_payload(json!([{"id": 1, "amount": -3}]), json!([1]));
    bad.as_object_mut().unwrap().remove("image");
    let (status, _) = app.json(Method::PATCH, &uri, Some(&token), Some(bad)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.count("SELECT COUNT(*) FROM ingredient_recipes"), 1);
}

#[tokio::test]
async fn delete_is_author_only() {
    let app = setup();
    let (_, token) = app.user("chef").await;
    let (_, other) = app.user("critic").await;
    let (_, recipe) = app
        .create_recipe(&token, recipe_payload(json!([{"id": 1, "amount": 1}]), json!([])))
        .await;
    let uri = format!("/api/recipes/{}/", recipe["id"]);

    let (status, _) = app.json(Method::DELETE, &uri, Some(&other), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.json(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.json(Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn membership_flags_follow_the_requester() {
    let app = setup();
    let (author_id, author) = app.user("chef").await;
    let (_, fan) = app.user("fan").await;
    let (_, recipe) = app
        .create_recipe(&author, recipe_payload(json!([{"id": 1, "amount": 1}]), json!([1])))
        .await;
    let id = recipe["id"].as_i64().unwrap();

    let (status, short) = app
        .json(Method::POST, &format!("/api/recipes/{}/favorite/", id), Some(&fan), None)
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(short["id"], id);
    assert_eq!(short["name"], "Блины");
    assert!(short.get("text").is_none());

    app.json(Method::POST, &format!("/api/recipes/{}/shopping_cart/", id), Some(&fan), None)
        .await;
    app.json(Method::POST, &format!("/api/users/{}/subscribe/", author_id), Some(&fan), None)
        .await;

    let uri = format!("/api/recipes/{}/", id);
    let (_, seen_by_fan) = app.json(Method::GET, &uri, Some(&fan), None).await;
    assert_eq!(seen_by_fan["is_favorited"], true);
    assert_eq!(seen_by_fan["is_in_shopping_cart"], true);
    assert_eq!(seen_by_fan["author"]["is_subscribed"], true);

    let (_, anonymous) = app.json(Method::GET, &uri, None, None).await;
    assert_eq!(anonymous["is_favorited"], false);
    assert_eq!(anonymous["is_in_shopping_cart"], false);
    assert_eq!(anonymous["author"]["is_subscribed"], false);

    let (_, seen_by_author) = app.json(Method::GET, &uri, Some(&author), None).await;
    assert_eq!(seen_by_author["is_favorited"], false);
}

#[tokio::test]
async fn favorites_reject_duplicates_and_missing_rows() {
    let app = setup();
    let (_, token) = app.user("chef").await;
    let (_, recipe) = app
        .create_recipe(&token, recipe_payload(json!([{"id": 1, "amount": 1}]), json!([])))
        .await;
    let uri = format!("/api/recipes/{}/favorite/", recipe["id"]);

    let (status, _) = app.json(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.json(Method::POST, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = app.json(Method::POST, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"], "Рецепт уже добавлен в избранное!");

    let (status, _) = app.json(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .json(Method::POST, "/api/recipes/9999/favorite/", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn recipe_list_filters_and_paginates() {
    let app = setup();
    let (chef_id, chef) = app.user("chef").await;
    let (_, fan) = app.user("fan").await;

    let (_, breakfast) = app
        .create_recipe(&chef, recipe_payload(json!([{"id": 1, "amount": 1}]), json!([1])))
        .await;
    let (_, dinner) = app
        .create_recipe(&chef, recipe_payload(json!([{"id": 2, "amount": 1}]), json!([2])))
        .await;
    app.create_recipe(&fan, recipe_payload(json!([{"id": 3, "amount": 1}]), json!([])))
        .await;

    let (_, all) = app.json(Method::GET, "/api/recipes/?limit=2", None, None).await;
    assert_eq!(all["count"], 3);
    assert_eq!(all["results"].as_array().unwrap().len(), 2);
    assert_eq!(all["next"], "?page=2&limit=2");
    assert!(all["previous"].is_null());

    let (_, by_author) = app
        .json(Method::GET, &format!("/api/recipes/?author={}", chef_id), None, None)
        .await;
    assert_eq!(by_author["count"], 2);

    let (_, by_tags) = app
        .json(Method::GET, "/api/recipes/?tags=breakfast&tags=dinner", None, None)
        .await;
    assert_eq!(by_tags["count"], 2);
    assert_eq!(by_tags["results"][0]["id"], dinner["id"]);
    assert_eq!(by_tags["results"][1]["id"], breakfast["id"]);

    app.json(
        Method::POST,
        &format!("/api/recipes/{}/favorite/", breakfast["id"]),
        Some(&fan),
        None,
    )
    .await;
    let (_, favorited) = app
        .json(Method::GET, "/api/recipes/?is_favorited=1", Some(&fan), None)
        .await;
    assert_eq!(favorited["count"], 1);
    assert_eq!(favorited["results"][0]["id"], breakfast["id"]);
}

#[tokio::test]
async fn subscriptions_lifecycle() {
    let app = setup();
    let (author_id, author) = app.user("chef").await;
    let (reader_id, reader) = app.user("reader").await;
    for _ in 0..3 {
        app.create_recipe(&author, recipe_payload(json!([{"id": 1, "amount": 1}]), json!([])))
            .await;
    }

    let (status, body) = app
        .json(Method::POST, &format!("/api/users/{}/subscribe/", reader_id), Some(&reader), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"], "Нельзя подписаться на самого себя!");

    let subscribe = format!("/api/users/{}/subscribe/?recipes_limit=2", author_id);
    let (status, body) = app.json(Method::POST, &subscribe, Some(&reader), None).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["id"], author_id);
    assert_eq!(body["is_subscribed"], true);
    assert_eq!(body["recipes"].as_array().unwrap().len(), 2);
    assert_eq!(body["recipes_count"], 3);

    let (status, _) = app.json(Method::POST, &subscribe, Some(&reader), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, list) = app
        .json(Method::GET, "/api/users/subscriptions/?recipes_limit=1", Some(&reader), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["count"], 1);
    assert_eq!(list["results"][0]["username"], "chef");
    assert_eq!(list["results"][0]["recipes"].as_array().unwrap().len(), 1);

    let unsubscribe = format!("/api/users/{}/subscribe/", author_id);
    let (status, _) = app.json(Method::DELETE, &unsubscribe, Some(&reader), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.json(Method::DELETE, &unsubscribe, Some(&reader), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn shopping_cart_download_sums_amounts() {
    let app = setup();
    let (_, token) = app.user("chef").await;
    let (_, first) = app
        .create_recipe(
            &token,
            recipe_payload(json!([{"id": 1, "amount": 200}, {"id": 3, "amount": 2}]), json!([])),
        )
        .await;
    let (_, second) = app
        .create_recipe(&token, recipe_payload(json!([{"id": 1, "amount": 100}]), json!([])))
        .await;
    for recipe in [&first, &second] {
        let (status, _) = app
            .json(
                Method::POST,
                &format!("/api/recipes/{}/shopping_cart/", recipe["id"]),
                Some(&token),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, bytes) = app
        .request(Method::GET, "/api/recipes/download_shopping_cart/", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.contains("1. мука (г) - 300"), "{}", text);
    assert!(text.contains("2. яйца (шт) - 2"), "{}", text);
}

#[tokio::test]
async fn catalog_endpoints() {
    let app = setup();

    let (status, tags) = app.json(Method::GET, "/api/tags/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tags.as_array().unwrap().len(), 2);
    assert_eq!(tags[0]["color"], "#E26C2D");

    let (_, found) = app
        .json(Method::GET, "/api/ingredients/?name=%D0%9C", None, None)
        .await;
    let names: Vec<&str> = found
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["молоко", "мука"]);

    let (status, _) = app.json(Method::GET, "/api/ingredients/99/", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
