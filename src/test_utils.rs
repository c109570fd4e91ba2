//! Helpers shared by the unit and HTTP tests.

use axum::{
    Router,
    extract::{Path, State},
    routing::post,
};
use axum_extra::extract::{PrivateCookieJar, cookie::Cookie};
use axum_test::TestServer;
use rusqlite::Connection;

use crate::{
    AppState, Error, build_router,
    auth::{COOKIE_TOKEN, NewUser, UserID, create_user, set_auth_cookie},
    db::initialize,
};

/// An in-memory database with every table created.
pub(crate) fn get_test_connection() -> Connection {
    let conn = Connection::open_in_memory().expect("Could not create in-memory SQLite database");
    initialize(&conn).expect("Could not initialize database");
    conn
}

pub(crate) fn create_test_user(conn: &Connection, email: &str) -> UserID {
    create_user(
        NewUser {
            name: "Test User".to_owned(),
            email: email.to_owned(),
            password_hash: "hunter2".to_owned(),
            profile_image_url: None,
        },
        conn,
    )
    .expect("Could not create test user")
    .id
}

/// A test server over the full router with a logged in user.
pub(crate) struct TestApp {
    pub server: TestServer,
    pub user_id: UserID,
    /// The auth cookie of `user_id`.
    pub cookie: Cookie<'static>,
}

const TEST_LOG_IN_ROUTE: &str = "/test/log_in/{user_id}";

async fn stub_log_in_route(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    jar: PrivateCookieJar,
) -> Result<PrivateCookieJar, Error> {
    set_auth_cookie(jar, UserID::new(user_id), state.cookie_duration)
}

pub(crate) async fn get_test_app() -> TestApp {
    let state = AppState::new(
        Connection::open_in_memory().expect("Could not create in-memory SQLite database"),
        "test secret",
        "Etc/UTC",
    )
    .expect("Could not create app state");

    let user_id = {
        let connection = state.db_connection.lock().unwrap();
        create_test_user(&connection, "test@example.com")
    };

    let log_in_router = Router::new()
        .route(TEST_LOG_IN_ROUTE, post(stub_log_in_route))
        .with_state(state.clone());
    let app = build_router(state).merge(log_in_router);
    let server = TestServer::try_new(app).expect("Could not create test server.");

    let response = server
        .post(&format!("/test/log_in/{}", user_id.as_i64()))
        .await;
    response.assert_status_ok();
    let cookie = response.cookie(COOKIE_TOKEN);

    TestApp {
        server,
        user_id,
        cookie,
    }
}
