//! Store tests against a real Postgres.
//!
//! Each test creates a fresh database from `configuration.yaml` / `APP_DATABASE__*`
//! and runs the migrations. Run with `cargo test -- --ignored` once Postgres is up.

use sqlx::{Connection, Executor, PgConnection, PgPool};
use todoapp::auth::{Claims, OwnerScope};
use todoapp::configuration::{get_configuration, DatabaseSettings};
use todoapp::error::{AppError, DatabaseError};
use todoapp::store::{NewTodo, NewUser, PgStore, TodoStore, TodoUpdate, UserStore};

pub async fn configure_database(config: &DatabaseSettings) -> PgPool {
    // Create database
    let mut connection = PgConnection::connect(&config.connection_string_without_db())
        .await
        .expect("Failed to connect to Postgres");
    connection
        .execute(&*format!(r#"CREATE DATABASE "{}";"#, config.database_name))
        .await
        .expect("Failed to create database.");
    // Migrate database
    let connection_pool = PgPool::connect(&config.connection_string())
        .await
        .expect("Failed to connect to Postgres.");
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database.");
    connection_pool
}

async fn spawn_store() -> PgStore {
    let mut configuration = get_configuration().expect("Failed to read configuration.");
    configuration.database.database_name = uuid::Uuid::new_v4().to_string();
    PgStore::new(configure_database(&configuration.database).await)
}

fn new_user(username: &str) -> NewUser {
    NewUser {
        email: format!("{}@example.com", username),
        username: username.to_string(),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        hashed_password: "$2b$04$placeholderplaceholderplaceholderplaceholderplace".to_string(),
        is_active: true,
        role: "user".to_string(),
        phone_number: None,
    }
}

fn scope(owner_id: i64) -> OwnerScope {
    OwnerScope::of(&Claims {
        sub: "owner".to_string(),
        id: owner_id,
        role: "user".to_string(),
        exp: 0,
        iat: 0,
    })
}

fn new_todo(title: &str, priority: i32) -> NewTodo {
    NewTodo {
        title: title.to_string(),
        description: "description".to_string(),
        priority,
    }
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn users_round_trip_through_postgres() {
    let store = spawn_store().await;

    let id = store.insert_user(new_user("alice")).await.unwrap();
    assert!(id > 0);

    let user = store.find_user_by_username("alice").await.unwrap().unwrap();
    assert_eq!(user.id, id);
    assert!(user.is_active);
    assert!(user.phone_number.is_none());
    assert!(store.find_user_by_username("nobody").await.unwrap().is_none());

    assert!(store.update_phone_number(id, "5555555555").await.unwrap());
    assert!(store.update_password_hash(id, "$2b$04$other").await.unwrap());
    assert!(!store.update_phone_number(id + 100, "5555555555").await.unwrap());

    let user = store.find_user_by_id(id).await.unwrap().unwrap();
    assert_eq!(user.phone_number.as_deref(), Some("5555555555"));
    assert_eq!(user.hashed_password, "$2b$04$other");
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn duplicate_username_is_a_unique_violation() {
    let store = spawn_store().await;
    store.insert_user(new_user("alice")).await.unwrap();

    let err = store.insert_user(new_user("alice")).await.unwrap_err();
    assert!(
        matches!(err, AppError::Database(DatabaseError::UniqueConstraintViolation(_))),
        "unexpected error: {:?}",
        err
    );
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn todos_are_invisible_to_other_owners() {
    let store = spawn_store().await;
    let alice = store.insert_user(new_user("alice")).await.unwrap();
    let bob = store.insert_user(new_user("bob")).await.unwrap();

    let todo = store.insert_todo(scope(alice), new_todo("alice's", 3)).await.unwrap();
    assert!(!todo.complete);
    assert_eq!(todo.owner_id, alice);

    assert_eq!(store.find_todo(scope(bob), todo.id).await.unwrap(), None);
    assert!(store.list_todos(scope(bob)).await.unwrap().is_empty());

    let update = TodoUpdate {
        title: "stolen".to_string(),
        description: "stolen".to_string(),
        priority: 1,
        complete: true,
    };
    assert_eq!(store.update_todo(scope(bob), todo.id, update).await.unwrap(), None);
    assert!(!store.delete_todo(scope(bob), todo.id).await.unwrap());

    // Untouched for the owner
    assert_eq!(
        store.find_todo(scope(alice), todo.id).await.unwrap(),
        Some(todo.clone())
    );

    let update = TodoUpdate {
        title: "renamed".to_string(),
        description: "changed".to_string(),
        priority: 5,
        complete: true,
    };
    let updated = store
        .update_todo(scope(alice), todo.id, update)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.title, "renamed");
    assert!(updated.complete);

    assert!(store.delete_todo(scope(alice), todo.id).await.unwrap());
    assert!(store.list_todos(scope(alice)).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn admin_operations_span_owners() {
    let store = spawn_store().await;
    let alice = store.insert_user(new_user("alice")).await.unwrap();
    let bob = store.insert_user(new_user("bob")).await.unwrap();

    let first = store.insert_todo(scope(alice), new_todo("one", 2)).await.unwrap();
    store.insert_todo(scope(bob), new_todo("two", 4)).await.unwrap();

    assert_eq!(store.list_all_todos().await.unwrap().len(), 2);
    assert!(store.delete_any_todo(first.id).await.unwrap());
    assert!(!store.delete_any_todo(first.id).await.unwrap());
    assert!(!store.delete_any_todo(9999).await.unwrap());
    assert_eq!(store.list_all_todos().await.unwrap().len(), 1);
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn schema_constraints_hold() {
    let store = spawn_store().await;
    let alice = store.insert_user(new_user("alice")).await.unwrap();

    assert!(store.insert_todo(scope(alice), new_todo("bad", 6)).await.is_err());
    assert!(store.insert_todo(scope(alice + 100), new_todo("orphan", 3)).await.is_err());

    let mut empty_hash = new_user("bob");
    empty_hash.hashed_password = String::new();
    assert!(store.insert_user(empty_hash).await.is_err());
}
