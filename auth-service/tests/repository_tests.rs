//! Postgres repository tests. Run with a database on `DATABASE_URL`:
//! `cargo test --test repository_tests -- --ignored`

mod common;

use auth_service::domain::role::errors::RoleError;
use auth_service::domain::role::models::RoleName;
use auth_service::domain::role::ports::RoleRepository;
use auth_service::domain::session::models::ClientContext;
use auth_service::domain::session::models::Session;
use auth_service::domain::session::ports::SessionRepository;
use auth_service::domain::user::errors::UserError;
use auth_service::domain::user::models::EmailAddress;
use auth_service::domain::user::models::Pagination;
use auth_service::domain::user::models::User;
use auth_service::domain::user::models::Username;
use auth_service::domain::user::ports::UserRepository;
use auth_service::outbound::repositories::role::PostgresRoleRepository;
use auth_service::outbound::repositories::session::PostgresSessionRepository;
use auth_service::outbound::repositories::user::PostgresUserRepository;
use chrono::Duration;
use chrono::Utc;
use common::TestDb;

fn new_user(email: &str, username: &str) -> User {
    User::new(
        EmailAddress::new(email.to_string()).unwrap(),
        Username::new(username.to_string()).unwrap(),
        "$argon2id$v=19$m=1024,t=1,p=1$c2FsdHNhbHQ$aGFzaGhhc2g".to_string(),
        None,
        None,
    )
}

fn new_session(user: &User, token: &str) -> Session {
    Session::new(
        user.id,
        token.to_string(),
        &ClientContext::default(),
        Duration::days(7),
    )
}

#[tokio::test]
#[ignore]
async fn test_create_with_session_and_lookups() {
    let db = TestDb::new().await;
    let users = PostgresUserRepository::new(db.pool.clone());
    let sessions = PostgresSessionRepository::new(db.pool.clone());

    let user = new_user("a@x.com", "alice");
    let session = new_session(&user, "token-a");
    users
        .create_with_session(user.clone(), session.clone())
        .await
        .unwrap();

    let found = users.find_by_email(&user.email).await.unwrap().unwrap();
    assert_eq!(found.id, user.id);
    assert!(users.exists_by_username(&user.username).await.unwrap());

    let stored = sessions
        .find_by_refresh_token("token-a")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.user_id, user.id);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_email_rolls_back_session() {
    let db = TestDb::new().await;
    let users = PostgresUserRepository::new(db.pool.clone());
    let sessions = PostgresSessionRepository::new(db.pool.clone());

    let first = new_user("a@x.com", "alice");
    users
        .create_with_session(first.clone(), new_session(&first, "token-a"))
        .await
        .unwrap();

    let second = new_user("a@x.com", "alice2");
    let err = users
        .create_with_session(second.clone(), new_session(&second, "token-b"))
        .await
        .unwrap_err();

    assert!(matches!(err, UserError::EmailAlreadyExists(_)));
    assert!(sessions
        .find_by_refresh_token("token-b")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
#[ignore]
async fn test_soft_delete_hides_user_and_frees_email() {
    let db = TestDb::new().await;
    let users = PostgresUserRepository::new(db.pool.clone());

    let user = new_user("a@x.com", "alice");
    users
        .create_with_session(user.clone(), new_session(&user, "token-a"))
        .await
        .unwrap();

    users.delete(&user.id).await.unwrap();

    assert!(users.find_by_id(&user.id).await.unwrap().is_none());
    assert_eq!(users.count().await.unwrap(), 0);
    assert!(matches!(
        users.delete(&user.id).await.unwrap_err(),
        UserError::NotFound(_)
    ));

    let again = new_user("a@x.com", "alice");
    users
        .create_with_session(again.clone(), new_session(&again, "token-b"))
        .await
        .unwrap();
    let page = users.list(&Pagination::default()).await.unwrap();
    assert_eq!(page.len(), 1);
}

#[tokio::test]
#[ignore]
async fn test_delete_expired_includes_boundary() {
    let db = TestDb::new().await;
    let users = PostgresUserRepository::new(db.pool.clone());
    let sessions = PostgresSessionRepository::new(db.pool.clone());

    let user = new_user("a@x.com", "alice");
    let mut expiring = new_session(&user, "token-a");
    let now = Utc::now();
    expiring.expires_at = now;
    users
        .create_with_session(user.clone(), expiring)
        .await
        .unwrap();
    sessions.create(new_session(&user, "token-b")).await.unwrap();

    assert_eq!(sessions.delete_expired(now).await.unwrap(), 1);
    assert_eq!(
        sessions.find_active_by_user(&user.id, now).await.unwrap().len(),
        1
    );
}

#[tokio::test]
#[ignore]
async fn test_seeded_roles_and_assignment() {
    let db = TestDb::new().await;
    let users = PostgresUserRepository::new(db.pool.clone());
    let roles = PostgresRoleRepository::new(db.pool.clone());

    let names: Vec<String> = roles
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|role| role.name.as_str().to_string())
        .collect();
    assert_eq!(names, vec!["admin", "moderator", "user"]);

    let user = new_user("a@x.com", "alice");
    users
        .create_with_session(user.clone(), new_session(&user, "token-a"))
        .await
        .unwrap();

    let role = roles
        .find_by_name(&RoleName::new("user".to_string()).unwrap())
        .await
        .unwrap()
        .unwrap();
    roles.assign_to_user(&user.id, &role.id).await.unwrap();
    roles.assign_to_user(&user.id, &role.id).await.unwrap();
    assert_eq!(roles.roles_for_user(&user.id).await.unwrap().len(), 1);

    roles.remove_from_user(&user.id, &role.id).await.unwrap();
    assert!(matches!(
        roles.remove_from_user(&user.id, &role.id).await.unwrap_err(),
        RoleError::NotAssigned
    ));
}
