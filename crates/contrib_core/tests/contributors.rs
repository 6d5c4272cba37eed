use contrib_core::db::open_db_in_memory;
use contrib_core::{
    Contributor, ContributorRepository, ContributorService, ContributorValidationError,
    KeySalt, Project, ProjectRepository, RepoError, SqliteContributorRepository,
    SqliteProjectRepository, SqliteUserRepository, User, UserKey, UserRepository,
};
use rusqlite::Connection;
use uuid::Uuid;

fn seed_user(conn: &Connection, email: &str) -> UserKey {
    SqliteUserRepository::new(conn)
        .get_or_insert_user(&User::from_google(email), &KeySalt::default())
        .unwrap()
        .key
}

fn seed_project(conn: &Connection, name: &str, owner: &UserKey) {
    SqliteProjectRepository::new(conn)
        .create_project(&Project::new(name, owner.clone()))
        .unwrap();
}

fn service(
    conn: &Connection,
) -> ContributorService<
    SqliteContributorRepository<'_>,
    SqliteUserRepository<'_>,
    SqliteProjectRepository<'_>,
> {
    ContributorService::new(
        SqliteContributorRepository::new(conn),
        SqliteUserRepository::new(conn),
        SqliteProjectRepository::new(conn),
    )
}

#[test]
fn new_contributor_defaults_to_inactive_without_role() {
    let contributor = Contributor::new(UserKey::parse("44954084").unwrap(), "acme");
    assert!(!contributor.id.is_nil());
    assert!(!contributor.is_active);
    assert_eq!(contributor.role, None);
}

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let alice = seed_user(&conn, "alice@example.com");
    seed_project(&conn, "acme", &alice);
    let repo = SqliteContributorRepository::new(&conn);

    let mut contributor = Contributor::new(alice.clone(), "acme");
    contributor.is_active = true;
    contributor.role = Some("Founder".to_string());
    let id = repo.create_contributor(&contributor).unwrap();

    let loaded = repo.get_contributor(id).unwrap().unwrap();
    assert_eq!(loaded, contributor);
    assert_eq!(
        repo.find_contributor(&alice, "acme").unwrap().map(|c| c.id),
        Some(id)
    );
}

#[test]
fn duplicate_user_project_pair_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let alice = seed_user(&conn, "alice@example.com");
    seed_project(&conn, "acme", &alice);
    let repo = SqliteContributorRepository::new(&conn);

    repo.create_contributor(&Contributor::new(alice.clone(), "acme"))
        .unwrap();
    let err = repo
        .create_contributor(&Contributor::new(alice.clone(), "acme"))
        .unwrap_err();
    assert!(matches!(err, RepoError::AlreadyExists(_)));
    assert_eq!(repo.list_contributors_for_user(&alice).unwrap().len(), 1);
}

#[test]
fn create_requires_existing_user_and_project() {
    let conn = open_db_in_memory().unwrap();
    let alice = seed_user(&conn, "alice@example.com");
    let repo = SqliteContributorRepository::new(&conn);

    let err = repo
        .create_contributor(&Contributor::new(alice.clone(), "missing"))
        .unwrap_err();
    assert!(matches!(err, RepoError::ProjectNotFound(_)));

    seed_project(&conn, "acme", &alice);
    let ghost = UserKey::parse("deadbeef").unwrap();
    let err = repo
        .create_contributor(&Contributor::new(ghost, "acme"))
        .unwrap_err();
    assert!(matches!(err, RepoError::UserNotFound(_)));
}

#[test]
fn nil_id_fails_validation() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContributorRepository::new(&conn);
    let mut contributor = Contributor::new(UserKey::parse("44954084").unwrap(), "acme");
    contributor.id = Uuid::nil();

    let err = repo.create_contributor(&contributor).unwrap_err();
    assert!(matches!(
        err,
        RepoError::ContributorValidation(ContributorValidationError::NilId)
    ));
}

#[test]
fn update_missing_contributor_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContributorRepository::new(&conn);
    let contributor = Contributor::new(UserKey::parse("44954084").unwrap(), "acme");

    let err = repo.update_contributor(&contributor).unwrap_err();
    assert!(matches!(err, RepoError::ContributorNotFound(id) if id == contributor.id));
}

#[test]
fn lists_are_scoped_and_ordered() {
    let conn = open_db_in_memory().unwrap();
    let alice = seed_user(&conn, "alice@example.com");
    let bob = seed_user(&conn, "bob@example.com");
    seed_project(&conn, "acme", &alice);
    seed_project(&conn, "beta", &alice);
    let service = service(&conn);

    service.add_contributor(&alice, "beta", None, true).unwrap();
    service.add_contributor(&alice, "acme", None, true).unwrap();
    service.add_contributor(&bob, "acme", None, false).unwrap();

    let projects: Vec<String> = service
        .contributions_of_user(&alice)
        .unwrap()
        .into_iter()
        .map(|c| c.project)
        .collect();
    assert_eq!(projects, vec!["acme", "beta"]);

    let mut expected_users = vec![alice.clone(), bob.clone()];
    expected_users.sort();
    let users: Vec<UserKey> = service
        .contributors_of_project("acme")
        .unwrap()
        .into_iter()
        .map(|c| c.user)
        .collect();
    assert_eq!(users, expected_users);
}

#[test]
fn service_updates_role_and_activity_and_dereferences_links() {
    let conn = open_db_in_memory().unwrap();
    let alice = seed_user(&conn, "alice@example.com");
    seed_project(&conn, "acme", &alice);
    let service = service(&conn);

    let added = service
        .add_contributor(&alice, "acme", Some("Founder".to_string()), false)
        .unwrap();
    service.set_active(added.id, true).unwrap();
    let renamed = service
        .set_role(added.id, Some("Maintainer".to_string()))
        .unwrap();
    assert!(renamed.is_active);

    let stored = service.get_contributor(added.id).unwrap().unwrap();
    assert!(stored.is_active);
    assert_eq!(stored.role.as_deref(), Some("Maintainer"));

    assert_eq!(service.user_of(&stored).unwrap().key, alice);
    assert_eq!(service.project_of(&stored).unwrap().name, "acme");

    let err = service.set_active(Uuid::new_v4(), true).unwrap_err();
    assert!(matches!(err, RepoError::ContributorNotFound(_)));
}
