use contrib_core::db::open_db_in_memory;
use contrib_core::{
    FixedClock, KeySalt, Project, ProjectRepository, ProjectService, ProjectValidationError,
    RepoError, SqliteProjectRepository, SqliteUserRepository, User, UserKey, UserRepository,
};
use rusqlite::Connection;

fn seed_owner(conn: &Connection, email: &str) -> UserKey {
    SqliteUserRepository::new(conn)
        .get_or_insert_user(&User::from_google(email), &KeySalt::default())
        .unwrap()
        .key
}

#[test]
fn display_name_prefers_pretty_name() {
    let owner = UserKey::parse("44954084").unwrap();
    let mut project = Project::new("acme", owner);
    assert_eq!(project.name(), "acme");
    assert_eq!(project.display_name(), "acme");

    project.pretty_name = Some("ACME Corp".to_string());
    assert_eq!(project.display_name(), "ACME Corp");

    project.pretty_name = Some(String::new());
    assert_eq!(project.display_name(), "acme");
}

#[test]
fn new_project_has_empty_metadata() {
    let project = Project::new("acme", UserKey::parse("44954084").unwrap());
    assert_eq!(project.how_to, "");
    assert_eq!(project.code_repo, "");
    assert_eq!(project.home_page, "");
    assert_eq!(project.bug_tracker, "");
    assert_eq!(project.irc_channel, "");
    assert_eq!(project.mailing_list, "");
    assert_eq!(project.last_edit_short(), None);
}

#[test]
fn create_sets_last_edit_and_roundtrips() {
    let conn = open_db_in_memory().unwrap();
    let owner = seed_owner(&conn, "alice@example.com");
    let repo = SqliteProjectRepository::with_clock(&conn, FixedClock(1_268_579_366_000));

    let mut project = Project::new("acme", owner.clone());
    project.code_repo = "https://git.example/acme".to_string();
    let created = repo.create_project(&project).unwrap();
    assert_eq!(created.last_edit, Some(1_268_579_366_000));
    assert_eq!(created.last_edit_short().as_deref(), Some("2010-03-14"));

    let loaded = repo.get_project("acme").unwrap().unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.owner, owner);
}

#[test]
fn create_with_taken_name_returns_already_exists() {
    let conn = open_db_in_memory().unwrap();
    let owner = seed_owner(&conn, "alice@example.com");
    let repo = SqliteProjectRepository::new(&conn);

    repo.create_project(&Project::new("acme", owner.clone()))
        .unwrap();
    let err = repo
        .create_project(&Project::new("acme", owner))
        .unwrap_err();
    assert!(matches!(err, RepoError::AlreadyExists(_)));
}

#[test]
fn create_with_unknown_owner_returns_user_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProjectRepository::new(&conn);
    let ghost = UserKey::parse("deadbeef").unwrap();

    let err = repo
        .create_project(&Project::new("acme", ghost.clone()))
        .unwrap_err();
    assert!(matches!(err, RepoError::UserNotFound(key) if key == ghost));
}

#[test]
fn invalid_names_are_rejected_before_sql() {
    let conn = open_db_in_memory().unwrap();
    let owner = seed_owner(&conn, "alice@example.com");
    let repo = SqliteProjectRepository::new(&conn);

    let err = repo
        .create_project(&Project::new("  ", owner.clone()))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::ProjectValidation(ProjectValidationError::EmptyName)
    ));

    let err = repo
        .create_project(&Project::new("a/b", owner))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::ProjectValidation(ProjectValidationError::InvalidName(_))
    ));
}

#[test]
fn update_bumps_last_edit_and_writes_metadata() {
    let conn = open_db_in_memory().unwrap();
    let owner = seed_owner(&conn, "alice@example.com");
    let created = SqliteProjectRepository::with_clock(&conn, FixedClock(1_000))
        .create_project(&Project::new("acme", owner))
        .unwrap();

    let mut edited = created.clone();
    edited.pretty_name = Some("ACME Corp".to_string());
    edited.irc_channel = "#acme".to_string();
    let repo = SqliteProjectRepository::with_clock(&conn, FixedClock(2_000));
    let updated = repo.update_project(&edited).unwrap();
    assert_eq!(updated.last_edit, Some(2_000));

    let loaded = repo.get_project("acme").unwrap().unwrap();
    assert_eq!(loaded.display_name(), "ACME Corp");
    assert_eq!(loaded.irc_channel, "#acme");
    assert_eq!(loaded.last_edit, Some(2_000));
}

#[test]
fn update_missing_project_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let owner = seed_owner(&conn, "alice@example.com");
    let repo = SqliteProjectRepository::new(&conn);

    let err = repo
        .update_project(&Project::new("missing", owner))
        .unwrap_err();
    assert!(matches!(err, RepoError::ProjectNotFound(name) if name == "missing"));
}

#[test]
fn list_orders_by_last_edit_and_filters_by_owner() {
    let conn = open_db_in_memory().unwrap();
    let alice = seed_owner(&conn, "alice@example.com");
    let bob = seed_owner(&conn, "bob@example.com");

    SqliteProjectRepository::with_clock(&conn, FixedClock(1_000))
        .create_project(&Project::new("zeta", alice.clone()))
        .unwrap();
    SqliteProjectRepository::with_clock(&conn, FixedClock(3_000))
        .create_project(&Project::new("beta", bob.clone()))
        .unwrap();
    SqliteProjectRepository::with_clock(&conn, FixedClock(2_000))
        .create_project(&Project::new("alpha", alice.clone()))
        .unwrap();

    let repo = SqliteProjectRepository::new(&conn);
    let names: Vec<String> = repo
        .list_projects()
        .unwrap()
        .into_iter()
        .map(|project| project.name)
        .collect();
    assert_eq!(names, vec!["beta", "alpha", "zeta"]);

    let owned: Vec<String> = repo
        .list_projects_by_owner(&alice)
        .unwrap()
        .into_iter()
        .map(|project| project.name)
        .collect();
    assert_eq!(owned, vec!["alpha", "zeta"]);
}

#[test]
fn service_resolves_owner_explicitly() {
    let conn = open_db_in_memory().unwrap();
    let owner = seed_owner(&conn, "alice@example.com");
    let service = ProjectService::new(
        SqliteProjectRepository::new(&conn),
        SqliteUserRepository::new(&conn),
    );

    let project = service
        .create_project(&Project::new("acme", owner.clone()))
        .unwrap();
    let resolved = service.owner_of(&project).unwrap();
    assert_eq!(resolved.key, owner);
    assert_eq!(resolved.user.public_name(), "alice@...");

    assert_eq!(service.projects_owned_by(&owner).unwrap().len(), 1);
}
