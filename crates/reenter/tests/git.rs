mod support;

use std::fs;

use reenter::walkthrough::{check_git_state, next_commit_message, snapshot, GitState};
use support::{git, init_repo, set_git_identity_env};
use tempfile::TempDir;

#[test]
fn folder_without_repository_is_no_git() {
    let dir = TempDir::new().expect("tempdir");
    assert_eq!(check_git_state(dir.path()).expect("state"), GitState::NoGit);
}

#[test]
fn committed_repository_is_clean() {
    let dir = TempDir::new().expect("tempdir");
    init_repo(dir.path());
    assert_eq!(check_git_state(dir.path()).expect("state"), GitState::Clean);
}

#[test]
fn staged_changes_are_loose_ends() {
    let dir = TempDir::new().expect("tempdir");
    init_repo(dir.path());
    fs::write(dir.path().join("file.txt"), "hello").expect("write");
    git(dir.path(), &["add", "."]);
    assert_eq!(check_git_state(dir.path()).expect("state"), GitState::LooseEnds);
}

#[test]
fn untracked_files_are_loose_ends() {
    let dir = TempDir::new().expect("tempdir");
    init_repo(dir.path());
    fs::write(dir.path().join("untracked.txt"), "content").expect("write");
    assert_eq!(check_git_state(dir.path()).expect("state"), GitState::LooseEnds);
}

#[test]
fn repository_of_a_parent_folder_does_not_count() {
    let dir = TempDir::new().expect("tempdir");
    init_repo(dir.path());
    let child = dir.path().join("app");
    fs::create_dir(&child).expect("mkdir");
    fs::write(child.join("main.py"), "print('hi')").expect("write");

    assert_eq!(check_git_state(&child).expect("state"), GitState::NoGit);
}

#[test]
fn commit_messages_count_earlier_restore_points() {
    let dir = TempDir::new().expect("tempdir");
    assert_eq!(
        next_commit_message(dir.path()),
        "saving starting point before reenter [00]"
    );

    init_repo(dir.path());
    assert_eq!(
        next_commit_message(dir.path()),
        "saving starting point before reenter [00]"
    );

    for message in [
        "saving starting point before reenter [00]",
        "unrelated work",
        "saving starting point before reenter [01]",
    ] {
        git(dir.path(), &["commit", "--allow-empty", "-m", message]);
    }
    assert_eq!(
        next_commit_message(dir.path()),
        "saving starting point before reenter [02]"
    );
}

#[test]
fn clean_tree_gets_an_empty_restore_point() {
    let dir = TempDir::new().expect("tempdir");
    init_repo(dir.path());

    let saved = snapshot(dir.path()).expect("snapshot");

    assert_eq!(saved.state, GitState::Clean);
    assert_eq!(saved.message, "saving starting point before reenter [00]");
    let log = git(dir.path(), &["log", "--format=%s"]);
    assert_eq!(log.lines().next(), Some(saved.message.as_str()));
    assert_eq!(log.lines().count(), 2);
}

#[test]
fn loose_ends_are_committed_as_they_are() {
    let dir = TempDir::new().expect("tempdir");
    init_repo(dir.path());
    fs::write(dir.path().join("todo.txt"), "finish it").expect("write");

    let saved = snapshot(dir.path()).expect("snapshot");

    assert_eq!(saved.state, GitState::LooseEnds);
    assert_eq!(check_git_state(dir.path()).expect("state"), GitState::Clean);
    assert!(saved.describe().contains("committed loose ends"));
    assert!(!dir.path().join(".gitignore").exists());
}

#[test]
fn missing_repository_is_initialized_with_a_gitignore() {
    set_git_identity_env();
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("index.js"), "console.log('hi')").expect("write");
    fs::write(dir.path().join(".env"), "SECRET=1").expect("write");

    let saved = snapshot(dir.path()).expect("snapshot");

    assert_eq!(saved.state, GitState::NoGit);
    assert_eq!(
        fs::read_to_string(dir.path().join(".gitignore")).expect("gitignore"),
        "node_modules\ndist\n.env\n"
    );
    let tracked = git(dir.path(), &["ls-files"]);
    assert!(tracked.lines().any(|file| file == "index.js"));
    assert!(!tracked.lines().any(|file| file == ".env"));
    assert_eq!(check_git_state(dir.path()).expect("state"), GitState::Clean);
}
