// tests/version_resolution_test.rs
//
// Version resolution against real git repositories: tag-contains semantics
// through git2 and the fallback to the bare commit.

use git2::{Commit, Oid, Repository};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use mdqp::git::{Git2Repository, Repository as _};
use mdqp::release::resolve_version;

fn commit_file(repo: &Repository, content: &[u8], message: &str, parents: &[&Commit]) -> Oid {
    let workdir = repo.workdir().expect("Could not get workdir");
    fs::write(workdir.join("entities.xml"), content).expect("Could not write file");

    let mut index = repo.index().expect("Could not get index");
    index
        .add_path(Path::new("entities.xml"))
        .expect("Could not add file to index");
    index.write().expect("Could not write index");

    let tree_id = index.write_tree().expect("Could not write tree");
    let tree = repo.find_tree(tree_id).expect("Could not find tree");
    let sig = repo.signature().expect("Could not get sig");

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, parents)
        .expect("Could not create commit")
}

/// Three commits on one branch: c1 (tagged v1.0.0), c2 (tagged v2.0.0,
/// annotated), c3 untagged at HEAD.
fn setup_test_repo() -> (TempDir, Oid, Oid, Oid) {
    let temp_dir = TempDir::new().expect("Could not create temp dir");
    let repo = Repository::init(temp_dir.path()).expect("Could not init git repo");

    {
        let mut config = repo.config().expect("Could not get config");
        config
            .set_str("user.name", "Test User")
            .expect("Could not set user.name");
        config
            .set_str("user.email", "test@example.com")
            .expect("Could not set user.email");
    }

    let c1 = commit_file(&repo, b"one\n", "Initial commit", &[]);
    repo.tag_lightweight("v1.0.0", &repo.find_object(c1, None).unwrap(), false)
        .expect("Could not create tag");

    let parent = repo.find_commit(c1).unwrap();
    let c2 = commit_file(&repo, b"two\n", "Second commit", &[&parent]);
    let sig = repo.signature().expect("Could not get sig");
    repo.tag(
        "v2.0.0",
        &repo.find_object(c2, None).unwrap(),
        &sig,
        "release 2.0.0",
        false,
    )
    .expect("Could not create annotated tag");

    let parent = repo.find_commit(c2).unwrap();
    let c3 = commit_file(&repo, b"three\n", "Third commit", &[&parent]);

    (temp_dir, c1, c2, c3)
}

#[test]
fn test_tags_containing_includes_descendants() {
    let (temp_dir, c1, _, _) = setup_test_repo();
    let repo = Git2Repository::open(temp_dir.path()).expect("Could not open repo");

    let mut tags = repo.tags_containing(&c1.to_string()).unwrap();
    tags.sort();
    assert_eq!(tags, vec!["v1.0.0".to_string(), "v2.0.0".to_string()]);
}

#[test]
fn test_tags_containing_sees_annotated_tag_on_own_commit() {
    let (temp_dir, _, c2, _) = setup_test_repo();
    let repo = Git2Repository::open(temp_dir.path()).expect("Could not open repo");

    let tags = repo.tags_containing(&c2.to_string()).unwrap();
    assert_eq!(tags, vec!["v2.0.0".to_string()]);
}

#[test]
fn test_tags_containing_empty_for_untagged_head() {
    let (temp_dir, _, _, c3) = setup_test_repo();
    let repo = Git2Repository::open(temp_dir.path()).expect("Could not open repo");

    assert!(repo.tags_containing(&c3.to_string()).unwrap().is_empty());
}

#[test]
fn test_tags_containing_rejects_unknown_commit() {
    let (temp_dir, _, _, _) = setup_test_repo();
    let repo = Git2Repository::open(temp_dir.path()).expect("Could not open repo");

    assert!(repo
        .tags_containing("0000000000000000000000000000000000000099")
        .is_err());
}

#[test]
fn test_resolve_version_prefers_newest_reachable_tag() {
    let (temp_dir, c1, c2, _) = setup_test_repo();
    let repo = Git2Repository::open(temp_dir.path()).expect("Could not open repo");

    // Both tags contain c1; v2.0.0 is the more significant version.
    assert_eq!(resolve_version(&repo, &c1.to_string()).unwrap(), "v2.0.0");
    assert_eq!(resolve_version(&repo, &c2.to_string()).unwrap(), "v2.0.0");
}

#[test]
fn test_resolve_version_falls_back_to_commit_hash() {
    let (temp_dir, _, _, c3) = setup_test_repo();
    let repo = Git2Repository::open(temp_dir.path()).expect("Could not open repo");

    assert_eq!(
        resolve_version(&repo, &c3.to_string()).unwrap(),
        c3.to_string()
    );
}

#[test]
fn test_resolve_version_accepts_ref_names() {
    let (temp_dir, _, _, c3) = setup_test_repo();
    let repo = Git2Repository::open(temp_dir.path()).expect("Could not open repo");

    // HEAD points at the untagged c3.
    assert_eq!(resolve_version(&repo, "HEAD").unwrap(), c3.to_string());
}
