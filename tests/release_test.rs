// tests/release_test.rs
//
// The release flow end to end against a mock repository and a recording
// command runner: tag composition, build arguments and push behavior.

use std::path::Path;

use mdqp::git::MockRepository;
use mdqp::release::{self, RecordingRunner};

fn pushes(calls: &[Vec<String>]) -> Vec<&Vec<String>> {
    calls.iter().filter(|call| call[1] == "push").collect()
}

#[test]
fn test_release_of_tagged_commit() {
    let mut repo = MockRepository::new();
    repo.add_tag_containing("abc123", "v2.0");
    let runner = RecordingRunner::new();

    let outcome = release::run(&repo, &runner, Path::new("/ci/jobs/sunet-widget"), "abc123")
        .expect("release should succeed");

    assert_eq!(outcome.version, "v2.0");
    assert_eq!(outcome.tags.versioned, "docker.sunet.se/widget:v2.0");
    assert_eq!(outcome.tags.latest, "docker.sunet.se/widget:latest");

    let calls = runner.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(
        calls[0],
        vec![
            "docker",
            "build",
            "--build-arg",
            "VERSION=v2.0",
            "-t",
            "docker.sunet.se/widget:v2.0",
            "-t",
            "docker.sunet.se/widget:latest",
            "/ci/jobs/sunet-widget",
        ]
    );
}

#[test]
fn test_release_of_untagged_commit_uses_commit_as_version() {
    let repo = MockRepository::new();
    let runner = RecordingRunner::new();

    let outcome = release::run(&repo, &runner, Path::new("sunet-widget"), "abc123")
        .expect("release should succeed");

    assert_eq!(outcome.version, "abc123");
    assert_eq!(outcome.tags.versioned, "docker.sunet.se/widget:abc123");
    assert!(runner
        .calls()
        .iter()
        .any(|call| call.contains(&"VERSION=abc123".to_string())));
}

#[test]
fn test_release_pushes_exactly_twice() {
    let mut repo = MockRepository::new();
    repo.add_tag_containing("abc123", "v2.0");
    let runner = RecordingRunner::new();

    release::run(&repo, &runner, Path::new("sunet-widget"), "abc123").unwrap();

    let calls = runner.calls();
    let pushed = pushes(&calls);
    assert_eq!(pushed.len(), 2);
    assert_eq!(pushed[0][2], "docker.sunet.se/widget:v2.0");
    assert_eq!(pushed[1][2], "docker.sunet.se/widget:latest");
}

#[test]
fn test_release_pushes_twice_even_when_tags_coincide() {
    // A repository tag literally named "latest" collapses both references
    // into the same string; the flow still performs two pushes.
    let mut repo = MockRepository::new();
    repo.add_tag_containing("abc123", "latest");
    let runner = RecordingRunner::new();

    let outcome = release::run(&repo, &runner, Path::new("sunet-widget"), "abc123").unwrap();

    assert_eq!(outcome.tags.versioned, outcome.tags.latest);
    let calls = runner.calls();
    assert_eq!(pushes(&calls).len(), 2);
}

#[test]
fn test_both_references_share_the_repository() {
    let mut repo = MockRepository::new();
    repo.add_tag_containing("abc123", "v2.0");
    let runner = RecordingRunner::new();

    let outcome = release::run(&repo, &runner, Path::new("sunet-widget"), "abc123").unwrap();

    let base = |tag: &str| tag.rsplit_once(':').map(|(repo, _)| repo.to_string());
    assert_eq!(
        base(&outcome.tags.versioned),
        base(&outcome.tags.latest)
    );
}

#[test]
fn test_build_precedes_pushes() {
    let mut repo = MockRepository::new();
    repo.add_tag_containing("abc123", "v2.0");
    let runner = RecordingRunner::new();

    release::run(&repo, &runner, Path::new("sunet-widget"), "abc123").unwrap();

    let verbs: Vec<String> = runner.calls().iter().map(|call| call[1].clone()).collect();
    assert_eq!(verbs, vec!["build", "push", "push"]);
}

#[test]
fn test_malformed_checkout_directory_runs_nothing() {
    let mut repo = MockRepository::new();
    repo.add_tag_containing("abc123", "v2.0");
    let runner = RecordingRunner::new();

    assert!(release::run(&repo, &runner, Path::new("/ci/jobs/widget"), "abc123").is_err());
    assert!(runner.calls().is_empty());
}

#[test]
fn test_empty_commit_runs_nothing() {
    // Config rejects an empty GIT_COMMIT before this point; even bypassed,
    // an empty version cannot form a tag and docker is never invoked.
    let repo = MockRepository::new();
    let runner = RecordingRunner::new();

    assert!(release::run(&repo, &runner, Path::new("sunet-widget"), "").is_err());
    assert!(runner.calls().is_empty());
}
