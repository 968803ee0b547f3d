//! Release workflow: version the current commit, build the container image
//! and push it to the registry.

pub mod docker;
pub mod image;
pub mod version;

pub use docker::{CommandRunner, Docker, RecordingRunner, SystemRunner};
pub use image::{ImageName, ImageTags, REGISTRY};
pub use version::resolve_version;

use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::git::Repository;

/// Result of a completed release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseOutcome {
    /// Version the image was labeled with: a tag name or the bare commit.
    pub version: String,

    /// The two references that were built and pushed.
    pub tags: ImageTags,
}

/// Main release workflow
///
/// Orchestrates the entire release:
/// 1. Resolve the version for the commit from the repository's tags
/// 2. Derive the image name from the checkout directory
/// 3. Build the image with both tags, passing the version as a build arg
/// 4. Push the versioned tag, then latest
///
/// Nothing is executed until the version and both tags have validated, so a
/// bad commit reference or checkout name fails before docker runs at all.
///
/// # Arguments
/// * `repo` - Repository to resolve the version against
/// * `runner` - Command runner that executes docker
/// * `project_dir` - The checkout directory; names the image and serves as
///   build context
/// * `commit` - The commit being released
pub fn run<R: Repository, C: CommandRunner>(
    repo: &R,
    runner: &C,
    project_dir: &Path,
    commit: &str,
) -> Result<ReleaseOutcome> {
    let version = resolve_version(repo, commit)?;
    info!("resolved version {version} for commit {commit}");

    let image = ImageName::from_dir(project_dir)?;
    let tags = image.tags(&version)?;

    let docker = Docker::new(runner);
    info!("building {} and {}", tags.versioned, tags.latest);
    docker.build(project_dir, &tags, &version)?;

    for tag in tags.iter() {
        info!("pushing {tag}");
        docker.push(tag)?;
    }

    Ok(ReleaseOutcome { version, tags })
}
