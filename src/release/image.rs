//! Image naming for the registry.

use std::path::Path;

use crate::error::{MdqpError, Result};

/// Registry every release publishes to.
pub const REGISTRY: &str = "docker.sunet.se";

/// A fully qualified image repository, `registry/name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageName {
    repository: String,
}

impl ImageName {
    /// Derives the image name from a checkout directory.
    ///
    /// Checkout directories follow the `org-project` convention and the
    /// image is named after the project field, so a build in `sunet-widget`
    /// publishes `docker.sunet.se/widget`. A directory that does not follow
    /// the convention is an error; releasing under a wrong or empty name
    /// would clobber someone else's repository.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let base = dir
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| MdqpError::image("cannot determine the checkout directory name"))?;

        let short = base.split('-').nth(1).unwrap_or("");
        if short.is_empty() {
            return Err(MdqpError::image(format!(
                "directory '{base}' does not follow the org-project naming convention"
            )));
        }
        if !is_name_component(short) {
            return Err(MdqpError::image(format!(
                "'{short}' is not a valid image repository name"
            )));
        }

        Ok(ImageName {
            repository: format!("{REGISTRY}/{short}"),
        })
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Composes both references for a release: `repository:version` and
    /// `repository:latest`.
    pub fn tags(&self, version: &str) -> Result<ImageTags> {
        if !is_tag(version) {
            return Err(MdqpError::image(format!(
                "'{version}' is not a valid image tag"
            )));
        }
        Ok(ImageTags {
            versioned: format!("{}:{version}", self.repository),
            latest: format!("{}:latest", self.repository),
        })
    }
}

/// The two references every release publishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTags {
    pub versioned: String,
    pub latest: String,
}

impl ImageTags {
    /// Tags in push order: the versioned reference first, then latest.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        [self.versioned.as_str(), self.latest.as_str()].into_iter()
    }
}

/// Repository name component grammar from the distribution reference spec.
fn is_name_component(s: &str) -> bool {
    if let Ok(re) = regex::Regex::new(r"^[a-z0-9]+(?:(?:[._]|__|-+)[a-z0-9]+)*$") {
        re.is_match(s)
    } else {
        false
    }
}

/// Image tag grammar: up to 128 word characters, dots and dashes, not
/// starting with a dot or dash.
fn is_tag(s: &str) -> bool {
    if let Ok(re) = regex::Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.-]{0,127}$") {
        re.is_match(s)
    } else {
        false
    }
}
