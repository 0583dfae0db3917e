//! The fixed registry of named examples.
//!
//! Examples live as directories of a single upstream repository. The set of
//! names is fixed at build time; the repository, branch and directory can be
//! redirected through configuration.

use crate::domain::{
    entities::{
        common::RelativePath,
        reference::{RemoteLocation, Repository},
    },
    error::DomainError,
};

pub const DEFAULT_EXAMPLES_REPOSITORY: &str = "vercel/next.js";
pub const DEFAULT_EXAMPLES_BRANCH: &str = "canary";
pub const DEFAULT_EXAMPLES_DIRECTORY: &str = "examples";

/// A named example and a one-line description for `sprig list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExampleEntry {
    pub name: &'static str,
    pub description: &'static str,
}

const EXAMPLES: &[ExampleEntry] = &[
    ExampleEntry {
        name: "api-routes",
        description: "API routes with request handlers",
    },
    ExampleEntry {
        name: "blog",
        description: "Markdown-powered blog",
    },
    ExampleEntry {
        name: "blog-starter",
        description: "Statically generated blog with a CMS-free workflow",
    },
    ExampleEntry {
        name: "hello-world",
        description: "The smallest possible application",
    },
    ExampleEntry {
        name: "image-component",
        description: "Optimized images with the built-in image component",
    },
    ExampleEntry {
        name: "with-docker",
        description: "Production image built with a multi-stage Dockerfile",
    },
    ExampleEntry {
        name: "with-jest",
        description: "Unit tests with Jest and Testing Library",
    },
    ExampleEntry {
        name: "with-mdx",
        description: "Pages written in MDX",
    },
    ExampleEntry {
        name: "with-mongodb",
        description: "Data access through the MongoDB driver",
    },
    ExampleEntry {
        name: "with-playwright",
        description: "End-to-end tests with Playwright",
    },
    ExampleEntry {
        name: "with-redux",
        description: "Client state with Redux Toolkit",
    },
    ExampleEntry {
        name: "with-supabase",
        description: "Auth and database with Supabase",
    },
    ExampleEntry {
        name: "with-tailwindcss",
        description: "Styling with Tailwind CSS",
    },
    ExampleEntry {
        name: "with-vitest",
        description: "Unit tests with Vitest",
    },
];

#[derive(Debug, Clone)]
pub struct ExampleRegistry {
    repository: Repository,
    branch: String,
    directory: RelativePath,
}

impl ExampleRegistry {
    /// Registry pointing at a different upstream location.
    pub fn with_location(
        repository: &str,
        branch: impl Into<String>,
        directory: &str,
    ) -> Result<Self, DomainError> {
        let branch = branch.into();
        if branch.trim().is_empty() {
            return Err(DomainError::InvalidReference {
                reference: repository.into(),
                reason: "examples branch must not be empty".into(),
            });
        }
        Ok(Self {
            repository: Repository::parse(repository)?,
            branch,
            directory: RelativePath::try_new(directory)?,
        })
    }

    pub fn entries(&self) -> &'static [ExampleEntry] {
        EXAMPLES
    }

    pub fn contains(&self, name: &str) -> bool {
        EXAMPLES.iter().any(|e| e.name == name)
    }

    /// Location of the named example, or `None` if it is not registered.
    pub fn lookup(&self, name: &str) -> Option<RemoteLocation> {
        if !self.contains(name) {
            return None;
        }
        let subpath = self.directory.join(name).ok()?;
        Some(RemoteLocation {
            repository: self.repository.clone(),
            git_ref: Some(self.branch.clone()),
            subpath: Some(subpath),
            example: Some(name.to_string()),
        })
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }
}

impl Default for ExampleRegistry {
    fn default() -> Self {
        Self {
            repository: Repository::from_trusted("vercel", "next.js"),
            branch: DEFAULT_EXAMPLES_BRANCH.into(),
            directory: RelativePath::from_trusted(DEFAULT_EXAMPLES_DIRECTORY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_builds_location_under_examples_directory() {
        let registry = ExampleRegistry::default();
        let loc = registry.lookup("with-docker").unwrap();

        assert_eq!(loc.repository.to_string(), DEFAULT_EXAMPLES_REPOSITORY);
        assert_eq!(loc.git_ref.as_deref(), Some("canary"));
        assert_eq!(loc.subpath.unwrap().as_str(), "examples/with-docker");
        assert_eq!(loc.example.as_deref(), Some("with-docker"));
    }

    #[test]
    fn unknown_names_are_absent() {
        assert!(ExampleRegistry::default().lookup("does-not-exist").is_none());
    }

    #[test]
    fn entries_are_sorted_and_unique() {
        let names: Vec<_> = EXAMPLES.iter().map(|e| e.name).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(names, sorted);
    }

    #[test]
    fn relocated_registry() {
        let registry = ExampleRegistry::with_location("acme/templates", "main", "starters").unwrap();
        let loc = registry.lookup("blog").unwrap();
        assert_eq!(loc.to_string(), "blog");
        assert_eq!(loc.repository.owner(), "acme");
        assert_eq!(loc.subpath.unwrap().as_str(), "starters/blog");

        assert!(ExampleRegistry::with_location("acme", "main", "x").is_err());
        assert!(ExampleRegistry::with_location("acme/t", " ", "x").is_err());
    }
}
