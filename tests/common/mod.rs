// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use mvncopy::{
    ContentLocation, Coordinate, FileTransfer, LookupMode, RepoLocation, RepositoryClient,
    ResolvedArtifact, Result,
};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Repository client answering from in-memory tables
///
/// `graph` maps a requested coordinate string to the coordinates a
/// transitive lookup reaches. `files` holds the coordinates that have an
/// artifact on disk. Direct lookups only consult `files`.
pub struct FakeRepository {
    pub dir: TempDir,
    graph: HashMap<String, Vec<Coordinate>>,
    files: HashMap<String, (String, PathBuf)>,
    pub calls: RefCell<Vec<(LookupMode, Vec<String>)>>,
}

impl FakeRepository {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
            graph: HashMap::new(),
            files: HashMap::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Declare what a transitive lookup of `request` reaches
    pub fn graph(mut self, request: &str, reached: &[&str]) -> Self {
        self.graph.insert(
            request.to_string(),
            reached.iter().map(|c| Coordinate::parse(c)).collect(),
        );
        self
    }

    /// Publish an artifact file for a coordinate
    pub fn file(mut self, coordinate: &str, extension: &str) -> Self {
        let path = self.dir.path().join(format!(
            "{}.{}",
            coordinate.replace([':', '@'], "_"),
            extension
        ));
        fs::write(&path, coordinate.as_bytes()).unwrap();
        self.files
            .insert(coordinate.to_string(), (extension.to_string(), path));
        self
    }

    fn materialize(&self, coordinate: &Coordinate) -> Option<ResolvedArtifact> {
        self.files.get(&coordinate.to_string()).map(|(ext, path)| {
            ResolvedArtifact::new(
                coordinate.clone(),
                ext.clone(),
                ContentLocation::Local(path.clone()),
            )
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl RepositoryClient for FakeRepository {
    fn lookup(
        &self,
        coordinates: &[Coordinate],
        _repositories: &[RepoLocation],
        mode: LookupMode,
    ) -> Result<Vec<ResolvedArtifact>> {
        self.calls
            .borrow_mut()
            .push((mode, coordinates.iter().map(|c| c.to_string()).collect()));

        let reached: Vec<Coordinate> = match mode {
            LookupMode::Direct => coordinates.to_vec(),
            LookupMode::Transitive => coordinates
                .iter()
                .flat_map(|c| self.graph.get(&c.to_string()).cloned().unwrap_or_default())
                .collect(),
        };

        let mut artifacts: Vec<ResolvedArtifact> = Vec::new();
        for coordinate in &reached {
            if let Some(artifact) = self.materialize(coordinate) {
                if !artifacts.contains(&artifact) {
                    artifacts.push(artifact);
                }
            }
        }
        Ok(artifacts)
    }
}

/// Transfer wrapper counting the copies it performs
pub struct CountingTransfer<T> {
    inner: T,
    copies: Cell<usize>,
}

impl<T: FileTransfer> CountingTransfer<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            copies: Cell::new(0),
        }
    }

    pub fn copies(&self) -> usize {
        self.copies.get()
    }

    pub fn reset(&self) {
        self.copies.set(0);
    }
}

impl<T: FileTransfer> FileTransfer for CountingTransfer<T> {
    fn exists(&self, path: &Path) -> bool {
        self.inner.exists(path)
    }

    fn copy(&self, artifact: &ResolvedArtifact, destination: &Path) -> Result<()> {
        self.copies.set(self.copies.get() + 1);
        self.inner.copy(artifact, destination)
    }
}

/// Builder for Maven-layout repositories on disk
pub struct MavenRepoBuilder {
    pub dir: TempDir,
}

/// A `<dependency>` for [`MavenRepoBuilder::pom`]
pub struct Dep<'a> {
    pub group: &'a str,
    pub artifact: &'a str,
    pub version: Option<&'a str>,
    pub extra: &'a str,
}

pub fn dep<'a>(group: &'a str, artifact: &'a str, version: &'a str) -> Dep<'a> {
    Dep {
        group,
        artifact,
        version: Some(version),
        extra: "",
    }
}

impl MavenRepoBuilder {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn location(&self) -> RepoLocation {
        RepoLocation::Local(self.dir.path().to_path_buf())
    }

    fn module_dir(&self, group: &str, artifact: &str, version: &str) -> PathBuf {
        let dir = self
            .dir
            .path()
            .join(group.replace('.', "/"))
            .join(artifact)
            .join(version);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Write a POM; `body` is inserted verbatim after the packaging
    pub fn pom_with(
        &self,
        group: &str,
        artifact: &str,
        version: &str,
        packaging: &str,
        body: &str,
    ) -> &Self {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
  <modelVersion>4.0.0</modelVersion>
  <groupId>{group}</groupId>
  <artifactId>{artifact}</artifactId>
  <version>{version}</version>
  <packaging>{packaging}</packaging>
{body}
</project>
"#
        );
        let path = self
            .module_dir(group, artifact, version)
            .join(format!("{artifact}-{version}.pom"));
        fs::write(path, xml).unwrap();
        self
    }

    /// Write a POM declaring the given dependencies
    pub fn pom(
        &self,
        group: &str,
        artifact: &str,
        version: &str,
        packaging: &str,
        deps: &[Dep<'_>],
    ) -> &Self {
        let mut body = String::from("  <dependencies>\n");
        for d in deps {
            body.push_str("    <dependency>\n");
            body.push_str(&format!("      <groupId>{}</groupId>\n", d.group));
            body.push_str(&format!("      <artifactId>{}</artifactId>\n", d.artifact));
            if let Some(v) = d.version {
                body.push_str(&format!("      <version>{}</version>\n", v));
            }
            body.push_str(d.extra);
            body.push_str("    </dependency>\n");
        }
        body.push_str("  </dependencies>");
        self.pom_with(group, artifact, version, packaging, &body)
    }

    /// Write an artifact file
    pub fn artifact(&self, group: &str, artifact: &str, version: &str, extension: &str) -> &Self {
        let path = self
            .module_dir(group, artifact, version)
            .join(format!("{artifact}-{version}.{extension}"));
        fs::write(path, format!("{group}:{artifact}:{version}.{extension}")).unwrap();
        self
    }

    /// Write `maven-metadata.xml` for `group:artifact`
    pub fn metadata(&self, group: &str, artifact: &str, release: Option<&str>, versions: &[&str]) -> &Self {
        let dir = self.dir.path().join(group.replace('.', "/")).join(artifact);
        fs::create_dir_all(&dir).unwrap();
        let versions: String = versions
            .iter()
            .map(|v| format!("      <version>{v}</version>\n"))
            .collect();
        let release = release
            .map(|r| format!("    <release>{r}</release>\n"))
            .unwrap_or_default();
        let xml = format!(
            "<metadata>\n  <groupId>{group}</groupId>\n  <artifactId>{artifact}</artifactId>\n  \
             <versioning>\n{release}    <versions>\n{versions}    </versions>\n  </versioning>\n</metadata>\n"
        );
        fs::write(dir.join("maven-metadata.xml"), xml).unwrap();
        self
    }
}

/// File names in a directory, sorted
pub fn list_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = match fs::read_dir(dir) {
        Ok(entries) => entries
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => Vec::new(),
    };
    names.sort();
    names
}
