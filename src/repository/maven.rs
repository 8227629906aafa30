// src/repository/maven.rs

//! Maven-layout repository client
//!
//! Resolves coordinates against repositories laid out as
//! `group/path/artifact/version/artifact-version.ext`.
//!
//! # Resolution Flow
//!
//! ```text
//! lookup(coordinates, repositories, mode)
//!     |
//!     v
//! Pin root versions (explicit, range via metadata, or metadata release)
//!     |
//!     v
//! Walk POM dependencies (Transitive mode only) ──> newest version per
//!     |                                           group:artifact wins
//!     v
//! Repeat the walk until no selection changes
//!     |
//!     v
//! Probe repositories in order for each reached module's artifact file
//! ```

use super::client::HttpClient;
use super::metadata::MavenMetadata;
use super::pom::PomProject;
use super::{ContentLocation, LookupMode, RepoLocation, RepositoryClient, ResolvedArtifact};
use crate::coordinate::Coordinate;
use crate::error::{Error, Result};
use crate::version::{self, VersionRange};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::fs;
use std::io::ErrorKind;
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Maximum parent POM chain length
const MAX_PARENT_DEPTH: usize = 8;

/// Maximum number of graph walks before giving up on convergence
const MAX_GRAPH_PASSES: usize = 8;

/// Extension used when a module has no POM or a jar-like packaging
const JAR_EXTENSION: &str = "jar";

/// Map a POM packaging to the extension of the published artifact
///
/// Returns `None` for `pom` packaging, which publishes no artifact.
fn packaging_extension(packaging: Option<&str>) -> Option<String> {
    match packaging {
        None | Some("") | Some("jar") | Some("bundle") | Some("maven-plugin") => {
            Some(JAR_EXTENSION.to_string())
        }
        Some("pom") => None,
        Some(other) => Some(other.to_string()),
    }
}

fn group_path(group: &str) -> String {
    group.replace('.', "/")
}

fn pom_path(group: &str, artifact: &str, version: &str) -> String {
    format!("{}/{artifact}/{version}/{artifact}-{version}.pom", group_path(group))
}

fn artifact_path(group: &str, artifact: &str, version: &str, extension: &str) -> String {
    format!(
        "{}/{artifact}/{version}/{artifact}-{version}.{extension}",
        group_path(group)
    )
}

fn metadata_paths(group: &str, artifact: &str, local: bool) -> Vec<String> {
    let base = format!("{}/{artifact}", group_path(group));
    let mut paths = vec![format!("{base}/maven-metadata.xml")];
    if local {
        paths.push(format!("{base}/maven-metadata-local.xml"));
    }
    paths
}

/// Effective POM data after parent inheritance
#[derive(Debug, Default)]
struct PomModel {
    packaging: Option<String>,
    properties: HashMap<String, String>,
    /// Own and inherited dependencies, not yet interpolated
    dependencies: Vec<super::PomDependency>,
    /// Own entries first, then inherited ones, not yet interpolated
    management: Vec<super::PomDependency>,
}

/// Per-lookup caches
#[derive(Default)]
struct Session {
    models: HashMap<String, Option<Rc<PomModel>>>,
    metadata: HashMap<String, Option<MavenMetadata>>,
}

/// A dependency edge waiting to be visited
struct Pending {
    coordinate: Coordinate,
    exclusions: Rc<Vec<(String, String)>>,
}

fn is_excluded(exclusions: &[(String, String)], group: &str, artifact: &str) -> bool {
    exclusions
        .iter()
        .any(|(g, a)| (g == "*" || g == group) && (a == "*" || a == artifact))
}

/// Repository client for Maven-layout repositories
#[derive(Debug, Clone)]
pub struct MavenClient {
    http: HttpClient,
}

impl MavenClient {
    /// Create a client with a fresh HTTP connection pool
    pub fn new() -> Result<Self> {
        Ok(Self {
            http: HttpClient::new()?,
        })
    }

    /// Create a client sharing an existing HTTP client
    pub fn with_http(http: HttpClient) -> Self {
        Self { http }
    }

    fn fetch_text(&self, repo: &RepoLocation, relative: &str) -> Result<Option<String>> {
        match repo.locate(relative)? {
            ContentLocation::Remote(url) => self.http.fetch_text(&url),
            ContentLocation::Local(path) => match fs::read_to_string(&path) {
                Ok(text) => Ok(Some(text)),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(Error::IoError(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                ))),
            },
        }
    }

    fn probe(&self, repo: &RepoLocation, relative: &str) -> Result<Option<ContentLocation>> {
        let location = repo.locate(relative)?;
        let found = match &location {
            ContentLocation::Remote(url) => self.http.exists(url)?,
            ContentLocation::Local(path) => path.is_file(),
        };
        Ok(found.then_some(location))
    }

    /// Merged versioning metadata for `group:artifact` across repositories
    ///
    /// `release` and `latest` come from the first repository that declares
    /// them; version lists are merged.
    fn metadata<'s>(
        &self,
        session: &'s mut Session,
        group: &str,
        artifact: &str,
        repositories: &[RepoLocation],
    ) -> Result<Option<&'s MavenMetadata>> {
        let key = format!("{group}:{artifact}");
        if !session.metadata.contains_key(&key) {
            let mut merged: Option<MavenMetadata> = None;
            for repo in repositories {
                for path in metadata_paths(group, artifact, repo.is_local()) {
                    let Some(xml) = self.fetch_text(repo, &path)? else {
                        continue;
                    };
                    let parsed = match MavenMetadata::parse(&xml) {
                        Ok(parsed) => parsed,
                        Err(e) => {
                            warn!("Ignoring unreadable metadata {} in {}: {}", path, repo, e);
                            continue;
                        }
                    };
                    let entry = merged.get_or_insert_with(MavenMetadata::default);
                    if entry.release.is_none() {
                        entry.release = parsed.release;
                    }
                    if entry.latest.is_none() {
                        entry.latest = parsed.latest;
                    }
                    for v in parsed.versions {
                        if !entry.versions.contains(&v) {
                            entry.versions.push(v);
                        }
                    }
                }
            }
            session.metadata.insert(key.clone(), merged);
        }
        Ok(session.metadata.get(&key).and_then(Option::as_ref))
    }

    /// Turn a requested version (absent, plain or range) into a concrete one
    fn pin_version(
        &self,
        session: &mut Session,
        coordinate: &Coordinate,
        repositories: &[RepoLocation],
    ) -> Result<Option<String>> {
        let range = match coordinate.version.as_deref() {
            None => {
                let metadata =
                    self.metadata(session, &coordinate.group, &coordinate.artifact, repositories)?;
                let pinned = metadata.and_then(MavenMetadata::preferred_version);
                debug!("{} resolved through metadata to {:?}", coordinate, pinned);
                return Ok(pinned.map(str::to_string));
            }
            Some(requested) => match VersionRange::parse(requested) {
                Ok(range) => range,
                Err(e) => {
                    warn!("Ignoring {}: {}", coordinate, e);
                    return Ok(None);
                }
            },
        };

        if let Some(pinned) = range.pinned() {
            return Ok(Some(pinned.to_string()));
        }

        let metadata =
            self.metadata(session, &coordinate.group, &coordinate.artifact, repositories)?;
        let selected = metadata.and_then(|m| range.select(&m.versions));
        debug!("{} range {} selected {:?}", coordinate.group_artifact_key(), range, selected);
        Ok(selected.map(str::to_string))
    }

    /// Load the effective POM for a module
    fn model(
        &self,
        session: &mut Session,
        group: &str,
        artifact: &str,
        version: &str,
        repositories: &[RepoLocation],
        depth: usize,
    ) -> Result<Option<Rc<PomModel>>> {
        let key = format!("{group}:{artifact}:{version}");
        if let Some(cached) = session.models.get(&key) {
            return Ok(cached.clone());
        }

        let path = pom_path(group, artifact, version);
        let mut pom = None;
        for repo in repositories {
            if let Some(xml) = self.fetch_text(repo, &path)? {
                match PomProject::parse(&xml) {
                    Ok(parsed) => {
                        pom = Some(parsed);
                        break;
                    }
                    Err(e) => warn!("Ignoring unreadable POM {} in {}: {}", path, repo, e),
                }
            }
        }

        let model = match pom {
            None => None,
            Some(pom) => {
                let parent_model = match pom.parent {
                    Some(ref parent) if depth < MAX_PARENT_DEPTH => self.model(
                        session,
                        &parent.group_id,
                        &parent.artifact_id,
                        &parent.version,
                        repositories,
                        depth + 1,
                    )?,
                    Some(ref parent) => {
                        warn!(
                            "Parent chain too deep at {}:{}:{}",
                            parent.group_id, parent.artifact_id, parent.version
                        );
                        None
                    }
                    None => None,
                };

                let inherited = parent_model.as_deref();
                let properties = pom.effective_properties(
                    inherited.map(|p| &p.properties).unwrap_or(&HashMap::new()),
                );
                let mut dependencies = inherited
                    .map(|p| p.dependencies.clone())
                    .unwrap_or_default();
                dependencies.extend(pom.dependencies.iter().cloned());
                let mut management = pom.dependency_management.clone();
                if let Some(p) = inherited {
                    management.extend(p.management.iter().cloned());
                }

                Some(Rc::new(PomModel {
                    packaging: pom
                        .packaging
                        .as_deref()
                        .map(|p| super::pom::interpolate(p, &properties)),
                    properties,
                    dependencies,
                    management,
                }))
            }
        };

        session.models.insert(key, model.clone());
        Ok(model)
    }

    /// Managed versions for a model, including imported BOMs
    fn managed_versions(
        &self,
        session: &mut Session,
        model: &PomModel,
        repositories: &[RepoLocation],
        depth: usize,
    ) -> Result<HashMap<String, String>> {
        let mut managed = HashMap::new();
        for entry in &model.management {
            let entry = entry.interpolate(&model.properties);
            let Some(ref version) = entry.version else {
                continue;
            };

            if entry.scope.as_deref() == Some("import") {
                if depth >= MAX_PARENT_DEPTH {
                    continue;
                }
                let imported = self.model(
                    session,
                    &entry.group_id,
                    &entry.artifact_id,
                    version,
                    repositories,
                    0,
                )?;
                if let Some(imported) = imported {
                    for (k, v) in self.managed_versions(session, &imported, repositories, depth + 1)? {
                        managed.entry(k).or_insert(v);
                    }
                }
                continue;
            }

            managed
                .entry(format!("{}:{}", entry.group_id, entry.artifact_id))
                .or_insert_with(|| version.clone());
        }
        Ok(managed)
    }

    /// Runtime dependencies of a module as coordinates plus their exclusions
    fn dependencies(
        &self,
        session: &mut Session,
        model: &PomModel,
        repositories: &[RepoLocation],
    ) -> Result<Vec<(Coordinate, Vec<(String, String)>)>> {
        let managed = self.managed_versions(session, model, repositories, 0)?;
        let mut result = Vec::new();

        for dep in &model.dependencies {
            let dep = dep.interpolate(&model.properties);
            if !dep.is_runtime() {
                continue;
            }
            if dep.classifier.is_some() {
                debug!(
                    "Skipping classified dependency {}:{}:{:?}",
                    dep.group_id, dep.artifact_id, dep.classifier
                );
                continue;
            }

            let key = format!("{}:{}", dep.group_id, dep.artifact_id);
            let version = dep.version.clone().or_else(|| managed.get(&key).cloned());
            let Some(version) = version else {
                debug!("No version for dependency {}, skipping", key);
                continue;
            };

            let coordinate = Coordinate::new(dep.group_id, dep.artifact_id, Some(version.as_str()));
            result.push((coordinate, dep.exclusions));
        }

        Ok(result)
    }

    /// Walk the dependency graph once
    ///
    /// Returns the modules reached and whether an existing version selection
    /// was raised during the walk (meaning another pass is needed). Direct
    /// mode reaches every root exactly as given, several versions of one
    /// module included.
    fn walk(
        &self,
        session: &mut Session,
        roots: &[Coordinate],
        selected: &mut HashMap<String, String>,
        repositories: &[RepoLocation],
        mode: LookupMode,
    ) -> Result<(BTreeMap<String, Coordinate>, bool)> {
        let mut queue: VecDeque<Pending> = roots
            .iter()
            .map(|root| Pending {
                coordinate: root.clone(),
                exclusions: Rc::new(Vec::new()),
            })
            .collect();
        let mut visited = HashSet::new();
        let mut reached = BTreeMap::new();
        let mut raised = false;

        while let Some(Pending {
            coordinate,
            exclusions,
        }) = queue.pop_front()
        {
            let Some(requested) = coordinate.version.as_deref() else {
                continue;
            };
            if mode == LookupMode::Direct {
                if visited.insert(coordinate.to_string()) {
                    reached.insert(coordinate.to_string(), coordinate.clone());
                }
                continue;
            }

            let ga = coordinate.group_artifact_key();
            let version = match selected.get(&ga) {
                None => {
                    selected.insert(ga.clone(), requested.to_string());
                    requested.to_string()
                }
                Some(current) => match version::compare_total(requested, current) {
                    Ok(Ordering::Greater) => {
                        debug!("{} upgraded from {} to {}", ga, current, requested);
                        selected.insert(ga.clone(), requested.to_string());
                        raised = true;
                        requested.to_string()
                    }
                    Ok(_) => current.clone(),
                    Err(e) => {
                        debug!("Keeping {} {}: {}", ga, current, e);
                        current.clone()
                    }
                },
            };

            let node = coordinate.with_version(&version);
            if !visited.insert(format!("{}@{:?}", ga, node.classifier)) {
                continue;
            }
            reached.insert(node.to_string(), node.clone());

            let Some(model) =
                self.model(session, &node.group, &node.artifact, &version, repositories, 0)?
            else {
                continue;
            };

            for (dep, dep_exclusions) in self.dependencies(session, &model, repositories)? {
                if is_excluded(&exclusions, &dep.group, &dep.artifact) {
                    debug!("{} excluded below {}", dep, node);
                    continue;
                }
                let Some(pinned) = self.pin_version(session, &dep, repositories)? else {
                    debug!("No matching version for {}", dep);
                    continue;
                };

                let exclusions = if dep_exclusions.is_empty() {
                    Rc::clone(&exclusions)
                } else {
                    let mut combined = exclusions.to_vec();
                    combined.extend(dep_exclusions);
                    Rc::new(combined)
                };
                queue.push_back(Pending {
                    coordinate: dep.with_version(&pinned),
                    exclusions,
                });
            }
        }

        Ok((reached, raised))
    }

    /// Find the artifact file for a reached module
    fn materialize(
        &self,
        session: &mut Session,
        node: &Coordinate,
        repositories: &[RepoLocation],
    ) -> Result<Option<ResolvedArtifact>> {
        let Some(ref version) = node.version else {
            return Ok(None);
        };

        let extension = match node.classifier {
            Some(ref classifier) => classifier.clone(),
            None => {
                let model =
                    self.model(session, &node.group, &node.artifact, version, repositories, 0)?;
                let packaging = model.as_deref().and_then(|m| m.packaging.as_deref());
                match packaging_extension(packaging) {
                    Some(ext) => ext,
                    None => {
                        debug!("{} has pom packaging, no artifact", node);
                        return Ok(None);
                    }
                }
            }
        };

        let path = artifact_path(&node.group, &node.artifact, version, &extension);
        for repo in repositories {
            if let Some(location) = self.probe(repo, &path)? {
                debug!("Found {} in {}", node, repo);
                return Ok(Some(ResolvedArtifact::new(node.clone(), extension, location)));
            }
        }

        debug!("No {} artifact for {} in any repository", extension, node);
        Ok(None)
    }
}

impl RepositoryClient for MavenClient {
    fn lookup(
        &self,
        coordinates: &[Coordinate],
        repositories: &[RepoLocation],
        mode: LookupMode,
    ) -> Result<Vec<ResolvedArtifact>> {
        let mut session = Session::default();

        let mut roots = Vec::new();
        for coordinate in coordinates.iter().filter(|c| c.is_complete()) {
            match self.pin_version(&mut session, coordinate, repositories)? {
                Some(version) => roots.push(coordinate.with_version(&version)),
                None => debug!("No version available for {}", coordinate),
            }
        }

        let mut selected = HashMap::new();
        let mut reached = BTreeMap::new();
        for pass in 1..=MAX_GRAPH_PASSES {
            let (nodes, raised) =
                self.walk(&mut session, &roots, &mut selected, repositories, mode)?;
            reached = nodes;
            if !raised {
                break;
            }
            if pass == MAX_GRAPH_PASSES {
                warn!("Dependency graph did not settle after {} passes", pass);
            }
        }

        let mut artifacts = Vec::new();
        for node in reached.values() {
            if let Some(artifact) = self.materialize(&mut session, node, repositories)? {
                artifacts.push(artifact);
            }
        }

        info!(
            "Resolved {} of {} requested coordinates to {} artifacts",
            roots.len(),
            coordinates.len(),
            artifacts.len()
        );
        Ok(artifacts)
    }
}
