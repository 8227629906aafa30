// src/repository/pom.rs

//! POM parsing
//!
//! Extracts the parts of a `pom.xml` needed to walk a dependency graph:
//! identity, packaging, parent, properties, dependencies and
//! dependencyManagement. Everything else (build, profiles, plugins) is
//! ignored.

use crate::error::{Error, Result};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::HashMap;

/// Maximum nesting of `${...}` references
const MAX_INTERPOLATION_DEPTH: usize = 10;

/// Parent POM reference
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PomParent {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

/// A `<dependency>` entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PomDependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
    pub scope: Option<String>,
    pub dep_type: Option<String>,
    pub classifier: Option<String>,
    pub optional: bool,
    /// `(groupId, artifactId)` pairs, `*` matches anything
    pub exclusions: Vec<(String, String)>,
}

impl PomDependency {
    /// Whether this dependency is part of the runtime classpath
    pub fn is_runtime(&self) -> bool {
        !self.optional
            && matches!(
                self.scope.as_deref(),
                None | Some("") | Some("compile") | Some("runtime")
            )
    }

    /// Replace `${...}` references in every field
    pub fn interpolate(&self, properties: &HashMap<String, String>) -> Self {
        let sub = |s: &str| interpolate(s, properties);
        Self {
            group_id: sub(&self.group_id),
            artifact_id: sub(&self.artifact_id),
            version: self.version.as_deref().map(sub),
            scope: self.scope.as_deref().map(sub),
            dep_type: self.dep_type.as_deref().map(sub),
            classifier: self.classifier.as_deref().map(sub),
            optional: self.optional,
            exclusions: self.exclusions.clone(),
        }
    }
}

/// The subset of a POM the resolver uses
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PomProject {
    pub group_id: Option<String>,
    pub artifact_id: String,
    pub version: Option<String>,
    pub packaging: Option<String>,
    pub parent: Option<PomParent>,
    pub properties: HashMap<String, String>,
    pub dependencies: Vec<PomDependency>,
    pub dependency_management: Vec<PomDependency>,
}

impl PomProject {
    /// Parse a POM document
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut project = PomProject::default();
        let mut path: Vec<String> = Vec::new();
        let mut current: Option<PomDependency> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    path.push(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
                    let segments: Vec<&str> = path.iter().map(String::as_str).collect();
                    match segments.as_slice() {
                        ["project", "dependencies", "dependency"]
                        | ["project", "dependencyManagement", "dependencies", "dependency"] => {
                            current = Some(PomDependency::default());
                        }
                        [.., "dependency", "exclusions", "exclusion"] => {
                            if let Some(dep) = current.as_mut() {
                                dep.exclusions.push((String::new(), String::new()));
                            }
                        }
                        ["project", "parent"] => project.parent = Some(PomParent::default()),
                        _ => {}
                    }
                }
                Ok(Event::End(_)) => {
                    let segments: Vec<&str> = path.iter().map(String::as_str).collect();
                    match segments.as_slice() {
                        ["project", "dependencies", "dependency"] => {
                            project.dependencies.extend(current.take());
                        }
                        ["project", "dependencyManagement", "dependencies", "dependency"] => {
                            project.dependency_management.extend(current.take());
                        }
                        _ => {}
                    }
                    path.pop();
                }
                Ok(Event::Text(t)) => {
                    let text = t
                        .unescape()
                        .map_err(|e| Error::ParseError(format!("Bad POM text: {}", e)))?
                        .trim()
                        .to_string();
                    if !text.is_empty() {
                        project.apply_text(&path, text, current.as_mut());
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(Error::ParseError(format!(
                        "Invalid POM at position {}: {}",
                        reader.buffer_position(),
                        e
                    )));
                }
            }
        }

        if project.artifact_id.is_empty() {
            return Err(Error::ParseError("POM has no artifactId".to_string()));
        }

        Ok(project)
    }

    fn apply_text(&mut self, path: &[String], text: String, current: Option<&mut PomDependency>) {
        let segments: Vec<&str> = path.iter().map(String::as_str).collect();
        match segments.as_slice() {
            ["project", "groupId"] => self.group_id = Some(text),
            ["project", "artifactId"] => self.artifact_id = text,
            ["project", "version"] => self.version = Some(text),
            ["project", "packaging"] => self.packaging = Some(text),
            ["project", "parent", field] => {
                if let Some(parent) = self.parent.as_mut() {
                    match *field {
                        "groupId" => parent.group_id = text,
                        "artifactId" => parent.artifact_id = text,
                        "version" => parent.version = text,
                        _ => {}
                    }
                }
            }
            ["project", "properties", name] => {
                self.properties.insert((*name).to_string(), text);
            }
            [.., "dependency", "exclusions", "exclusion", field] => {
                if let Some((group, artifact)) = current.and_then(|d| d.exclusions.last_mut()) {
                    match *field {
                        "groupId" => *group = text,
                        "artifactId" => *artifact = text,
                        _ => {}
                    }
                }
            }
            ["project", "dependencies", "dependency", field]
            | ["project", "dependencyManagement", "dependencies", "dependency", field] => {
                if let Some(dep) = current {
                    match *field {
                        "groupId" => dep.group_id = text,
                        "artifactId" => dep.artifact_id = text,
                        "version" => dep.version = Some(text),
                        "scope" => dep.scope = Some(text),
                        "type" => dep.dep_type = Some(text),
                        "classifier" => dep.classifier = Some(text),
                        "optional" => dep.optional = text.eq_ignore_ascii_case("true"),
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    /// Group id, inherited from the parent when not declared
    pub fn effective_group_id(&self) -> Option<&str> {
        self.group_id
            .as_deref()
            .or_else(|| self.parent.as_ref().map(|p| p.group_id.as_str()))
    }

    /// Version, inherited from the parent when not declared
    pub fn effective_version(&self) -> Option<&str> {
        self.version
            .as_deref()
            .or_else(|| self.parent.as_ref().map(|p| p.version.as_str()))
    }

    /// Properties visible to this POM
    ///
    /// `inherited` holds the parent chain's properties; this POM's own
    /// properties and the built-in `project.*` values override them.
    pub fn effective_properties(&self, inherited: &HashMap<String, String>) -> HashMap<String, String> {
        let mut props = inherited.clone();
        props.extend(self.properties.iter().map(|(k, v)| (k.clone(), v.clone())));

        let mut builtin = |key: &str, value: Option<&str>| {
            if let Some(value) = value {
                props.insert(key.to_string(), value.to_string());
            }
        };
        builtin("project.groupId", self.effective_group_id());
        builtin("pom.groupId", self.effective_group_id());
        builtin("groupId", self.effective_group_id());
        builtin("project.artifactId", Some(self.artifact_id.as_str()));
        builtin("pom.artifactId", Some(self.artifact_id.as_str()));
        builtin("project.version", self.effective_version());
        builtin("pom.version", self.effective_version());
        builtin("version", self.effective_version());
        if let Some(ref parent) = self.parent {
            builtin("project.parent.groupId", Some(parent.group_id.as_str()));
            builtin("project.parent.version", Some(parent.version.as_str()));
        }
        props
    }
}

/// Replace `${name}` references using `properties`
///
/// Unknown references are left in place.
pub fn interpolate(value: &str, properties: &HashMap<String, String>) -> String {
    let mut result = value.to_string();
    for _ in 0..MAX_INTERPOLATION_DEPTH {
        let (next, changed) = interpolate_once(&result, properties);
        result = next;
        if !changed {
            break;
        }
    }
    result
}

fn interpolate_once(value: &str, properties: &HashMap<String, String>) -> (String, bool) {
    let mut output = String::with_capacity(value.len());
    let mut rest = value;
    let mut changed = false;

    while let Some(open) = rest.find("${") {
        let Some(close) = rest[open..].find('}').map(|p| p + open) else {
            break;
        };
        output.push_str(&rest[..open]);
        match properties.get(&rest[open + 2..close]) {
            Some(v) => {
                output.push_str(v);
                changed = true;
            }
            None => output.push_str(&rest[open..=close]),
        }
        rest = &rest[close + 1..];
    }
    output.push_str(rest);
    (output, changed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
  <modelVersion>4.0.0</modelVersion>
  <parent>
    <groupId>com.example</groupId>
    <artifactId>parent</artifactId>
    <version>2.0</version>
  </parent>
  <artifactId>lib</artifactId>
  <packaging>aar</packaging>
  <properties>
    <dep.version>1.5</dep.version>
  </properties>
  <dependencies>
    <dependency>
      <groupId>${project.groupId}</groupId>
      <artifactId>core</artifactId>
      <version>${project.version}</version>
    </dependency>
    <dependency>
      <groupId>org.other</groupId>
      <artifactId>util</artifactId>
      <version>${dep.version}</version>
      <scope>runtime</scope>
      <exclusions>
        <exclusion>
          <groupId>org.noise</groupId>
          <artifactId>*</artifactId>
        </exclusion>
      </exclusions>
    </dependency>
    <dependency>
      <groupId>junit</groupId>
      <artifactId>junit</artifactId>
      <version>4.12</version>
      <scope>test</scope>
    </dependency>
    <dependency>
      <groupId>org.opt</groupId>
      <artifactId>extra</artifactId>
      <version>1.0</version>
      <optional>true</optional>
    </dependency>
  </dependencies>
  <dependencyManagement>
    <dependencies>
      <dependency>
        <groupId>org.managed</groupId>
        <artifactId>managed</artifactId>
        <version>3.1</version>
      </dependency>
    </dependencies>
  </dependencyManagement>
</project>"#;

    #[test]
    fn test_parse_identity_and_parent() {
        let pom = PomProject::parse(POM).unwrap();
        assert_eq!(pom.artifact_id, "lib");
        assert_eq!(pom.group_id, None);
        assert_eq!(pom.effective_group_id(), Some("com.example"));
        assert_eq!(pom.effective_version(), Some("2.0"));
        assert_eq!(pom.packaging.as_deref(), Some("aar"));
        assert_eq!(
            pom.parent,
            Some(PomParent {
                group_id: "com.example".to_string(),
                artifact_id: "parent".to_string(),
                version: "2.0".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_dependencies() {
        let pom = PomProject::parse(POM).unwrap();
        assert_eq!(pom.dependencies.len(), 4);
        assert_eq!(pom.dependency_management.len(), 1);
        assert_eq!(pom.dependency_management[0].artifact_id, "managed");

        let util = &pom.dependencies[1];
        assert_eq!(util.scope.as_deref(), Some("runtime"));
        assert_eq!(
            util.exclusions,
            vec![("org.noise".to_string(), "*".to_string())]
        );

        let runtime: Vec<&str> = pom
            .dependencies
            .iter()
            .filter(|d| d.is_runtime())
            .map(|d| d.artifact_id.as_str())
            .collect();
        assert_eq!(runtime, vec!["core", "util"]);
    }

    #[test]
    fn test_interpolate_dependencies() {
        let pom = PomProject::parse(POM).unwrap();
        let props = pom.effective_properties(&HashMap::new());

        let core = pom.dependencies[0].interpolate(&props);
        assert_eq!(core.group_id, "com.example");
        assert_eq!(core.version.as_deref(), Some("2.0"));

        let util = pom.dependencies[1].interpolate(&props);
        assert_eq!(util.version.as_deref(), Some("1.5"));
    }

    #[test]
    fn test_interpolate_nested_and_unknown() {
        let mut props = HashMap::new();
        props.insert("a".to_string(), "${b}".to_string());
        props.insert("b".to_string(), "42".to_string());
        assert_eq!(interpolate("v${a}-${missing}", &props), "v42-${missing}");
        assert_eq!(interpolate("plain", &props), "plain");
    }

    #[test]
    fn test_interpolate_self_reference_terminates() {
        let mut props = HashMap::new();
        props.insert("x".to_string(), "${x}".to_string());
        assert_eq!(interpolate("${x}", &props), "${x}");
    }

    #[test]
    fn test_inherited_properties_are_overridden() {
        let pom = PomProject::parse(POM).unwrap();
        let mut inherited = HashMap::new();
        inherited.insert("dep.version".to_string(), "0.1".to_string());
        inherited.insert("from.parent".to_string(), "yes".to_string());

        let props = pom.effective_properties(&inherited);
        assert_eq!(props.get("dep.version").map(String::as_str), Some("1.5"));
        assert_eq!(props.get("from.parent").map(String::as_str), Some("yes"));
    }

    #[test]
    fn test_missing_artifact_id_is_error() {
        assert!(PomProject::parse("<project><groupId>g</groupId></project>").is_err());
    }
}
