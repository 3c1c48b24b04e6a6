//! Package.xml parser

use std::path::Path;

use agiros_bloom_core::package::{Dependencies, Maintainer, Url as CoreUrl};
use agiros_bloom_core::{Dependency, PackageDescriptor, Result, VersionConstraint};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

use crate::package_xml::{PackageDependencies, PackageManifest, Person, Url};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("XML parsing error: {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("Invalid UTF-8 in XML: {0}")]
    Utf8Error(#[from] std::str::Utf8Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid package format: {0}")]
    InvalidFormat(String),

    #[error("XML attribute error: {0}")]
    AttrError(#[from] quick_xml::events::attributes::AttrError),
}

/// Parse a package.xml file into a package descriptor
pub fn parse_package_xml(path: &Path) -> Result<PackageDescriptor> {
    let content = std::fs::read_to_string(path)?;
    let manifest = parse_package_manifest(&content).map_err(|e| {
        agiros_bloom_core::Error::parse(format!("Failed to parse {}: {}", path.display(), e))
    })?;

    Ok(manifest_to_descriptor(manifest))
}

/// Parse package.xml content into a manifest
pub fn parse_package_manifest(xml_content: &str) -> Result<PackageManifest> {
    parse_manifest_internal(xml_content)
        .map_err(|e| agiros_bloom_core::Error::parse(e.to_string()))
}

fn parse_manifest_internal(xml_content: &str) -> std::result::Result<PackageManifest, ParseError> {
    let mut reader = Reader::from_str(xml_content);
    reader.trim_text(true);

    let mut manifest = PackageManifest {
        format: 1,
        name: String::new(),
        version: String::new(),
        description: String::new(),
        maintainers: Vec::new(),
        authors: Vec::new(),
        licenses: Vec::new(),
        urls: Vec::new(),
        build_type: None,
        dependencies: PackageDependencies::default(),
        member_of_groups: Vec::new(),
    };

    let mut buf = Vec::new();
    let mut current_element = String::new();
    let mut in_export = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name_bytes = e.name();
                let name = std::str::from_utf8(name_bytes.as_ref())?;
                current_element = name.to_string();

                match name {
                    "package" => manifest.format = parse_format(e)?,
                    "export" => in_export = true,
                    "build_depend"
                    | "build_export_depend"
                    | "buildtool_depend"
                    | "buildtool_export_depend"
                    | "exec_depend"
                    | "run_depend"
                    | "test_depend"
                    | "doc_depend"
                    | "depend"
                    | "replace"
                    | "conflict" => {
                        if let Some(dep) = parse_dependency(&mut reader, e)? {
                            add_dependency(&mut manifest.dependencies, name, dep);
                        }
                    }
                    "maintainer" | "author" => {
                        if let Some(person) = parse_person(&mut reader, e)? {
                            match name {
                                "maintainer" => manifest.maintainers.push(person),
                                "author" => manifest.authors.push(person),
                                _ => {}
                            }
                        }
                    }
                    "url" => {
                        if let Some(url) = parse_url(&mut reader, e)? {
                            manifest.urls.push(url);
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::End(ref e)) => {
                let name_bytes = e.name();
                let name = std::str::from_utf8(name_bytes.as_ref())?;
                if name == "export" {
                    in_export = false;
                }
                current_element.clear();
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape()?.trim().to_string();
                if !text.is_empty() {
                    match current_element.as_str() {
                        "name" => manifest.name = text,
                        "version" => manifest.version = text,
                        "description" => manifest.description = text,
                        "license" => manifest.licenses.push(text),
                        "member_of_group" => manifest.member_of_groups.push(text),
                        "build_type" if in_export => manifest.build_type = Some(text),
                        _ => {}
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }

    // Validate required fields
    if manifest.name.is_empty() {
        return Err(ParseError::MissingField("name".to_string()));
    }
    if manifest.version.is_empty() {
        return Err(ParseError::MissingField("version".to_string()));
    }
    if manifest.description.is_empty() {
        return Err(ParseError::MissingField("description".to_string()));
    }
    if manifest.maintainers.is_empty() {
        return Err(ParseError::MissingField("maintainer".to_string()));
    }
    if manifest.format > 1 && !manifest.dependencies.run_depend.is_empty() {
        return Err(ParseError::InvalidFormat(format!(
            "run_depend is not allowed in format {}",
            manifest.format
        )));
    }

    manifest.dependencies.expand_generic_depends();

    Ok(manifest)
}

fn parse_format(e: &BytesStart) -> std::result::Result<u32, ParseError> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == b"format" {
            let value = std::str::from_utf8(&attr.value)?;
            return value
                .parse()
                .map_err(|_| ParseError::InvalidFormat(format!("invalid format '{value}'")));
        }
    }
    Ok(1)
}

fn parse_dependency(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart,
) -> std::result::Result<Option<Dependency>, ParseError> {
    let mut dep = Dependency::new(String::new());

    // Parse attributes
    for attr in e.attributes() {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = std::str::from_utf8(&attr.value)?;

        if key == "condition" {
            dep.condition = Some(value.to_string());
        } else if let Some(constraint) = VersionConstraint::from_attribute(key, value) {
            dep.constraints.push(constraint);
        }
    }
    dep.constraints.sort();

    // Read the dependency name from text content
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Text(e)) => {
                dep.name = e.unescape()?.trim().to_string();
            }
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }

    if dep.name.is_empty() {
        Ok(None)
    } else {
        Ok(Some(dep))
    }
}

fn parse_person(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart,
) -> std::result::Result<Option<Person>, ParseError> {
    let mut person = Person { name: String::new(), email: None };

    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == b"email" {
            person.email = Some(std::str::from_utf8(&attr.value)?.to_string());
        }
    }

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Text(e)) => {
                person.name = e.unescape()?.trim().to_string();
            }
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }

    if person.name.is_empty() {
        Ok(None)
    } else {
        Ok(Some(person))
    }
}

fn parse_url(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart,
) -> std::result::Result<Option<Url>, ParseError> {
    let mut url = Url { url_type: None, url: String::new() };

    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == b"type" {
            url.url_type = Some(std::str::from_utf8(&attr.value)?.to_string());
        }
    }

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Text(e)) => {
                url.url = e.unescape()?.trim().to_string();
            }
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }

    if url.url.is_empty() {
        Ok(None)
    } else {
        Ok(Some(url))
    }
}

fn add_dependency(deps: &mut PackageDependencies, dep_type: &str, dep: Dependency) {
    match dep_type {
        "build_depend" => deps.build_depend.push(dep),
        "build_export_depend" => deps.build_export_depend.push(dep),
        "buildtool_depend" => deps.buildtool_depend.push(dep),
        "buildtool_export_depend" => deps.buildtool_export_depend.push(dep),
        "exec_depend" => deps.exec_depend.push(dep),
        "run_depend" => deps.run_depend.push(dep),
        "test_depend" => deps.test_depend.push(dep),
        "doc_depend" => deps.doc_depend.push(dep),
        "depend" => deps.depend.push(dep),
        "replace" => deps.replace.push(dep),
        "conflict" => deps.conflict.push(dep),
        _ => {}
    }
}

/// Convert a package manifest to the core descriptor type
pub fn manifest_to_descriptor(manifest: PackageManifest) -> PackageDescriptor {
    let deps = manifest.dependencies;
    let dependencies = Dependencies {
        build: deps.build_depend,
        build_export: deps.build_export_depend,
        buildtool: deps.buildtool_depend,
        buildtool_export: deps.buildtool_export_depend,
        exec: deps.exec_depend,
        test: deps.test_depend,
        doc: deps.doc_depend,
        replaces: deps.replace,
        conflicts: deps.conflict,
    };

    let maintainers = manifest
        .maintainers
        .into_iter()
        .map(|p| Maintainer { name: p.name, email: p.email.unwrap_or_default() })
        .collect();

    let urls = manifest
        .urls
        .into_iter()
        .map(|u| CoreUrl { url_type: u.url_type, url: u.url })
        .collect();

    PackageDescriptor {
        name: manifest.name,
        version: manifest.version,
        description: manifest.description,
        maintainers,
        licenses: manifest.licenses,
        urls,
        dependencies,
        member_of_groups: manifest.member_of_groups.into_iter().collect(),
    }
}
