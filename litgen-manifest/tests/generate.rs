//! End-to-end runs from a litgen.toml on disk to written Python files.

use std::fs;

use litgen_manifest::{Error, LitgenToml};
use tempfile::TempDir;

const MANIFEST: &str = r#"
[output]
dir = "generated"

[formatters]
sort_imports = true
first_party = ["models"]
layout = true

[[generator]]
class_name = "Platform"
source = "data/platforms.csv"

[generator.schema]
module = "models.base"
name = "PlatformModel"
fields = [{ name = "name", type = "str" }, { name = "abbreviation", type = "str" }]

[[generator]]
class_name = "Organization"
source = "data/organizations.json"
name_hints = ["name"]
render_abbreviation_map = false
default_module_name = "models.organizations"
output = "organizations.py"

[generator.schema]
module = "__main__"
name = "OrganizationModel"
fields = [
    { name = "name", type = "str" },
    { name = "abbreviation", type = "str" },
    { name = "registry", type = "str" },
]

[[generator.rules]]
field = "registry"
pattern = "Registry.{0}"
keys = [{ key = "registry", transform = "enum_key" }]
reference = { module = "models.registries", symbol = "Registry" }
"#;

fn project(manifest: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("data")).unwrap();
    fs::write(
        dir.path().join("data/platforms.csv"),
        "name,abbreviation\nAllen Institute,AIND\nOther Lab,OL-2\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("data/organizations.json"),
        r#"[
            {"name": "Allen Institute", "abbreviation": "AI", "registry": "ror"},
            {"name": "Fake Co", "abbreviation": "FC", "registry": "other registry"}
        ]"#,
    )
    .unwrap();
    fs::write(dir.path().join("litgen.toml"), manifest).unwrap();
    dir
}

#[test]
fn test_write_all_from_manifest() {
    let dir = project(MANIFEST);
    let litgen_toml = LitgenToml::open(dir.path().join("litgen.toml")).unwrap();
    let mut context = litgen_toml.build_context().unwrap();

    let output_dir = litgen_toml.output_dir();
    let written = context
        .write_all(&output_dir, litgen_toml.manifest().output.create_dir)
        .unwrap();

    assert_eq!(
        written,
        [
            output_dir.join("platform.py"),
            output_dir.join("organizations.py")
        ]
    );

    let platform = fs::read_to_string(output_dir.join("platform.py")).unwrap();
    assert!(platform.starts_with(
        "\"\"\"Generated by litgen from data/platforms.csv. Do not edit by hand.\"\"\"\n"
    ));
    assert!(platform.contains("from models.base import PlatformModel\n"));
    assert!(platform.contains("class Aind(PlatformModel):\n"));
    assert!(platform.contains("    AIND = Aind()\n"));

    let organizations = fs::read_to_string(output_dir.join("organizations.py")).unwrap();
    assert!(organizations.contains("from models.organizations import OrganizationModel\n"));
    assert!(organizations.contains("from models.registries import Registry\n"));
    assert!(organizations.contains(
        "    registry: Literal[Registry.OTHER_REGISTRY] = Registry.OTHER_REGISTRY\n"
    ));
    assert!(!organizations.contains("from_abbreviation"));
}

#[test]
fn test_generate_all_matches_written_files() {
    let dir = project(MANIFEST);
    let litgen_toml = LitgenToml::open(dir.path().join("litgen.toml")).unwrap();

    let generated = litgen_toml.build_context().unwrap().generate_all().unwrap();
    let mut context = litgen_toml.build_context().unwrap();
    let written = context.write_all(&litgen_toml.output_dir(), true).unwrap();

    for (code, path) in generated.iter().zip(&written) {
        assert_eq!(code, &fs::read_to_string(path).unwrap());
    }
}

#[test]
fn test_missing_source_fails_generation() {
    let dir = project(MANIFEST);
    fs::remove_file(dir.path().join("data/platforms.csv")).unwrap();

    let litgen_toml = LitgenToml::open(dir.path().join("litgen.toml")).unwrap();
    let err = litgen_toml
        .build_context()
        .unwrap()
        .generate_all()
        .unwrap_err();
    assert!(matches!(err, litgen_codegen::Error::Source { .. }));
}

#[test]
fn test_output_dir_must_exist_without_create_dir() {
    let manifest = MANIFEST.replace("dir = \"generated\"", "dir = \"generated\"\ncreate_dir = false");
    let dir = project(&manifest);
    let litgen_toml = LitgenToml::open(dir.path().join("litgen.toml")).unwrap();
    assert!(!litgen_toml.manifest().output.create_dir);

    let err = litgen_toml
        .build_context()
        .unwrap()
        .write_all(&litgen_toml.output_dir(), false)
        .unwrap_err();
    assert!(matches!(err, litgen_codegen::Error::Io { .. }));
    assert!(!litgen_toml.output_dir().exists());
}

#[test]
fn test_open_reports_filename_in_validation_errors() {
    let manifest = MANIFEST.replace("class_name = \"Platform\"", "class_name = \"platform\"");
    let dir = project(&manifest);
    let path = dir.path().join("litgen.toml");

    let err = LitgenToml::open(&path).unwrap_err();
    match *err {
        Error::Validation { src, message, .. } => {
            assert_eq!(src.name(), path.display().to_string());
            assert!(message.contains("'platform'"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}
