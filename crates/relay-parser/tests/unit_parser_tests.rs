//! Integration tests for the location-aware document parser
//!
//! Tests parsing pipeline definition files from disk, the location index,
//! and the error reported for each failure kind.

use relay_core::PipelineDefinition;
use relay_parser::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn write_source(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

const FULL_PIPELINE: &str = r#"version: "1.0"
pipeline:
  name: release
  stages:
    - build
    - test
  jobs:
    - name: compile
      stage: build
      script:
        - cargo build
    - name: unit
      stage: test
      needs: [compile]
"#;

// =============================================================================
// Successful Parsing
// =============================================================================

#[test]
fn test_parse_pipeline_file() -> anyhow::Result<()> {
    init_logging();
    let dir = TempDir::new()?;
    let path = write_source(&dir, "release.yaml", FULL_PIPELINE);

    let parsed = parse_pipeline(&path)?;
    let pipeline = &parsed.model.pipeline;

    assert_eq!(parsed.source_name, "release.yaml");
    assert_eq!(pipeline.name, "release");
    assert_eq!(pipeline.stages, vec!["build", "test"]);
    assert_eq!(pipeline.jobs.len(), 2);
    assert_eq!(pipeline.job("unit").unwrap().needs, vec!["compile"]);
    Ok(())
}

#[test]
fn test_field_locations() -> anyhow::Result<()> {
    init_logging();
    let dir = TempDir::new()?;
    let path = write_source(&dir, "release.yaml", FULL_PIPELINE);

    let parsed = parse_pipeline(&path)?;

    assert_eq!(parsed.field_line(""), 1);
    assert_eq!(parsed.field_line("version"), 1);
    assert_eq!(parsed.field_line("pipeline"), 3);
    assert_eq!(parsed.field_line("pipeline.name"), 3);
    assert_eq!(parsed.field_line("pipeline.stages"), 5);
    assert_eq!(parsed.field_line("pipeline.stages[1]"), 6);
    assert_eq!(parsed.field_line("pipeline.jobs[0].script[0]"), 11);
    assert_eq!(parsed.field_line("pipeline.jobs[1].name"), 12);
    assert_eq!(parsed.field_line("pipeline.jobs[1].needs[0]"), 14);
    assert_eq!(parsed.field_column("pipeline.jobs[1].needs[0]"), 15);
    Ok(())
}

#[test]
fn test_every_path_has_a_line() -> anyhow::Result<()> {
    let parsed: ParsedDocument<PipelineDefinition> =
        DocumentParser::default().parse_str("release.yaml", FULL_PIPELINE)?;

    assert!(!parsed.locations.is_empty());
    for (path, mark) in parsed.locations.iter() {
        assert!(mark.display_line() >= 1, "path {path} has no line");
        assert_eq!(parsed.field_line(path), mark.display_line());
    }
    Ok(())
}

#[test]
fn test_unknown_path_returns_one() -> anyhow::Result<()> {
    let parsed: ParsedDocument<PipelineDefinition> =
        DocumentParser::default().parse_str("release.yaml", FULL_PIPELINE)?;

    assert_eq!(parsed.field_line("pipeline.timeout"), 1);
    assert_eq!(parsed.field_line("pipeline.jobs[7]"), 1);
    Ok(())
}

#[test]
fn test_parsing_is_repeatable() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = write_source(&dir, "release.yaml", FULL_PIPELINE);

    let first = parse_pipeline(&path)?;
    let second = parse_pipeline(&path)?;

    assert_eq!(first.model, second.model);
    assert_eq!(first.locations, second.locations);
    Ok(())
}

#[test]
fn test_path_construction_example() -> anyhow::Result<()> {
    #[derive(serde::Deserialize)]
    struct Loose {
        a: serde_yaml::Value,
    }

    impl Definition for Loose {
        fn display_name(&self) -> &str {
            "loose"
        }
    }

    let content = "a:\n  b:\n    - 1\n    - 2\n";
    let parsed: ParsedDocument<Loose> = DocumentParser::default().parse_str("a.yaml", content)?;

    assert_eq!(parsed.locations.paths(), vec!["", "a", "a.b", "a.b[0]", "a.b[1]"]);
    assert_eq!(parsed.field_line("a"), 2);
    assert_eq!(parsed.field_line("a.b"), 3);
    assert_eq!(parsed.field_line("a.b[1]"), 4);
    assert!(parsed.model.a["b"].is_sequence());
    Ok(())
}

#[test]
fn test_anchors_and_aliases() -> anyhow::Result<()> {
    let content = r#"pipeline:
  name: images
  stages: [build]
  jobs:
    - name: a
      stage: build
      image: &rust rust:1.80
    - name: b
      stage: build
      image: *rust
"#;
    let parsed: ParsedDocument<PipelineDefinition> =
        DocumentParser::default().parse_str("images.yaml", content)?;

    assert_eq!(
        parsed.model.pipeline.job("b").unwrap().image.as_deref(),
        Some("rust:1.80")
    );
    assert_eq!(parsed.field_line("pipeline.jobs[1].image"), 10);
    Ok(())
}

#[test]
fn test_empty_values_located_at_their_key() -> anyhow::Result<()> {
    let parser = DocumentParser::default();

    let content = "pipeline:\n  description:\n\n\n  name: b\n";
    let parsed: ParsedDocument<PipelineDefinition> = parser.parse_str("gap.yaml", content)?;
    assert_eq!(parsed.model.pipeline.description, None);
    assert_eq!(parsed.field_line("pipeline.description"), 2);
    assert_eq!(parsed.field_column("pipeline.description"), 15);
    assert_eq!(parsed.field_line("pipeline.name"), 5);

    let content = "pipeline:\n  name: b\n  description:\n";
    let parsed: ParsedDocument<PipelineDefinition> = parser.parse_str("last.yaml", content)?;
    assert_eq!(parsed.field_line("pipeline.description"), 3);
    assert_eq!(parsed.field_column("pipeline.description"), 15);
    Ok(())
}

#[test]
fn test_tags_are_ignored() -> anyhow::Result<()> {
    let content = r#"pipeline:
  name: !!python/object:os.system build
  stages: [!!int "5"]
  jobs:
    - name: !custom a
      stage: !!int "5"
"#;
    let parsed: ParsedDocument<PipelineDefinition> =
        DocumentParser::default().parse_str("tags.yaml", content)?;
    let pipeline = &parsed.model.pipeline;

    assert_eq!(pipeline.name, "build");
    assert_eq!(pipeline.stages, vec!["5"]);
    assert_eq!(pipeline.jobs[0].name, "a");
    assert_eq!(pipeline.jobs[0].stage, "5");
    Ok(())
}

#[test]
fn test_crlf_positions() -> anyhow::Result<()> {
    let content = "pipeline:\r\n  name: build\r\n  stages: [a]\r\n  jobs:\r\n    - name: x\r\n      stage: a\r\n";
    let parsed: ParsedDocument<PipelineDefinition> =
        DocumentParser::default().parse_str("crlf.yaml", content)?;

    assert_eq!(parsed.model.pipeline.name, "build");
    assert_eq!(parsed.field_line("pipeline.name"), 2);
    assert_eq!(parsed.field_column("pipeline.name"), 9);
    assert_eq!(parsed.field_line("pipeline.stages"), 3);
    assert_eq!(parsed.field_column("pipeline.stages"), 11);
    assert_eq!(parsed.field_line("pipeline.jobs[0].stage"), 6);
    assert_eq!(parsed.field_column("pipeline.jobs[0].stage"), 14);
    Ok(())
}

#[test]
fn test_source_locations_across_files() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let first = write_source(&dir, "one.yaml", "pipeline:\n  name: one\n");
    let second = write_source(&dir, "two.yaml", "\n\npipeline:\n  name: two\n");

    let mut sources = SourceLocations::new();
    for path in [first, second] {
        let parsed = parse_pipeline(&path)?;
        sources.insert(parsed.source_name.clone(), parsed.locations);
    }

    assert_eq!(sources.field_line("one.yaml", "pipeline.name"), 2);
    assert_eq!(sources.field_line("two.yaml", "pipeline.name"), 4);
    assert_eq!(sources.field_line("three.yaml", "pipeline.name"), 1);
    Ok(())
}

// =============================================================================
// Failure Kinds
// =============================================================================

#[test]
fn test_missing_file() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.yaml");

    let err = parse_pipeline(&path).unwrap_err();

    assert_eq!(err.kind, ParseErrorKind::SourceNotFound);
    assert_eq!((err.line, err.column), (0, 0));
    assert_eq!(err.source_name, "missing.yaml");
    assert!(err.message.starts_with("source not found: "));
    assert!(err.message.contains(&path.display().to_string()));
}

#[test]
fn test_relative_missing_file_reports_absolute_path() {
    let err = parse_pipeline("no/such/dir/pipeline.yaml").unwrap_err();

    assert_eq!(err.kind, ParseErrorKind::SourceNotFound);
    let reported = err.message.trim_start_matches("source not found: ");
    assert!(PathBuf::from(reported).is_absolute(), "reported: {reported}");
    assert!(reported.ends_with("pipeline.yaml"));
}

#[test]
fn test_directory_is_not_a_source() {
    let dir = TempDir::new().unwrap();
    let err = parse_pipeline(dir.path()).unwrap_err();

    assert_eq!(err.kind, ParseErrorKind::SourceNotFound);
    assert_eq!((err.line, err.column), (0, 0));
}

#[test]
fn test_empty_file() {
    let dir = TempDir::new().unwrap();
    for content in ["", "   ", "\n\n\t\n"] {
        let path = write_source(&dir, "empty.yaml", content);
        let err = parse_pipeline(&path).unwrap_err();

        assert_eq!(err.kind, ParseErrorKind::EmptyDocument);
        assert_eq!((err.line, err.column), (1, 1));
        assert_eq!(err.message, "document is empty");
    }
}

#[test]
fn test_invalid_utf8_is_io_failure() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("binary.yaml");
    fs::write(&path, [0x70, 0x3a, 0x20, 0xff, 0xfe]).unwrap();

    let err = parse_pipeline(&path).unwrap_err();

    assert_eq!(err.kind, ParseErrorKind::Io);
    assert_eq!((err.line, err.column), (0, 0));
    assert!(err.message.starts_with("failed to read source: "));
}

#[test]
fn test_syntax_error() {
    let dir = TempDir::new().unwrap();
    let path = write_source(
        &dir,
        "broken.yaml",
        "pipeline:\n  name: build: broken\n",
    );

    let err = parse_pipeline(&path).unwrap_err();

    assert_eq!(err.kind, ParseErrorKind::Syntax);
    assert_eq!((err.line, err.column), (2, 14));
    assert!(err.message.starts_with("parsing error: "));
    assert_eq!(err.source_name, "broken.yaml");
    assert!(err.to_string().starts_with("broken.yaml:2:14: parsing error: "));
}

#[test]
fn test_syntax_error_positions() {
    let parser = DocumentParser::default();
    let cases = [
        // key indented less than its siblings
        ("a:\n  b: 1\n c: 2\n", (3, 3)),
        // tab used for indentation
        ("a:\n\t- b\n", (2, 2)),
    ];

    for (content, position) in cases {
        let err = parser
            .parse_str::<PipelineDefinition>("broken.yaml", content)
            .unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::Syntax, "content: {content:?}");
        assert_eq!((err.line, err.column), position, "content: {content:?}");
    }
}

#[test]
fn test_missing_required_field() {
    let dir = TempDir::new().unwrap();
    let path = write_source(&dir, "nameless.yaml", "pipeline:\n  stages: []\n");

    let err = parse_pipeline(&path).unwrap_err();

    assert_eq!(err.kind, ParseErrorKind::InvalidFormat);
    assert!(err.message.contains("name"), "message: {}", err.message);
    assert_eq!((err.line, err.column), (2, 3));
}

#[test]
fn test_type_mismatch_is_located() {
    let content = "pipeline:\n  name: release\n  jobs:\n    - name: a\n      stage: build\n      script: {run: make}\n";
    let err = DocumentParser::default()
        .parse_str::<PipelineDefinition>("typed.yaml", content)
        .unwrap_err();

    assert_eq!(err.kind, ParseErrorKind::InvalidFormat);
    assert_eq!((err.line, err.column), (6, 15));
}

#[test]
fn test_root_scalar_is_invalid_format() {
    let err = DocumentParser::default()
        .parse_str::<PipelineDefinition>("scalar.yaml", "just text")
        .unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::InvalidFormat);
}

#[test]
fn test_strict_config_rejects_duplicate_keys() {
    let content = "pipeline:\n  name: a\n  name: b\n";

    let lenient: ParsedDocument<PipelineDefinition> = DocumentParser::default()
        .parse_str("dup.yaml", content)
        .unwrap();
    assert_eq!(lenient.model.pipeline.name, "b");
    assert_eq!(lenient.field_line("pipeline.name"), 3);

    let err = DocumentParser::new(ParserConfig::strict())
        .parse_str::<PipelineDefinition>("dup.yaml", content)
        .unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::InvalidStructure);
    assert_eq!((err.line, err.column), (3, 3));
}

#[test]
fn test_error_display() {
    let err = DocumentParser::default()
        .parse_str::<PipelineDefinition>("blank.yaml", " ")
        .unwrap_err();
    assert_eq!(err.to_string(), "blank.yaml:1:1: document is empty");
}
