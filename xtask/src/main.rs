//! Developer tasks (schema generation and sample-document conformance).
//!
//! Keeping this separate keeps the library crates free of automation dependencies.

use anyhow::{Context, bail};
use htmlguard_settings::{ConfigFileV1, DocumentFormat, parse_config, validate_file};
use schemars::schema_for;
use std::fs;
use std::path::PathBuf;

/// Get the project root (parent of xtask directory).
fn project_root() -> anyhow::Result<PathBuf> {
    let manifest_dir = match std::env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => std::env::current_dir().context("Cannot determine current directory")?,
    };

    if manifest_dir.ends_with("xtask") {
        manifest_dir
            .parent()
            .map(PathBuf::from)
            .context("xtask has no parent")
    } else {
        Ok(manifest_dir)
    }
}

fn schemas_dir() -> anyhow::Result<PathBuf> {
    Ok(project_root()?.join("schemas"))
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

fn generate_config_schema() -> schemars::Schema {
    schema_for!(ConfigFileV1)
}

fn generate_sanitization_schema() -> schemars::Schema {
    schema_for!(htmlguard_types::SanitizationResult)
}

fn generate_validation_schema() -> schemars::Schema {
    schema_for!(htmlguard_types::ValidationResult)
}

fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "htmlguard.config.v1.json",
            generate: generate_config_schema,
        },
        SchemaSpec {
            filename: "htmlguard.sanitization-result.v1.json",
            generate: generate_sanitization_schema,
        },
        SchemaSpec {
            filename: "htmlguard.validation-result.v1.json",
            generate: generate_validation_schema,
        },
    ]
}

/// Serialize a schema to pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("Failed to serialize schema")?;
    json.push('\n');
    Ok(json)
}

fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir()?;
    fs::create_dir_all(&dir).context("Failed to create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)())?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json)
            .with_context(|| format!("Failed to write schema to {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    println!("\nSchemas emitted successfully.");
    Ok(())
}

/// Validate that schemas in the repo match what would be generated.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir()?;
    let mut missing = Vec::new();
    let mut mismatched = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);
        if !path.exists() {
            missing.push(spec.filename);
            continue;
        }

        let expected = serialize_schema(&(spec.generate)())?;
        let actual = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if expected != actual {
            mismatched.push(spec.filename);
        }
    }

    if missing.is_empty() && mismatched.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }
    if !missing.is_empty() {
        eprintln!("Missing schemas:");
        for name in &missing {
            eprintln!("  - {name}");
        }
    }
    if !mismatched.is_empty() {
        eprintln!("Schemas out of date:");
        for name in &mismatched {
            eprintln!("  - {name}");
        }
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("Schema validation failed")
}

/// Sample documents shipped with the workspace, with the encoding each is written in.
fn sample_documents() -> Vec<(&'static str, &'static str, DocumentFormat)> {
    vec![
        ("site.yml", htmlguard_test_util::SITE_YAML, DocumentFormat::Yaml),
        ("site.toml", htmlguard_test_util::SITE_TOML, DocumentFormat::Toml),
        ("site.json", htmlguard_test_util::SITE_JSON, DocumentFormat::Json),
        (
            "global.custom.yml",
            htmlguard_test_util::GLOBAL_CUSTOM_YAML,
            DocumentFormat::Yaml,
        ),
        (
            "global.default.yml",
            htmlguard_settings::GLOBAL_DEFAULT_YAML,
            DocumentFormat::Yaml,
        ),
    ]
}

/// Check every sample document against the config schema and the document validator.
fn conform() -> anyhow::Result<()> {
    let schema = serde_json::to_value(generate_config_schema())
        .context("Failed to convert config schema to JSON")?;
    let compiled = jsonschema::draft202012::new(&schema)
        .map_err(|e| anyhow::anyhow!("Failed to compile config schema: {e}"))?;
    println!("✓ htmlguard.config.v1 schema compiles");

    let mut errors = Vec::new();
    for (name, text, format) in sample_documents() {
        let file = match parse_config(text, format) {
            Ok(file) => file,
            Err(err) => {
                errors.push(format!("{name}: decode: {err}"));
                continue;
            }
        };

        let value = serde_json::to_value(&file)
            .with_context(|| format!("Failed to convert {name} to JSON"))?;
        for err in compiled.iter_errors(&value) {
            errors.push(format!("{name}: schema validation: {err}"));
        }

        if let Err(err) = validate_file(&file) {
            for violation in err.violations() {
                errors.push(format!("{name}: {violation}"));
            }
        }
        println!("  ✓ {name} checked");
    }

    if !errors.is_empty() {
        eprintln!("\nConformance errors:");
        for err in &errors {
            eprintln!("  - {err}");
        }
        bail!("Conformance validation failed with {} errors", errors.len());
    }

    println!("\n✓ All sample documents pass conformance checks!");
    Ok(())
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  conform           Check sample documents against the config schema and validator");
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "conform" => conform(),
        "print-schema-ids" => {
            for spec in schema_specs() {
                println!("{}", spec.filename.trim_end_matches(".json"));
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
