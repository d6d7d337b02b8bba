//! JSON API CLI - Command-line tool for packing nested JSON into JSON API documents
//!
//! This binary provides command-line interfaces for:
//! - pack: JSON/NDJSON records → packed document
//! - templates: print the link templates of a resource
//! - resources: list declared resources and their relationships

mod schema;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use jsonapi_format::JsonApiError;
use jsonapi_pack::Wrapper;
use schema::{OptionOverrides, Schema};
use serde_json::{json, Value};
use std::error::Error;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "jsonapi")]
#[command(about = "Pack nested JSON records into JSON API documents")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack JSON/NDJSON records of one resource type
    ///
    /// Examples:
    ///   jsonapi pack posts.json --schema blog.toml --resource posts
    ///   jsonapi pack posts.ndjson -s blog.toml -r posts --verbose-links --pretty
    ///   cat posts.json | jsonapi pack - -s blog.toml -r posts -o packed.json
    Pack {
        /// Input file (JSON value or NDJSON); `-` reads stdin
        input: PathBuf,
        /// Resource schema (TOML)
        #[arg(short, long)]
        schema: PathBuf,
        /// Resource type of the input records
        #[arg(short, long)]
        resource: String,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Explicitly treat input as NDJSON (overrides extension detection)
        #[arg(long, conflicts_with = "json")]
        ndjson: bool,
        /// Explicitly treat input as a single JSON value (overrides extension detection)
        #[arg(long)]
        json: bool,
        /// Pretty-print the packed document
        #[arg(long)]
        pretty: bool,
        /// Override the schema's base URL
        #[arg(long)]
        base_url: Option<String>,
        /// Emit {id, type, href} links instead of bare ids
        #[arg(long)]
        verbose_links: bool,
        /// Emit the top-level link templates section
        #[arg(long)]
        url_templates: bool,
        /// Show progress spinner while packing
        #[arg(long)]
        progress: bool,
    },
    /// Print the link templates of a resource
    Templates {
        /// Resource schema (TOML)
        #[arg(short, long)]
        schema: PathBuf,
        /// Resource type
        #[arg(short, long)]
        resource: String,
        /// Override the schema's base URL
        #[arg(long)]
        base_url: Option<String>,
        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },
    /// List declared resources and their relationships
    Resources {
        /// Resource schema (TOML)
        #[arg(short, long)]
        schema: PathBuf,
        /// Output format (table, json)
        #[arg(long, value_enum, default_value_t = ListFormat::Table)]
        format: ListFormat,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ListFormat {
    Table,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum InputFormat {
    Json,
    Ndjson,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Commands::Pack {
            input,
            schema,
            resource,
            output,
            ndjson,
            json,
            pretty,
            base_url,
            verbose_links,
            url_templates,
            progress,
        } => {
            let overrides = OptionOverrides {
                base_url,
                verbose: verbose_links,
                url_templates,
            };
            handle_pack(
                &input,
                &schema,
                &resource,
                output.as_deref(),
                ndjson,
                json,
                pretty,
                &overrides,
                progress,
            )?;
        }
        Commands::Templates {
            schema,
            resource,
            base_url,
            pretty,
        } => {
            let overrides = OptionOverrides {
                base_url,
                ..OptionOverrides::default()
            };
            let schema = Schema::load(&schema, &overrides)?;
            let stdout = std::io::stdout();
            write_templates(schema.wrapper(&resource)?, pretty, stdout.lock())?;
        }
        Commands::Resources { schema, format } => {
            let schema = Schema::load(&schema, &OptionOverrides::default())?;
            let stdout = std::io::stdout();
            write_resources(&schema, format, stdout.lock())?;
        }
    }

    Ok(())
}

fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // A subscriber may already be installed (tests); keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[allow(clippy::too_many_arguments)]
fn handle_pack(
    input: &Path,
    schema_path: &Path,
    resource: &str,
    output: Option<&Path>,
    force_ndjson: bool,
    force_json: bool,
    pretty: bool,
    overrides: &OptionOverrides,
    show_progress: bool,
) -> Result<(), Box<dyn Error>> {
    let start = Instant::now();
    let schema = Schema::load(schema_path, overrides)?;
    let wrapper = schema.wrapper(resource)?;
    let format = resolve_input_format(input, force_ndjson, force_json)?;

    let mut progress_bar = show_progress.then(|| create_spinner("Packing records"));
    let data = read_input(input, format)?;
    let record_count = data.as_array().map_or(1, Vec::len);
    if let Some(pb) = &progress_bar {
        pb.set_position(record_count as u64);
    }

    let envelope = wrapper.pack(&data)?;
    let linked_count = envelope.linked().map_or(0, |linked| linked.record_count());
    tracing::info!(
        resource,
        records = record_count,
        linked = linked_count,
        "packed input"
    );

    match output {
        Some(path) => {
            let file = File::create(path).map_err(JsonApiError::Io)?;
            write_json(&envelope, pretty, BufWriter::new(file))?
        }
        None => write_json(&envelope, pretty, std::io::stdout().lock())?,
    }

    if let Some(pb) = progress_bar.take() {
        pb.finish_with_message(format!(
            "Packed {} {} records ({} linked) in {:.2?}",
            record_count,
            resource,
            linked_count,
            start.elapsed()
        ));
    }
    Ok(())
}

fn resolve_input_format(
    path: &Path,
    force_ndjson: bool,
    force_json: bool,
) -> Result<InputFormat, Box<dyn Error>> {
    if force_ndjson && force_json {
        return Err("--ndjson and --json are mutually exclusive".into());
    }

    if force_ndjson {
        return Ok(InputFormat::Ndjson);
    }
    if force_json {
        return Ok(InputFormat::Json);
    }

    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_ascii_lowercase())
    {
        Some(ext) if ext == "ndjson" || ext == "jsonl" => Ok(InputFormat::Ndjson),
        _ => Ok(InputFormat::Json),
    }
}

fn read_input(path: &Path, format: InputFormat) -> jsonapi_format::Result<Value> {
    let reader: Box<dyn Read> = if path == Path::new("-") {
        Box::new(std::io::stdin().lock())
    } else {
        Box::new(File::open(path)?)
    };
    let reader = BufReader::new(reader);

    match format {
        InputFormat::Json => Ok(serde_json::from_reader(reader)?),
        InputFormat::Ndjson => {
            let mut records = Vec::new();
            for (idx, line) in reader.lines().enumerate() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                let record: Value =
                    serde_json::from_str(&line).map_err(|source| JsonApiError::InvalidLine {
                        line: idx + 1,
                        source,
                    })?;
                records.push(record);
            }
            Ok(Value::Array(records))
        }
    }
}

fn write_json<T: serde::Serialize, W: Write>(
    value: &T,
    pretty: bool,
    mut writer: W,
) -> jsonapi_format::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut writer, value)?;
    } else {
        serde_json::to_writer(&mut writer, value)?;
    }
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

fn write_templates<W: Write>(
    wrapper: &Wrapper,
    pretty: bool,
    writer: W,
) -> jsonapi_format::Result<()> {
    let templates = wrapper.link_templates().unwrap_or_default();
    write_json(&templates, pretty, writer)
}

fn write_resources<W: Write>(
    schema: &Schema,
    format: ListFormat,
    mut writer: W,
) -> jsonapi_format::Result<()> {
    match format {
        ListFormat::Table => {
            for wrapper in schema.wrappers() {
                writeln!(writer, "{}", wrapper.type_name())?;
                for reference in wrapper.references() {
                    writeln!(
                        writer,
                        "  {} -> {} ({})",
                        reference.name(),
                        reference.target(),
                        reference.cardinality()
                    )?;
                }
            }
            writer.flush()?;
            Ok(())
        }
        ListFormat::Json => {
            let resources: Vec<Value> = schema
                .wrappers()
                .into_iter()
                .map(|wrapper| {
                    let references: Vec<Value> = wrapper
                        .references()
                        .iter()
                        .map(|reference| {
                            json!({
                                "ref": reference.name(),
                                "resource": reference.target().as_str(),
                                "cardinality": reference.cardinality().to_string(),
                            })
                        })
                        .collect();
                    json!({"type": wrapper.type_name(), "references": references})
                })
                .collect();
            write_json(&json!({ "resources": resources }), false, writer)
        }
    }
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let template = "{spinner:.green} [{elapsed_precise}] {pos} {msg}";
    if let Ok(style) = ProgressStyle::default_spinner().template(template) {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SCHEMA: &str = r#"
[options]
baseUrl = "/"

[resources.posts]
references = [
  { ref = "author", resource = "authors" },
  { ref = "comments", resource = "comments", many = true },
]

[resources.authors]
[resources.comments]
"#;

    struct TempPaths {
        dir: PathBuf,
        schema: PathBuf,
        output: PathBuf,
    }

    fn temp_paths(name: &str) -> TempPaths {
        let dir = std::env::temp_dir().join(format!("jsonapi_cli_{}_{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let schema = dir.join("schema.toml");
        fs::write(&schema, SCHEMA).unwrap();
        TempPaths {
            schema,
            output: dir.join("packed.json"),
            dir,
        }
    }

    #[test]
    fn pack_json_file() {
        let paths = temp_paths("pack_json");
        let input = paths.dir.join("posts.json");
        fs::write(
            &input,
            r#"{"id":1,"title":"T","author":{"id":"a1","name":"N"}}"#,
        )
        .unwrap();

        handle_pack(
            &input,
            &paths.schema,
            "posts",
            Some(&paths.output),
            false,
            false,
            false,
            &OptionOverrides::default(),
            false,
        )
        .unwrap();

        let text = fs::read_to_string(&paths.output).unwrap();
        let packed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            packed,
            json!({
                "posts": [{"id": 1, "title": "T", "links": {"author": "a1"}}],
                "linked": {"authors": [{"id": "a1", "name": "N"}]}
            })
        );
    }

    #[test]
    fn pack_ndjson_file_with_overrides() {
        let paths = temp_paths("pack_ndjson");
        let input = paths.dir.join("posts.ndjson");
        fs::write(
            &input,
            "{\"id\":1,\"comments\":[{\"id\":7}]}\n\n{\"id\":2}\n",
        )
        .unwrap();

        let overrides = OptionOverrides {
            base_url: Some("/api/".to_string()),
            verbose: true,
            url_templates: true,
        };
        handle_pack(
            &input,
            &paths.schema,
            "posts",
            Some(&paths.output),
            false,
            false,
            true,
            &overrides,
            false,
        )
        .unwrap();

        let text = fs::read_to_string(&paths.output).unwrap();
        let packed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(packed["posts"].as_array().unwrap().len(), 2);
        assert_eq!(
            packed["posts"][0]["links"]["comments"],
            json!([{"id": 7, "type": "comments", "href": "/api/comments/7"}])
        );
        assert_eq!(
            packed["links"]["posts.author"]["href"],
            json!("/api/authors/{posts.author}")
        );
    }

    #[test]
    fn pack_reports_shape_mismatch() {
        let paths = temp_paths("pack_mismatch");
        let input = paths.dir.join("bad.json");
        fs::write(&input, r#"{"id":1,"comments":{"id":7}}"#).unwrap();

        let err = handle_pack(
            &input,
            &paths.schema,
            "posts",
            Some(&paths.output),
            false,
            false,
            false,
            &OptionOverrides::default(),
            false,
        )
        .unwrap_err();
        assert!(err.to_string().contains("`comments` is to-many reference"));
    }

    #[test]
    fn read_input_reports_bad_ndjson_line() {
        let paths = temp_paths("bad_ndjson");
        let input = paths.dir.join("broken.ndjson");
        fs::write(&input, "{\"id\":1}\n{\"id\":\n").unwrap();

        let err = read_input(&input, InputFormat::Ndjson).unwrap_err();
        assert!(matches!(err, JsonApiError::InvalidLine { line: 2, .. }));
        assert!(err.to_string().starts_with("Invalid JSON on line 2:"));
    }

    #[test]
    fn read_input_errors_are_typed() {
        let paths = temp_paths("typed_errors");
        let missing = paths.dir.join("missing.json");
        assert!(matches!(
            read_input(&missing, InputFormat::Json),
            Err(JsonApiError::Io(_))
        ));

        let broken = paths.dir.join("broken.json");
        fs::write(&broken, "{\"id\":").unwrap();
        assert!(matches!(
            read_input(&broken, InputFormat::Json),
            Err(JsonApiError::Json(_))
        ));
    }

    #[test]
    fn resolve_input_format_by_extension_and_flags() {
        assert_eq!(
            resolve_input_format(Path::new("a.ndjson"), false, false).unwrap(),
            InputFormat::Ndjson
        );
        assert_eq!(
            resolve_input_format(Path::new("a.JSONL"), false, false).unwrap(),
            InputFormat::Ndjson
        );
        assert_eq!(
            resolve_input_format(Path::new("a.json"), false, false).unwrap(),
            InputFormat::Json
        );
        assert_eq!(
            resolve_input_format(Path::new("a.json"), true, false).unwrap(),
            InputFormat::Ndjson
        );
        assert!(resolve_input_format(Path::new("a"), true, true).is_err());
    }

    #[test]
    fn templates_output() {
        let schema = Schema::from_toml_str(SCHEMA, &OptionOverrides::default()).unwrap();
        let mut buf = Vec::new();
        write_templates(schema.wrapper("posts").unwrap(), false, &mut buf).unwrap();
        let value: Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(
            value,
            json!({
                "posts.author": {"type": "authors", "href": "/authors/{posts.author}"},
                "posts.comments": {"type": "comments", "href": "/comments/{posts.comments}"}
            })
        );

        let mut buf = Vec::new();
        write_templates(schema.wrapper("authors").unwrap(), false, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "{}\n");
    }

    #[test]
    fn resources_table_lists_references() {
        let schema = Schema::from_toml_str(SCHEMA, &OptionOverrides::default()).unwrap();
        let mut buf = Vec::new();
        write_resources(&schema, ListFormat::Table, &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "authors\ncomments\nposts\n  \
             author -> authors (to-one)\n  \
             comments -> comments (to-many)\n"
        );
    }
}
