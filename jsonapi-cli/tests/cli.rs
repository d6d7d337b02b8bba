use predicates::prelude::*;
use serde_json::{json, Value};
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const BLOG_SCHEMA: &str = r#"
[options]
baseUrl = "/api/"

[resources.posts]
references = [
  { ref = "author", resource = "authors" },
  { ref = "comments", resource = "comments", many = true },
]

[resources.authors]
[resources.comments]
"#;

struct Workspace {
    _dir: TempDir,
    schema: PathBuf,
    root: PathBuf,
}

fn workspace() -> Result<Workspace, Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let schema = dir.path().join("blog.toml");
    fs::write(&schema, BLOG_SCHEMA)?;
    Ok(Workspace {
        root: dir.path().to_path_buf(),
        schema,
        _dir: dir,
    })
}

fn jsonapi() -> Result<assert_cmd::Command, Box<dyn Error>> {
    Ok(assert_cmd::Command::cargo_bin("jsonapi")?)
}

#[test]
fn pack_json_to_stdout() -> Result<(), Box<dyn Error>> {
    let ws = workspace()?;
    let input = ws.root.join("posts.json");
    fs::write(
        &input,
        json!([{
            "id": 1,
            "title": "T",
            "author": {"id": "a1", "name": "N"},
            "comments": [{"id": 7, "text": "hi"}]
        }])
        .to_string(),
    )?;

    let output = jsonapi()?
        .args(["pack", input.to_str().unwrap(), "-s"])
        .arg(&ws.schema)
        .args(["-r", "posts"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let packed: Value = serde_json::from_slice(&output)?;
    assert_eq!(
        packed,
        json!({
            "posts": [{"id": 1, "title": "T", "links": {"author": "a1", "comments": [7]}}],
            "linked": {
                "authors": [{"id": "a1", "name": "N"}],
                "comments": [{"id": 7, "text": "hi"}]
            }
        })
    );
    Ok(())
}

#[test]
fn pack_ndjson_to_file_with_link_flags() -> Result<(), Box<dyn Error>> {
    let ws = workspace()?;
    let input = ws.root.join("posts.ndjson");
    let output = ws.root.join("packed.json");
    fs::write(
        &input,
        "{\"id\":1,\"author\":{\"id\":\"a1\"}}\n{\"id\":2,\"author\":{\"id\":\"a2\"}}\n",
    )?;

    jsonapi()?
        .arg("pack")
        .arg(&input)
        .arg("--schema")
        .arg(&ws.schema)
        .args(["--resource", "posts", "--verbose-links", "--url-templates", "--pretty"])
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let packed: Value = serde_json::from_str(&fs::read_to_string(&output)?)?;
    assert_eq!(packed["posts"].as_array().map(Vec::len), Some(2));
    assert_eq!(
        packed["posts"][1]["links"]["author"],
        json!({"id": "a2", "type": "authors", "href": "/api/authors/a2"})
    );
    assert_eq!(
        packed["links"]["posts.comments"],
        json!({"type": "comments", "href": "/api/comments/{posts.comments}"})
    );
    Ok(())
}

#[test]
fn pack_reads_stdin() -> Result<(), Box<dyn Error>> {
    let ws = workspace()?;
    let output = jsonapi()?
        .args(["pack", "-", "-s"])
        .arg(&ws.schema)
        .args(["-r", "authors"])
        .write_stdin(r#"{"id":"a1","name":"N"}"#)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let packed: Value = serde_json::from_slice(&output)?;
    assert_eq!(packed, json!({"authors": [{"id": "a1", "name": "N"}]}));
    Ok(())
}

#[test]
fn pack_shape_mismatch_fails() -> Result<(), Box<dyn Error>> {
    let ws = workspace()?;
    let input = ws.root.join("bad.json");
    fs::write(&input, r#"{"id":1,"comments":{"id":7}}"#)?;

    jsonapi()?
        .arg("pack")
        .arg(&input)
        .arg("-s")
        .arg(&ws.schema)
        .args(["-r", "posts"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "`comments` is to-many reference, but data is to-one.",
        ));
    Ok(())
}

#[test]
fn pack_unknown_resource_fails() -> Result<(), Box<dyn Error>> {
    let ws = workspace()?;
    let input = ws.root.join("tags.json");
    fs::write(&input, r#"{"id":1}"#)?;

    jsonapi()?
        .arg("pack")
        .arg(&input)
        .arg("-s")
        .arg(&ws.schema)
        .args(["-r", "tags"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown resource 'tags'"));
    Ok(())
}

#[test]
fn ndjson_and_json_flags_conflict() -> Result<(), Box<dyn Error>> {
    let ws = workspace()?;
    jsonapi()?
        .args(["pack", "in.json", "-s"])
        .arg(&ws.schema)
        .args(["-r", "posts", "--ndjson", "--json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
    Ok(())
}

#[test]
fn templates_prints_relationship_templates() -> Result<(), Box<dyn Error>> {
    let ws = workspace()?;
    let output = jsonapi()?
        .arg("templates")
        .arg("-s")
        .arg(&ws.schema)
        .args(["-r", "posts", "--base-url", "https://example.com/"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let templates: Value = serde_json::from_slice(&output)?;
    assert_eq!(
        templates,
        json!({
            "posts.author": {
                "type": "authors",
                "href": "https://example.com/authors/{posts.author}"
            },
            "posts.comments": {
                "type": "comments",
                "href": "https://example.com/comments/{posts.comments}"
            }
        })
    );
    Ok(())
}

#[test]
fn resources_table_and_json() -> Result<(), Box<dyn Error>> {
    let ws = workspace()?;
    jsonapi()?
        .arg("resources")
        .arg("-s")
        .arg(&ws.schema)
        .assert()
        .success()
        .stdout(predicate::str::contains("posts\n  author -> authors (to-one)"))
        .stdout(predicate::str::contains("comments -> comments (to-many)"));

    let output = jsonapi()?
        .arg("resources")
        .arg("-s")
        .arg(&ws.schema)
        .args(["--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let listing: Value = serde_json::from_slice(&output)?;
    let names: Vec<&str> = listing["resources"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|r| r["type"].as_str())
        .collect();
    assert_eq!(names, vec!["authors", "comments", "posts"]);
    Ok(())
}

#[test]
fn missing_schema_reports_path() -> Result<(), Box<dyn Error>> {
    let ws = workspace()?;
    let missing = ws.root.join("nope.toml");
    jsonapi()?
        .arg("resources")
        .arg("-s")
        .arg(&missing)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read schema"));
    Ok(())
}
