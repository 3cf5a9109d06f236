use crate::config::OutputFormat;
use crate::errors::Result;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Serializer as JsonSerializer;
use serde_json::Value;
use std::io::Write;

pub const YAML_DIVIDER: &str = "---";

/*
 * JSON rendered with a four space indent, the layout the catalog
 * responses are shown with.
 */
pub fn to_json_indented<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = JsonSerializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;

    // serde_json only ever writes valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/*
 * Re-indents a raw JSON document, keeping the key order of the source.
 */
pub fn indent_json(raw: &str) -> Result<String> {
    let value: Value = serde_json::from_str(raw)?;
    to_json_indented(&value)
}

pub fn print_yaml<W: Write, T: Serialize>(out: &mut W, obj: &T, divider: bool) -> Result<()> {
    let yaml = serde_yaml::to_string(obj)?;
    out.write_all(yaml.as_bytes())?;
    if divider {
	writeln!(out, "{}", YAML_DIVIDER)?;
    }
    Ok(())
}

pub fn print_json<W: Write, T: Serialize>(out: &mut W, obj: &T) -> Result<()> {
    let json = to_json_indented(obj)?;
    writeln!(out, "{}", json)?;
    Ok(())
}

/*
 * Writes an entity in the requested format. The YAML divider only makes
 * sense between documents, so the caller says whether more will follow.
 */
pub fn print_entity<W: Write, T: Serialize>(out: &mut W, obj: &T, format: OutputFormat, divider: bool) -> Result<()> {
    match format {
	OutputFormat::Yaml => print_yaml(out, obj, divider),
	OutputFormat::Json => print_json(out, obj),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indent_json_uses_four_spaces() {
	let out = indent_json(r#"{"TestGet": "JSON response"}"#).unwrap();
	assert_eq!(out, "{\n    \"TestGet\": \"JSON response\"\n}");
    }

    #[test]
    fn indent_json_keeps_key_order() {
	let out = indent_json(r#"{"b": 1, "a": 2}"#).unwrap();
	assert!(out.find("\"b\"").unwrap() < out.find("\"a\"").unwrap());
    }

    #[test]
    fn indent_json_rejects_garbage() {
	assert!(indent_json("TestGet: text response").is_err());
    }

    #[test]
    fn yaml_with_and_without_divider() {
	let obj = serde_json::json!({"kind": "API"});

	let mut out = Vec::new();
	print_yaml(&mut out, &obj, true).unwrap();
	assert_eq!(String::from_utf8(out).unwrap(), "kind: API\n---\n");

	let mut out = Vec::new();
	print_entity(&mut out, &obj, OutputFormat::Yaml, false).unwrap();
	assert_eq!(String::from_utf8(out).unwrap(), "kind: API\n");
    }

    #[test]
    fn json_entity_output() {
	let mut out = Vec::new();
	print_entity(&mut out, &serde_json::json!({"kind": "API"}), OutputFormat::Json, true).unwrap();
	assert_eq!(String::from_utf8(out).unwrap(), "{\n    \"kind\": \"API\"\n}\n");
    }
}
