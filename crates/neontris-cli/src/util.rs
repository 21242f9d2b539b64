use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::Context;

/// Writes `value` as pretty-printed JSON to `output_path`, or to stdout when it is `None`.
pub fn save_json<T>(value: &T, output_path: Option<&Path>) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    match output_path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            write_json(&mut BufWriter::new(file), value)
                .with_context(|| format!("Failed to write JSON to {}", path.display()))
        }
        None => {
            write_json(&mut io::stdout().lock(), value).context("Failed to write JSON to stdout")
        }
    }
}

fn write_json<W, T>(writer: &mut W, value: &T) -> anyhow::Result<()>
where
    W: Write + ?Sized,
    T: serde::Serialize,
{
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Reads a TOML file into `T`, naming the file in every error.
pub fn read_toml_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} file: {}", file_kind, path.display()))?;
    let value = toml::from_str(&text)
        .with_context(|| format!("Failed to parse {} file: {}", file_kind, path.display()))?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_json_ends_with_newline() {
        let mut buf = Vec::new();
        write_json(&mut buf, &serde_json::json!({ "games": 2 })).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.ends_with("}\n"));
        assert_eq!(serde_json::from_str::<serde_json::Value>(&text).unwrap()["games"], 2);
    }

    #[test]
    fn test_save_json_and_read_toml_name_the_file() {
        let dir = std::env::temp_dir().join(format!("neontris-util-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let json = dir.join("report.json");
        save_json(&[1, 2, 3], Some(json.as_path())).unwrap();
        let saved: Vec<u32> = serde_json::from_str(&std::fs::read_to_string(&json).unwrap()).unwrap();
        assert_eq!(saved, [1, 2, 3]);

        let missing = dir.join("missing").join("report.json");
        let err = save_json(&[1], Some(missing.as_path())).unwrap_err();
        assert!(err.to_string().contains("report.json"));

        let toml = dir.join("broken.toml");
        std::fs::write(&toml, "value = ").unwrap();
        let err = read_toml_file::<toml::Table, _>("config", &toml).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
