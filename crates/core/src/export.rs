//! JSON export and import of a [`Configuration`].
//!
//! The export lists every field, including unset ones, under the camelCase
//! names of the data model. Import accepts anything structurally valid;
//! business rules are left to [`crate::validate`].

use crate::config::Configuration;
use crate::error::{Error, ImportError, Result};
use serde_json::error::Category;

/// Serializes `config` as pretty-printed JSON.
pub fn to_text(config: &Configuration) -> Result<String> {
    serde_json::to_string_pretty(config).map_err(|e| Error::Export(e.to_string()))
}

/// Parses text produced by [`to_text`].
///
/// Missing keys take their default value and unknown keys are ignored. An
/// empty box id is restored to the default.
pub fn from_text(text: &str) -> std::result::Result<Configuration, ImportError> {
    if text.trim().is_empty() {
        return Err(ImportError::Empty);
    }

    let mut config: Configuration = serde_json::from_str(text).map_err(import_error)?;
    config.normalize_box_id();
    Ok(config)
}

fn import_error(err: serde_json::Error) -> ImportError {
    let (line, column, message) = (err.line(), err.column(), err.to_string());
    match err.classify() {
        Category::Data => ImportError::Shape {
            line,
            column,
            message,
        },
        Category::Syntax | Category::Eof | Category::Io => ImportError::Syntax {
            line,
            column,
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DirectoryRule, EnvVar};
    use crate::preset::Preset;

    fn populated() -> Configuration {
        Configuration {
            box_id: "12".to_string(),
            meta_file: "meta.txt".to_string(),
            stdin: "in.txt".to_string(),
            stdout: "out.txt".to_string(),
            stderr_path: "err.txt".to_string(),
            chdir: "/box".to_string(),
            verbose: true,
            wait: true,
            memory: "262144".to_string(),
            quota_blocks: "10".to_string(),
            env_vars: vec![EnvVar::new("A", "1"), EnvVar::new("", "draft")],
            directories: vec![DirectoryRule::new("/box/data", "/home/u/data", "rw")],
            cg_mem: "1024".to_string(),
            as_uid: "1000".to_string(),
            program: "./solution".to_string(),
            arguments: "--fast".to_string(),
            ..Configuration::default()
        }
    }

    #[test]
    fn round_trip_default() {
        let config = Configuration::default();
        assert_eq!(from_text(&to_text(&config).unwrap()).unwrap(), config);
    }

    #[test]
    fn round_trip_populated() {
        let config = populated();
        assert_eq!(from_text(&to_text(&config).unwrap()).unwrap(), config);
    }

    #[test]
    fn round_trip_presets() {
        for preset in Preset::ALL {
            let config = preset.apply();
            assert_eq!(from_text(&to_text(&config).unwrap()).unwrap(), config);
        }
    }

    #[test]
    fn export_lists_every_field() {
        let json: serde_json::Value =
            serde_json::from_str(&to_text(&Configuration::default()).unwrap()).unwrap();
        let object = json.as_object().unwrap();
        for key in [
            "boxId",
            "metaFile",
            "stdin",
            "stdout",
            "stderrPath",
            "stderrToStdout",
            "chdir",
            "verbose",
            "silent",
            "wait",
            "memory",
            "time",
            "wallTime",
            "extraTime",
            "stack",
            "openFiles",
            "fileSize",
            "quotaBlocks",
            "quotaInodes",
            "coreSize",
            "processes",
            "envVars",
            "fullEnv",
            "directories",
            "noDefaultDirs",
            "enableCg",
            "cgMem",
            "shareNet",
            "inheritFds",
            "specialFiles",
            "ttyHack",
            "asUid",
            "asGid",
            "program",
            "arguments",
        ] {
            assert!(object.contains_key(key), "missing {key}");
        }
        assert_eq!(object.len(), 35);
    }

    #[test]
    fn export_preserves_list_order() {
        let config = Configuration::default()
            .with_env_var("Z", "1")
            .with_env_var("A", "2");
        let json: serde_json::Value = serde_json::from_str(&to_text(&config).unwrap()).unwrap();
        assert_eq!(json["envVars"][0]["key"], "Z");
        assert_eq!(json["envVars"][1]["key"], "A");
    }

    #[test]
    fn missing_keys_take_defaults() {
        let config = from_text(r#"{"memory": "1024"}"#).unwrap();
        assert_eq!(config.memory, "1024");
        assert_eq!(config.box_id, "0");
        assert!(config.env_vars.is_empty());
    }

    #[test]
    fn empty_box_id_is_restored() {
        let config = from_text(r#"{"boxId": ""}"#).unwrap();
        assert_eq!(config.box_id, "0");
    }

    #[test]
    fn accepts_configurations_the_validator_flags() {
        let config = from_text(r#"{"stderrPath": "e.txt", "stderrToStdout": true}"#).unwrap();
        assert_eq!(config.stderr_path, "e.txt");
        assert!(config.stderr_to_stdout);
    }

    #[test]
    fn empty_input() {
        assert_eq!(from_text("  \n").unwrap_err(), ImportError::Empty);
    }

    #[test]
    fn malformed_json_is_syntax_error() {
        assert!(matches!(
            from_text("{\"boxId\": ").unwrap_err(),
            ImportError::Syntax { .. }
        ));
        assert!(matches!(
            from_text("not json").unwrap_err(),
            ImportError::Syntax { .. }
        ));
    }

    #[test]
    fn wrong_types_are_shape_errors() {
        assert!(matches!(
            from_text(r#"{"verbose": "yes"}"#).unwrap_err(),
            ImportError::Shape { .. }
        ));
        assert!(matches!(
            from_text("[1, 2, 3]").unwrap_err(),
            ImportError::Shape { .. }
        ));
    }
}
