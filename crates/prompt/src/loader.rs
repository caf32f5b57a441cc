//! Prompt pack loader.
//!
//! Packs live in `.rrr/prompts/<id>.yml`. The `default` pack falls back to
//! the built-in templates when no file overrides it.

use crate::builder::render_template;
use crate::types::PromptPack;
use rrr_core::{AppError, AppResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Id of the built-in pack.
pub const DEFAULT_PACK_ID: &str = "default";

fn prompts_dir(workspace_path: &Path) -> PathBuf {
    workspace_path.join(".rrr/prompts")
}

/// Load a prompt pack by id from the workspace.
///
/// # Example
/// ```no_run
/// use rrr_prompt::load_prompt_pack;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pack = load_prompt_pack(Path::new("."), "default")?;
/// println!("Loaded prompt pack: {}", pack.title);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt_pack(workspace_path: &Path, pack_id: &str) -> AppResult<PromptPack> {
    let pack_file = prompts_dir(workspace_path).join(format!("{}.yml", pack_id));

    tracing::debug!("Loading prompt pack from: {:?}", pack_file);

    if !pack_file.exists() {
        if pack_id == DEFAULT_PACK_ID {
            tracing::debug!("Using built-in prompt pack");
            return Ok(PromptPack::default());
        }
        return Err(AppError::Prompt(format!(
            "Prompt pack not found: {:?}",
            pack_file
        )));
    }

    let contents = std::fs::read_to_string(&pack_file).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to read prompt pack {:?}: {}",
            pack_file, e
        ))
    })?;

    let pack: PromptPack = serde_yaml::from_str(&contents).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to parse prompt pack YAML {:?}: {}",
            pack_file, e
        ))
    })?;

    validate_pack(&pack)?;

    tracing::info!("Loaded prompt pack: {} ({})", pack.id, pack.title);

    Ok(pack)
}

/// List the prompt pack ids available in the workspace.
pub fn list_prompt_packs(workspace_path: &Path) -> AppResult<Vec<String>> {
    let dir = prompts_dir(workspace_path);

    let mut pack_ids = vec![DEFAULT_PACK_ID.to_string()];
    if !dir.exists() {
        return Ok(pack_ids);
    }

    for entry in walkdir::WalkDir::new(&dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("yml") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if stem != DEFAULT_PACK_ID {
                    pack_ids.push(stem.to_string());
                }
            }
        }
    }

    pack_ids[1..].sort();
    Ok(pack_ids)
}

/// Validate a prompt pack.
fn validate_pack(pack: &PromptPack) -> AppResult<()> {
    if pack.id.is_empty() {
        return Err(AppError::Prompt("Prompt pack id cannot be empty".to_string()));
    }

    if pack.title.is_empty() {
        return Err(AppError::Prompt(
            "Prompt pack title cannot be empty".to_string(),
        ));
    }

    if !pack.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            pack.api_version
        )));
    }

    if pack.system_prompt.trim().is_empty() {
        return Err(AppError::Prompt(
            "Prompt pack systemPrompt cannot be empty".to_string(),
        ));
    }

    if pack.query_prompt.trim().is_empty() {
        return Err(AppError::Prompt(
            "Prompt pack queryPrompt cannot be empty".to_string(),
        ));
    }

    // Both templates must at least parse
    render_template(&pack.system_prompt, &HashMap::new())?;
    render_template(&pack.query_prompt, &HashMap::new())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_pack(dir: &Path, id: &str, content: &str) -> PathBuf {
        let prompts_dir = dir.join(".rrr/prompts");
        fs::create_dir_all(&prompts_dir).unwrap();

        let file_path = prompts_dir.join(format!("{}.yml", id));
        fs::write(&file_path, content).unwrap();
        file_path
    }

    fn valid_pack(id: &str) -> String {
        format!(
            r#"
id: {}
title: "Test Pack"
apiVersion: "1.0"
systemPrompt: "System {{{{sources}}}} {{{{chat_history}}}}"
followUpQuestionsPrompt: "Ask more"
queryPrompt: "Rewrite {{{{question}}}}"
"#,
            id
        )
    }

    #[test]
    fn test_default_pack_without_file() {
        let temp_dir = TempDir::new().unwrap();
        let pack = load_prompt_pack(temp_dir.path(), "default").unwrap();
        assert_eq!(pack, PromptPack::default());
    }

    #[test]
    fn test_load_valid_pack() {
        let temp_dir = TempDir::new().unwrap();
        write_pack(temp_dir.path(), "festival", &valid_pack("festival"));

        let pack = load_prompt_pack(temp_dir.path(), "festival").unwrap();
        assert_eq!(pack.id, "festival");
        assert_eq!(pack.system_prompt, "System {{sources}} {{chat_history}}");
        assert_eq!(pack.query_prompt, "Rewrite {{question}}");
    }

    #[test]
    fn test_file_overrides_default_pack() {
        let temp_dir = TempDir::new().unwrap();
        write_pack(temp_dir.path(), "default", &valid_pack("default"));

        let pack = load_prompt_pack(temp_dir.path(), "default").unwrap();
        assert_eq!(pack.title, "Test Pack");
    }

    #[test]
    fn test_load_nonexistent_pack() {
        let temp_dir = TempDir::new().unwrap();
        let result = load_prompt_pack(temp_dir.path(), "nonexistent");
        assert!(matches!(result, Err(AppError::Prompt(_))));
    }

    #[test]
    fn test_load_invalid_yaml() {
        let temp_dir = TempDir::new().unwrap();
        write_pack(temp_dir.path(), "invalid", "invalid: yaml: content:");

        assert!(load_prompt_pack(temp_dir.path(), "invalid").is_err());
    }

    #[test]
    fn test_load_pack_with_broken_template() {
        let temp_dir = TempDir::new().unwrap();
        let content = valid_pack("broken").replace("System", "System {{#if}}");
        write_pack(temp_dir.path(), "broken", &content);

        assert!(load_prompt_pack(temp_dir.path(), "broken").is_err());
    }

    #[test]
    fn test_list_prompt_packs() {
        let temp_dir = TempDir::new().unwrap();
        write_pack(temp_dir.path(), "zeta", &valid_pack("zeta"));
        write_pack(temp_dir.path(), "alpha", &valid_pack("alpha"));
        write_pack(temp_dir.path(), "default", &valid_pack("default"));

        let packs = list_prompt_packs(temp_dir.path()).unwrap();
        assert_eq!(packs, vec!["default", "alpha", "zeta"]);
    }

    #[test]
    fn test_list_without_prompts_dir() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(list_prompt_packs(temp_dir.path()).unwrap(), vec!["default"]);
    }
}
