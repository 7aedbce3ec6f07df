//! Configuration file editor command.
//!
//! Opens the barwave configuration file in the user's preferred editor.

use std::process::Command;

use crate::config::BarwaveConfig;

/// Opens the barwave configuration file in the user's preferred editor.
///
/// The file is written with defaults first if it does not exist. Editors are tried in
/// this order: $EDITOR, nano, vi.
///
/// # Errors
/// - If the config file cannot be located or created
/// - If no editor can be found or executed
/// - If the edited file no longer parses
pub fn handle_config() -> anyhow::Result<()> {
    BarwaveConfig::load()?;
    let config_path = crate::config::get_config_path()
        .map_err(|e| anyhow::anyhow!("Failed to locate config file: {e}"))?;

    tracing::info!("Opening config file: {}", config_path.display());

    let editor = find_editor()?;
    tracing::debug!("Using editor: {}", editor);

    let status = Command::new(&editor)
        .arg(&config_path)
        .status()
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to open editor '{editor}': {e}. Make sure the editor is installed and accessible."
            )
        })?;

    if !status.success() {
        return Err(anyhow::anyhow!(
            "Editor exited with error code: {}",
            status.code().unwrap_or(-1)
        ));
    }

    BarwaveConfig::load_from(&config_path)
        .map_err(|e| anyhow::anyhow!("Config file is no longer valid: {e}"))?;

    tracing::info!("Config file edited successfully");
    Ok(())
}

/// Finds the best available editor to use.
fn find_editor() -> anyhow::Result<String> {
    if let Ok(editor) = std::env::var("EDITOR") {
        if !editor.is_empty() {
            return Ok(editor);
        }
    }

    for editor in &["nano", "vi"] {
        if is_editor_available(editor) {
            return Ok(editor.to_string());
        }
    }

    Err(anyhow::anyhow!(
        "No editor found. Please set the $EDITOR environment variable."
    ))
}

/// Checks if an editor is available in the system PATH.
fn is_editor_available(editor: &str) -> bool {
    Command::new("which")
        .arg(editor)
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}
