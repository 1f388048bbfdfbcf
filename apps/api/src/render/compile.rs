//! Typst CLI invocation in a temporary workspace.

use tokio::process::Command;

use crate::errors::AppError;

/// Compiles Typst source to PDF bytes. The source is written to a temp
/// directory, compiled there, and the directory is dropped afterwards.
pub async fn compile_typst(source: &str) -> Result<Vec<u8>, AppError> {
    let workspace = tempfile::tempdir()
        .map_err(|e| AppError::Render(format!("Failed to create render workspace: {e}")))?;
    let input = workspace.path().join("main.typ");
    let output = workspace.path().join("output.pdf");

    tokio::fs::write(&input, source)
        .await
        .map_err(|e| AppError::Render(format!("Failed to write Typst source: {e}")))?;

    let result = Command::new("typst")
        .arg("compile")
        .arg(&input)
        .arg(&output)
        .output()
        .await
        .map_err(|e| AppError::Render(format!("Failed to run typst: {e}")))?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        return Err(AppError::Render(format!(
            "Typst compilation failed: {stderr}"
        )));
    }

    tokio::fs::read(&output)
        .await
        .map_err(|e| AppError::Render(format!("Failed to read generated PDF: {e}")))
}
