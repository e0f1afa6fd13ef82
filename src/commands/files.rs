//! Synchronous file and clipboard commands.

use anyhow::Context;
use imageviewer_core::paths::resolve_local_path;
use imageviewer_core::services::{clipboard, file_size};

use crate::cli::FileArgs;

pub fn size(args: &FileArgs) -> anyhow::Result<()> {
    println!("{}", file_size(&args.file));
    Ok(())
}

pub fn copy_image(args: &FileArgs) -> anyhow::Result<()> {
    let path = resolve_local_path(&args.file);
    clipboard::copy_image_file(&path)
        .with_context(|| format!("copying {} to the clipboard", path.display()))?;
    println!("copied image {}", path.display());
    Ok(())
}

pub fn copy_path(args: &FileArgs) -> anyhow::Result<()> {
    let path = resolve_local_path(&args.file);
    let text = path.to_string_lossy();
    clipboard::copy_text(&text).context("copying path to the clipboard")?;
    println!("copied path {}", text);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_copy_image_missing_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let args = FileArgs {
            file: tmp.path().join("missing.png").to_string_lossy().into_owned(),
        };
        assert!(copy_image(&args).is_err());
    }
}
