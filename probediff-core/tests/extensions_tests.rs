// probediff-core/tests/extensions_tests.rs

use probediff_core::{CoreError, ExtensionClass, ProbeConfig, ProbeConfigBuilder};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_bundled_lists_cover_common_formats() {
    let av = ExtensionClass::AudioVideo.bundled_extensions();
    for ext in [".mkv", ".mp4", ".mov", ".mp3", ".flac", ".webm"] {
        assert!(av.contains(ext), "av list is missing {ext}");
    }
    assert!(!av.contains(".jpg"));

    let images = ExtensionClass::Images.bundled_extensions();
    for ext in [".jpg", ".png", ".webp"] {
        assert!(images.contains(ext), "image list is missing {ext}");
    }
    assert!(!images.contains(".mkv"));
}

#[test]
fn test_extensions_file_replaces_bundled_list() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let list = dir.path().join("exts.txt");
    fs::write(&list, "# my formats\nMKV\n.ts\n\nmkv\n")?;

    let config = ProbeConfigBuilder::new(ExtensionClass::AudioVideo)
        .extensions_file(&list)
        .build();
    config.validate()?;
    let set = config.load_extensions()?;

    assert_eq!(set.iter().collect::<Vec<_>>(), vec![".mkv", ".ts"]);
    assert!(!set.contains(".mp4"));
    Ok(())
}

#[test]
fn test_empty_extensions_file_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let list = dir.path().join("empty.txt");
    fs::write(&list, "# nothing here\n\n")?;

    let config = ProbeConfigBuilder::new(ExtensionClass::Images)
        .extensions_file(&list)
        .build();
    assert!(matches!(config.load_extensions(), Err(CoreError::ExtensionList(_))));
    Ok(())
}

#[test]
fn test_missing_extensions_file_fails_validation() {
    let mut config = ProbeConfig::new(ExtensionClass::Images);
    config.extensions_file = Some("surely/not/here/exts.txt".into());
    assert!(matches!(config.validate(), Err(CoreError::ExtensionList(_))));
}
