//! Locates the media file for a shot list entry inside the video folder.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Suffix of the lightweight proxy transcodes preferred over originals.
pub const PROXY_SUFFIX: &str = "_Proxy.mp4";

/// Candidate paths for `requested`, in lookup order:
/// `<stem>_Proxy.mp4`, `<name>_Proxy.mp4`, then `<name>` itself.
pub fn candidates(video_dir: &Path, requested: &str) -> Vec<PathBuf> {
    let requested = Path::new(requested);

    let mut by_stem: OsString = requested.with_extension("").into_os_string();
    by_stem.push(PROXY_SUFFIX);

    let mut by_name: OsString = requested.as_os_str().to_os_string();
    by_name.push(PROXY_SUFFIX);

    vec![
        video_dir.join(by_stem),
        video_dir.join(by_name),
        video_dir.join(requested),
    ]
}

/// Returns the first existing candidate for `requested`, or `None` when
/// nothing matches or the name is empty.
pub fn resolve(video_dir: &Path, requested: &str) -> Option<PathBuf> {
    let requested = requested.trim();
    if requested.is_empty() {
        return None;
    }

    let found = candidates(video_dir, requested)
        .into_iter()
        .find(|candidate| candidate.is_file());

    match &found {
        Some(path) => log::debug!("Resolved '{}' to {}", requested, path.display()),
        None => log::debug!("No media found for '{}' in {}", requested, video_dir.display()),
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_proxy_by_stem_preferred() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        fs::write(dir.path().join("clip_Proxy.mp4"), b"proxy")?;
        fs::write(dir.path().join("clip.mp4"), b"original")?;

        assert_eq!(resolve(dir.path(), "clip.mp4"), Some(dir.path().join("clip_Proxy.mp4")));
        Ok(())
    }

    #[test]
    fn test_proxy_by_full_name() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        fs::write(dir.path().join("clip.mov_Proxy.mp4"), b"proxy")?;
        fs::write(dir.path().join("clip.mov"), b"original")?;

        assert_eq!(resolve(dir.path(), "clip.mov"), Some(dir.path().join("clip.mov_Proxy.mp4")));
        Ok(())
    }

    #[test]
    fn test_verbatim_and_missing() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        fs::write(dir.path().join("clip.mov"), b"original")?;

        assert_eq!(resolve(dir.path(), "clip.mov"), Some(dir.path().join("clip.mov")));
        assert_eq!(resolve(dir.path(), "other.mov"), None);
        assert_eq!(resolve(dir.path(), "   "), None);
        Ok(())
    }

    #[test]
    fn test_directories_are_not_media() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        fs::create_dir(dir.path().join("clip.mov"))?;
        assert_eq!(resolve(dir.path(), "clip.mov"), None);
        Ok(())
    }

    #[test]
    fn test_candidate_order() {
        let found = candidates(Path::new("/media"), "a.b.mxf");
        assert_eq!(
            found,
            vec![
                PathBuf::from("/media/a.b_Proxy.mp4"),
                PathBuf::from("/media/a.b.mxf_Proxy.mp4"),
                PathBuf::from("/media/a.b.mxf"),
            ]
        );
    }
}
