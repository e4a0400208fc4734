use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

/// The extension of `path` including its leading dot, or empty.
///
/// Follows `Path::extension`, so dotfiles like `.bashrc` have no extension.
/// The raw bytes are kept, so non-UTF-8 extensions stay distinct.
pub fn extension_of(path: &Path) -> OsString {
  let mut dotted = OsString::new();
  if let Some(ext) = path.extension() {
    dotted.push(".");
    dotted.push(ext);
  }
  dotted
}

fn normal_components(path: &Path) -> Vec<Component<'_>> {
  path.components().filter(|c| !matches!(c, Component::CurDir)).collect()
}

/// Path to `target` relative to the directory containing `link`.
///
/// Both paths must be expressed from the same base (both absolute, or both
/// relative to the same working directory). Returns `None` when no relative
/// path can be derived, e.g. one is absolute and the other is not, or the link
/// directory climbs out of the shared prefix with `..`.
pub fn relative_target(link: &Path, target: &Path) -> Option<PathBuf> {
  if link.is_absolute() != target.is_absolute() {
    return None;
  }

  let from = normal_components(link.parent().unwrap_or(Path::new("")));
  let to = normal_components(target);

  let common = from.iter().zip(to.iter()).take_while(|(a, b)| a == b).count();

  if from[common..].iter().any(|c| !matches!(c, Component::Normal(_))) {
    return None;
  }

  let mut relative = PathBuf::new();
  for _ in common..from.len() {
    relative.push("..");
  }
  for component in &to[common..] {
    relative.push(component.as_os_str());
  }

  Some(relative)
}
