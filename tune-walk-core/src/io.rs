use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::env;

/// Reads a whole text file (song plans are small JSON documents).
pub(crate) fn read_file<P: AsRef<Path>>(filename: P) -> io::Result<String> {
	fs::read_to_string(filename)
}

/// Builds an output path inside `folder`, creating the folder if needed.
///
/// Example:
/// `createdFiles` + `"drum_pattern.mid"` → `createdFiles/drum_pattern.mid`
pub(crate) fn build_output_path<P: AsRef<Path>>(folder: P, filename: &str) -> io::Result<PathBuf> {
	if filename.is_empty() {
		return Err(io::Error::new(io::ErrorKind::InvalidInput, "Output filename is empty"));
	}

	let folder = normalize_folder(folder.as_ref());
	fs::create_dir_all(&folder)?;
	Ok(folder.join(filename))
}

/// Normalize a folder path.
///
/// - `""`, `"."` or `"./"` resolves to the current working directory
/// - Other paths are returned as-is (not canonicalized)
pub(crate) fn normalize_folder(input: &Path) -> PathBuf {
	match input.to_str() {
		Some("" | "." | "./") => env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
		_ => input.to_path_buf(),
	}
}
