use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

/// Reads a corpus file and returns one token sequence per line.
///
/// - Reads the entire file into memory
/// - Splits lines on `\n` / `\r\n`, tokens on any whitespace
/// - Skips blank lines
pub fn read_sequences<P: AsRef<Path>>(filename: P) -> io::Result<Vec<Vec<String>>> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents
		.lines()
		.map(|line| line.split_whitespace().map(str::to_owned).collect::<Vec<_>>())
		.filter(|sequence| !sequence.is_empty())
		.collect())
}

/// Name of a corpus: its file name without extension.
///
/// `"./data/weather.dat"` gives `"weather"`.
pub fn corpus_name<P: AsRef<Path>>(path: P) -> io::Result<String> {
	path.as_ref()
		.file_stem()
		.map(|stem| stem.to_string_lossy().into_owned())
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Path has no filename"))
}

/// Resolves a data folder against the working directory.
///
/// Absolute paths are kept. If the working directory cannot be read the
/// path is returned as given.
pub fn resolve_folder(input: &str) -> PathBuf {
	let path = Path::new(input);
	if path.is_absolute() {
		return path.to_path_buf();
	}
	match env::current_dir() {
		Ok(cwd) => cwd.join(path.strip_prefix(".").unwrap_or(path)),
		Err(_) => path.to_path_buf(),
	}
}

/// Names of the corpora with the given extension in `dir`, sorted.
///
/// Only regular files count; a directory named `x.dat` is not a corpus.
pub fn list_corpora<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
	let mut names = fs::read_dir(dir)?
		.map(|entry| entry.map(|entry| entry.path()))
		.filter(|path| match path {
			Ok(path) => path.is_file() && path.extension().is_some_and(|ext| ext == extension),
			Err(_) => true,
		})
		.map(|path| corpus_name(path?))
		.collect::<io::Result<Vec<_>>>()?;
	names.sort();
	Ok(names)
}

#[cfg(test)]
mod tests {
	use std::io::Write;

	use super::*;

	#[test]
	fn sequences_are_split_per_line() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		write!(file, "sun sun rain\r\n\n  cloud   sun \nrain\n").unwrap();

		let sequences = read_sequences(file.path()).unwrap();
		assert_eq!(
			sequences,
			vec![
				vec!["sun".to_owned(), "sun".to_owned(), "rain".to_owned()],
				vec!["cloud".to_owned(), "sun".to_owned()],
				vec!["rain".to_owned()],
			]
		);
	}

	#[test]
	fn only_matching_files_are_listed() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("weather.dat"), "sun rain").unwrap();
		fs::write(dir.path().join("notes.txt"), "").unwrap();
		fs::write(dir.path().join("music.dat"), "do re mi").unwrap();
		fs::create_dir(dir.path().join("nested.dat")).unwrap();

		assert_eq!(list_corpora(dir.path(), "dat").unwrap(), vec!["music", "weather"]);
	}

	#[test]
	fn corpus_names() {
		assert_eq!(corpus_name("./data/weather.dat").unwrap(), "weather");
		assert_eq!(corpus_name("weather.dat").unwrap(), "weather");
		assert!(corpus_name("").is_err());

		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("b.dat"), "").unwrap();
		fs::write(dir.path().join("a.dat"), "").unwrap();
		assert_eq!(list_corpora(dir.path(), "dat").unwrap(), vec!["a", "b"]);
	}

	#[test]
	fn folders_are_resolved() {
		let cwd = env::current_dir().unwrap();
		assert_eq!(resolve_folder("./data"), cwd.join("data"));
		assert_eq!(resolve_folder("data"), cwd.join("data"));
		assert_eq!(resolve_folder("."), cwd);
		assert_eq!(resolve_folder("/srv/corpora"), PathBuf::from("/srv/corpora"));
	}
}
