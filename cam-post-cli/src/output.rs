//! Writing generated programs to disk or stdout

use anyhow::{Context, Result};
use cam_post::GeneratedFile;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Write every generated file to `directory/<name>.<extension>`
pub fn write_files(files: &[GeneratedFile], directory: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create output directory: {:?}", directory))?;

    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let path = directory.join(format!("{}.{}", file.name, extension));
        fs::write(&path, with_trailing_newline(&file.text))
            .with_context(|| format!("Failed to write output file: {:?}", path))?;

        log::info!("Wrote {:?}", path);
        written.push(path);
    }

    Ok(written)
}

/// Print generated files; with more than one file each gets a `(name)` header
pub fn print_files<W: Write>(files: &[GeneratedFile], out: &mut W) -> Result<()> {
    let headers = files.len() > 1;
    for (idx, file) in files.iter().enumerate() {
        if headers {
            if idx > 0 {
                writeln!(out)?;
            }
            writeln!(out, "({})", file.name)?;
        }
        write!(out, "{}", with_trailing_newline(&file.text))?;
    }
    Ok(())
}

fn with_trailing_newline(text: &str) -> String {
    if text.is_empty() || text.ends_with('\n') {
        text.to_string()
    } else {
        format!("{}\n", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, text: &str) -> GeneratedFile {
        GeneratedFile {
            name: name.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_write_files() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![file("main", "N10 M98 P7\nN20 M30"), file("7", "N10 M99")];

        let written = write_files(&files, dir.path(), "nc").unwrap();

        assert_eq!(written, vec![dir.path().join("main.nc"), dir.path().join("7.nc")]);
        assert_eq!(
            fs::read_to_string(dir.path().join("main.nc")).unwrap(),
            "N10 M98 P7\nN20 M30\n"
        );
        assert_eq!(fs::read_to_string(dir.path().join("7.nc")).unwrap(), "N10 M99\n");
    }

    #[test]
    fn test_write_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("job");

        write_files(&[file("main", "")], &nested, "tap").unwrap();
        assert_eq!(fs::read_to_string(nested.join("main.tap")).unwrap(), "");
    }

    #[test]
    fn test_print_single_file() {
        let mut out = Vec::new();
        print_files(&[file("main", "N10 M30")], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "N10 M30\n");
    }

    #[test]
    fn test_print_multiple_files() {
        let mut out = Vec::new();
        print_files(&[file("main", "N10 M30"), file("7", "N10 M99")], &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "(main)\nN10 M30\n\n(7)\nN10 M99\n"
        );
    }
}
