use std::fs;

use camino::Utf8Path;

pub const HTML_SUFFIX: &str = ".html";
pub const PDF_SUFFIX: &str = ".pdf";

/// List the `.html` file names in `dir`, in directory order.
///
/// A missing or unreadable directory yields an empty set.
pub fn discover(dir: &Utf8Path) -> Vec<String> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::debug!(%dir, error = %err, "documentation directory not readable");
            return Vec::new();
        }
    };

    entries
        .filter_map(Result::ok)
        // Follows symlinks, so a linked page counts as a file.
        .filter(|entry| fs::metadata(entry.path()).map(|m| m.is_file()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.ends_with(HTML_SUFFIX))
        .collect()
}

/// `guide.html` -> `guide.pdf`. Only the trailing suffix is replaced.
pub fn output_name(html_file: &str) -> String {
    let base = html_file.strip_suffix(HTML_SUFFIX).unwrap_or(html_file);
    format!("{base}{PDF_SUFFIX}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_dir(tag: &str) -> Utf8PathBuf {
        let mut dir = std::env::temp_dir();
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        dir.push(format!("docpdf-discover-{tag}-{ts}"));
        Utf8PathBuf::from_path_buf(dir).unwrap()
    }

    #[test]
    fn keeps_only_html_files() {
        let dir = unique_temp_dir("filter");
        fs::create_dir_all(dir.join("nested.html")).unwrap();
        for name in ["a.html", "b.html", "notes.txt", "c.htm", "d.html.bak"] {
            fs::write(dir.join(name), "<p>hi</p>").unwrap();
        }

        let mut found = discover(&dir);
        found.sort();
        assert_eq!(found, vec!["a.html".to_owned(), "b.html".to_owned()]);
        assert!(found.iter().all(|name| name.ends_with(HTML_SUFFIX)));

        let _ = fs::remove_dir_all(&dir);
    }

    #[cfg(unix)]
    #[test]
    fn includes_symlinked_html_files() {
        let dir = unique_temp_dir("symlink");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("real.html"), "<p>hi</p>").unwrap();
        std::os::unix::fs::symlink(dir.join("real.html"), dir.join("linked.html")).unwrap();
        std::os::unix::fs::symlink(dir.join("gone.html"), dir.join("dangling.html")).unwrap();

        let mut found = discover(&dir);
        found.sort();
        assert_eq!(found, vec!["linked.html".to_owned(), "real.html".to_owned()]);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_directory_is_empty() {
        let dir = unique_temp_dir("missing");
        assert!(discover(&dir).is_empty());
    }

    #[test]
    fn output_name_swaps_suffix_only() {
        assert_eq!(output_name("guide.html"), "guide.pdf");
        assert_eq!(output_name("x.html.html"), "x.html.pdf");
        assert_eq!(output_name("my.html-notes.html"), "my.html-notes.pdf");
    }
}
