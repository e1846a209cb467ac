//! Directory listing pages

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

use crate::http::encode_path;
use crate::http::response::escape_html;

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

/// Render an HTML index of `directory`, reachable at `uri`
///
/// `uri` is expected to end with `/`. Subdirectories come first, then
/// files, each group sorted by name. Fails only when the directory itself
/// cannot be read.
pub fn list_directory(uri: &str, directory: &Path) -> io::Result<String> {
    let mut files = Vec::new();
    let mut directories = Vec::new();

    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        // follow symlinks, a link to a directory is listed as one
        match fs::metadata(entry.path()) {
            Ok(meta) if meta.is_dir() => directories.push(name),
            Ok(meta) => files.push((name, meta.len())),
            Err(_) => files.push((name, 0)),
        }
    }
    files.sort();
    directories.sort();

    let up = parent_uri(uri);
    let heading = format!("Directory {}", escape_html(uri));

    let mut page = String::with_capacity(512 + 128 * (files.len() + directories.len()));
    let _ = write!(
        page,
        "<html><head><title>{heading}</title><style><!--\n\
         span.dirname {{ font-weight: bold; }}\n\
         span.filesize {{ font-size: 75%; }}\n\
         // -->\n</style></head><body><h1>{heading}</h1>"
    );

    if up.is_some() || !directories.is_empty() || !files.is_empty() {
        page.push_str("<ul>");

        if up.is_some() || !directories.is_empty() {
            page.push_str("<section class=\"directories\">");
            if let Some(up) = up {
                let _ = write!(
                    page,
                    "<li><a rel=\"directory\" href=\"{}\"><span class=\"dirname\">..</span></a></li>",
                    encode_path(up)
                );
            }
            for dir in &directories {
                let _ = write!(
                    page,
                    "<li><a rel=\"directory\" href=\"{}\"><span class=\"dirname\">{}/</span></a></li>",
                    encode_path(&format!("{uri}{dir}/")),
                    escape_html(dir)
                );
            }
            page.push_str("</section>");
        }

        if !files.is_empty() {
            page.push_str("<section class=\"files\">");
            for (name, len) in &files {
                let _ = write!(
                    page,
                    "<li><a href=\"{}\"><span class=\"filename\">{}</span></a>&nbsp;<span class=\"filesize\">({})</span></li>",
                    encode_path(&format!("{uri}{name}")),
                    escape_html(name),
                    format_size(*len)
                );
            }
            page.push_str("</section>");
        }

        page.push_str("</ul>");
    }

    page.push_str("</body></html>");
    Ok(page)
}

/// Human readable size with a two digit truncated fraction
pub fn format_size(len: u64) -> String {
    if len < KIB {
        format!("{len} bytes")
    } else if len < MIB {
        format!("{}.{:02} KB", len / KIB, len % KIB * 100 / KIB)
    } else {
        format!("{}.{:02} MB", len / MIB, len % MIB * 100 / MIB)
    }
}

/// URI of the enclosing directory, `None` at the root
fn parent_uri(uri: &str) -> Option<&str> {
    if uri.len() <= 1 {
        return None;
    }
    let trimmed = uri.strip_suffix('/').unwrap_or(uri);
    trimmed.rfind('/').map(|slash| &uri[..=slash])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 bytes");
        assert_eq!(format_size(1023), "1023 bytes");
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(2048), "2.00 KB");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(1024 * 1024 - 1), "1023.99 KB");
        assert_eq!(format_size(3 * 1024 * 1024 + 512 * 1024), "3.50 MB");
    }

    #[test]
    fn test_parent_uri() {
        assert_eq!(parent_uri("/"), None);
        assert_eq!(parent_uri("/docs/"), Some("/"));
        assert_eq!(parent_uri("/docs/sub/"), Some("/docs/"));
    }

    #[test]
    fn test_listing_sorted_and_grouped() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("zeta")).unwrap();
        fs::create_dir(dir.path().join("alpha")).unwrap();
        fs::write(dir.path().join("b.txt"), vec![0u8; 2048]).unwrap();
        fs::write(dir.path().join("a b.txt"), b"hi").unwrap();

        let page = list_directory("/docs/", dir.path()).unwrap();

        let alpha = page.find("alpha/").unwrap();
        let zeta = page.find("zeta/").unwrap();
        let a = page.find(">a b.txt<").unwrap();
        let b = page.find(">b.txt<").unwrap();
        assert!(alpha < zeta && zeta < a && a < b);

        assert!(page.contains("href=\"/\""));
        assert!(page.contains("href=\"/docs/a%20b.txt\""));
        assert!(page.contains("href=\"/docs/alpha/\""));
        assert!(page.contains("(2 bytes)"));
        assert!(page.contains("(2.00 KB)"));
    }

    #[test]
    fn test_empty_root_has_no_items() {
        let dir = tempfile::tempdir().unwrap();
        let page = list_directory("/", dir.path()).unwrap();
        assert!(page.contains("<h1>Directory /</h1>"));
        assert!(!page.contains("<ul>"));
        assert!(page.ends_with("</body></html>"));
    }

    #[test]
    fn test_names_are_escaped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("<b>.txt"), b"x").unwrap();
        let page = list_directory("/", dir.path()).unwrap();
        assert!(page.contains("&lt;b&gt;.txt"));
        assert!(page.contains("href=\"/%3Cb%3E.txt\""));
    }

    #[test]
    fn test_missing_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_directory("/x/", &dir.path().join("x")).is_err());
    }
}
