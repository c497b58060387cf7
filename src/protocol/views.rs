//! HTML views
//!
//! Server-rendered pages. Every piece of user-derived text goes through
//! `escape` (or, for Markdown, through the sanitizer) before it is emitted.

use std::fmt::Write;

use crate::auth::UserClaims;
use crate::content::{FileKind, FileView};
use crate::navigate::FolderListing;
use crate::storage::validation::parent_relative;

const STYLE: &str = "body{font-family:system-ui,sans-serif;max-width:960px;margin:2rem auto;padding:0 1rem}\
nav a{margin-right:1rem}ul.entries{list-style:none;padding:0}ul.entries li{display:flex;gap:1rem;padding:.3rem 0;border-bottom:1px solid #eee}\
ul.entries li a.name{flex:1}form.inline{display:inline}pre{white-space:pre-wrap;background:#f6f6f6;padding:1rem}\
textarea{width:100%;min-height:20rem}iframe{width:100%;height:80vh;border:0}img.preview{max-width:100%}";

/// Escape text for HTML element content and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Percent-encode a relative path for use in a URL, keeping `/`
pub fn encode_path(relative: &str) -> String {
    let mut out = String::with_capacity(relative.len());
    for byte in relative.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~' | b'/') {
            out.push(byte as char);
        } else {
            let _ = write!(out, "%{:02X}", byte);
        }
    }
    out
}

/// URL of the listing for a folder; the root for an empty path
pub fn folder_url(relative: &str) -> String {
    let relative = relative.trim_matches('/');
    if relative.is_empty() {
        "/".to_string()
    } else {
        format!("/folder/{}", encode_path(relative))
    }
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape(title),
        STYLE,
        body
    )
}

fn breadcrumbs(relative: &str) -> String {
    let mut html = String::from("<nav><a href=\"/\">Home</a>");
    let mut so_far = String::new();
    for segment in relative.split('/').filter(|s| !s.is_empty()) {
        if !so_far.is_empty() {
            so_far.push('/');
        }
        so_far.push_str(segment);
        let _ = write!(
            html,
            " / <a href=\"{}\">{}</a>",
            folder_url(&so_far),
            escape(segment)
        );
    }
    html.push_str("</nav>");
    html
}

/// Folder listing with the create, upload and delete controls
pub fn index_page(listing: &FolderListing, user: &UserClaims) -> String {
    let current = &listing.relative_path;
    let mut body = String::new();

    let _ = write!(
        body,
        "<header><strong>Documents</strong> &middot; signed in as {} \
         &middot; <a href=\"/settings\">Settings</a> &middot; <a href=\"/logout\">Log out</a></header>\n{}\n",
        escape(&user.username),
        breadcrumbs(current)
    );

    if listing.is_empty() {
        body.push_str("<p>This folder is empty.</p>\n");
    } else {
        body.push_str("<ul class=\"entries\">\n");
        for entry in &listing.entries {
            let target = if entry.is_directory {
                folder_url(&entry.relative_path)
            } else {
                format!("/file/{}", encode_path(&entry.relative_path))
            };
            let _ = write!(
                body,
                "<li><span>{}</span><a class=\"name\" href=\"{}\">{}</a>",
                if entry.is_directory { "&#128193;" } else { "&#128196;" },
                target,
                escape(&entry.name)
            );
            if !entry.is_directory {
                let _ = write!(
                    body,
                    "<a href=\"/edit/{}\">Edit</a>",
                    encode_path(&entry.relative_path)
                );
            }
            let _ = write!(
                body,
                "<button data-path=\"{}\" onclick=\"removeEntry(this)\">Delete</button></li>\n",
                escape(&encode_path(&entry.relative_path))
            );
        }
        body.push_str("</ul>\n");
    }

    let _ = write!(
        body,
        "<h2>New document</h2>\n<form method=\"post\" action=\"/create\">\
         <input type=\"hidden\" name=\"currentFolder\" value=\"{current}\">\
         <p><input name=\"title\" placeholder=\"Title\" required></p>\
         <p><textarea name=\"details\" placeholder=\"Write here\" required></textarea></p>\
         <button>Create</button></form>\n\
         <h2>New folder</h2>\n<form method=\"post\" action=\"/create-folder\">\
         <input type=\"hidden\" name=\"currentFolder\" value=\"{current}\">\
         <input name=\"folderName\" placeholder=\"Folder name\" required> <button>Create folder</button></form>\n",
        current = escape(current)
    );

    if current.is_empty() {
        body.push_str(
            "<h2>New semester</h2>\n<form method=\"post\" action=\"/create-semester\">\
             <input name=\"semesterName\" placeholder=\"Semester name\" required> \
             <button>Create semester</button></form>\n",
        );
    }

    let upload_url = if current.is_empty() {
        "/upload".to_string()
    } else {
        format!("/upload/{}", encode_path(current))
    };
    let _ = write!(
        body,
        "<h2>Upload</h2>\n<form id=\"upload\" data-url=\"{}\">\
         <input type=\"file\" name=\"files\" multiple> <button>Upload</button></form>\n\
         <script>\n\
         document.getElementById('upload').addEventListener('submit', async (e) => {{\n\
           e.preventDefault();\n\
           const res = await fetch(e.target.dataset.url, {{ method: 'POST', body: new FormData(e.target) }});\n\
           const data = await res.json();\n\
           if (!data.success) alert(data.message);\n\
           location.reload();\n\
         }});\n\
         async function removeEntry(button) {{\n\
           if (!confirm('Delete this entry?')) return;\n\
           const res = await fetch('/file/' + button.dataset.path, {{ method: 'DELETE' }});\n\
           const data = await res.json();\n\
           if (!data.success) alert(data.message);\n\
           location.reload();\n\
         }}\n\
         </script>\n",
        escape(&upload_url)
    );

    let title = if current.is_empty() { "Documents" } else { current.as_str() };
    layout(title, &body)
}

/// Single document view
pub fn file_page(view: &FileView) -> String {
    let parent = parent_relative(&view.relative_path);
    let raw_url = format!("/files/{}", encode_path(&view.relative_path));
    let mut body = String::new();

    let _ = write!(
        body,
        "{}\n<h1>{}</h1>\n<p><a href=\"{}\">Back</a> &middot; <a href=\"{}\">Download</a>",
        breadcrumbs(parent),
        escape(&view.filename),
        folder_url(parent),
        escape(&raw_url)
    );
    if view.kind.is_inline() {
        let _ = write!(
            body,
            " &middot; <a href=\"/edit/{}\">Edit</a>",
            encode_path(&view.relative_path)
        );
    }
    body.push_str("</p>\n");

    match (view.kind, &view.rendered_content) {
        (FileKind::Markdown, Some(html)) => {
            let _ = write!(body, "<article class=\"markdown\">{}</article>", html);
        }
        (FileKind::Text, Some(text)) => {
            let _ = write!(body, "<pre>{}</pre>", escape(text));
        }
        (FileKind::Pdf, _) => {
            let _ = write!(body, "<iframe src=\"{}\"></iframe>", escape(&raw_url));
        }
        (FileKind::Image, _) => {
            let _ = write!(
                body,
                "<img class=\"preview\" src=\"{}\" alt=\"{}\">",
                escape(&raw_url),
                escape(&view.filename)
            );
        }
        _ => body.push_str("<p>Nothing to show.</p>"),
    }

    layout(&view.filename, &body)
}

/// Edit form with the document's current content
pub fn edit_page(relative: &str, content: &str) -> String {
    let parent = parent_relative(relative);
    let filename = relative.rsplit('/').next().unwrap_or(relative);

    let body = format!(
        "{}\n<h1>Edit {}</h1>\n<form method=\"post\" action=\"/edit\">\
         <input type=\"hidden\" name=\"previous\" value=\"{name}\">\
         <input type=\"hidden\" name=\"previousPath\" value=\"{parent}\">\
         <p><label>Name <input name=\"new\" value=\"{name}\" required></label></p>\
         <p><textarea name=\"details\">{}</textarea></p>\
         <button>Save</button> <a href=\"{}\">Cancel</a></form>",
        breadcrumbs(parent),
        escape(filename),
        escape(content),
        folder_url(parent),
        name = escape(filename),
        parent = escape(parent),
    );

    layout(&format!("Edit {}", filename), &body)
}

/// Account page
pub fn settings_page(user: &UserClaims) -> String {
    let body = format!(
        "<nav><a href=\"/\">Home</a></nav>\n<h1>Settings</h1>\n\
         <p>Signed in as <strong>{}</strong>.</p>\n<p><a href=\"/logout\">Log out</a></p>",
        escape(&user.username)
    );
    layout("Settings", &body)
}

pub fn login_page() -> String {
    let body = "<h1>Log in</h1>\n<form id=\"login\">\
                <p><input name=\"username\" placeholder=\"Username\" autocomplete=\"username\" required></p>\
                <p><input name=\"password\" type=\"password\" placeholder=\"Password\" autocomplete=\"current-password\" required></p>\
                <button>Log in</button></form>\n<p id=\"error\"></p>\n<p><a href=\"/signup\">Need an account?</a></p>\n\
                <script>\n\
                document.getElementById('login').addEventListener('submit', async (e) => {\n\
                  e.preventDefault();\n\
                  const form = new FormData(e.target);\n\
                  const idToken = form.get('username') + ':' + form.get('password');\n\
                  const res = await fetch('/sessionLogin', {\n\
                    method: 'POST', headers: { 'Content-Type': 'application/json' },\n\
                    body: JSON.stringify({ idToken })\n\
                  });\n\
                  if (res.ok) { location.href = '/'; return; }\n\
                  const data = await res.json();\n\
                  document.getElementById('error').textContent = data.error + ' (' + data.code + ')';\n\
                });\n\
                </script>";
    layout("Log in", body)
}

pub fn signup_page() -> String {
    let body = "<h1>Sign up</h1>\n<p>Accounts are provisioned by the server administrator. \
                Ask them to add you to the <code>[users]</code> table of the server configuration.</p>\n\
                <p><a href=\"/login\">Back to login</a></p>";
    layout("Sign up", body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigate::DirEntry;
    use std::path::PathBuf;
    use std::time::SystemTime;

    fn user() -> UserClaims {
        UserClaims {
            username: "alice".into(),
            issued_at: SystemTime::now(),
            expires_at: SystemTime::now(),
        }
    }

    #[test]
    fn escape_neutralizes_markup() {
        assert_eq!(escape("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn paths_are_percent_encoded() {
        assert_eq!(encode_path("sem 1/a&b.txt"), "sem%201/a%26b.txt");
        assert_eq!(folder_url(""), "/");
        assert_eq!(folder_url("sem1/notes/"), "/folder/sem1/notes");
    }

    #[test]
    fn listing_links_folders_and_files() {
        let listing = FolderListing {
            relative_path: "sem1".into(),
            entries: vec![
                DirEntry {
                    name: "notes".into(),
                    is_directory: true,
                    created_at: SystemTime::now(),
                    relative_path: "sem1/notes".into(),
                },
                DirEntry {
                    name: "<b>.txt".into(),
                    is_directory: false,
                    created_at: SystemTime::now(),
                    relative_path: "sem1/<b>.txt".into(),
                },
            ],
        };

        let html = index_page(&listing, &user());
        assert!(html.contains("href=\"/folder/sem1/notes\""));
        assert!(html.contains("href=\"/file/sem1/%3Cb%3E.txt\""));
        assert!(html.contains("&lt;b&gt;.txt"));
        assert!(!html.contains("<b>.txt"));
        assert!(html.contains("data-url=\"/upload/sem1\""));
        assert!(!html.contains("create-semester"));
    }

    #[test]
    fn text_view_is_escaped() {
        let view = FileView {
            filename: "a.txt".into(),
            relative_path: "a.txt".into(),
            full_path: PathBuf::from("/tmp/a.txt"),
            kind: FileKind::Text,
            rendered_content: Some("<script>x</script>".into()),
        };
        let html = file_page(&view);
        assert!(html.contains("&lt;script&gt;x&lt;/script&gt;"));
        assert!(!html.contains("<script>x"));
    }

    #[test]
    fn image_view_points_at_raw_route() {
        let view = FileView {
            filename: "p.png".into(),
            relative_path: "sem1/p.png".into(),
            full_path: PathBuf::from("/tmp/sem1/p.png"),
            kind: FileKind::Image,
            rendered_content: None,
        };
        assert!(file_page(&view).contains("src=\"/files/sem1/p.png\""));
    }
}
