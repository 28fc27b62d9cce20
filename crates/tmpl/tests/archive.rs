//! Directory mode: walk, archive, extract.

use std::fs;
use std::io::Read;
use std::path::Path;

use tempfile::TempDir;
use tmpl::{extract, render_tree, Context, RenderError, RenderOptions, Renderer, Sink, StripRule};
use tmpl_funcs::build_table;

fn renderer() -> Renderer {
    Renderer::new(
        &build_table(),
        Context::from_pairs(["NAME=web", "PORT=8080"]),
        RenderOptions::default(),
    )
}

/// `<tmp>/site/{a.txt, conf/server.conf}`
fn fixture() -> (TempDir, std::path::PathBuf) {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().join("site");
    fs::create_dir_all(root.join("conf")).unwrap();
    fs::write(root.join("a.txt"), "hello {{ NAME }}\n").unwrap();
    fs::write(root.join("conf/server.conf"), "port={{ PORT }}\n").unwrap();
    (tmp, root)
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

fn stream(root: &Path) -> Vec<u8> {
    let mut out = Vec::new();
    render_tree(root, &renderer(), Sink::Stream(Box::new(&mut out)), StripRule(0)).unwrap();
    out
}

#[test]
fn stream_sink_writes_ordered_tar() {
    let (_tmp, root) = fixture();
    let bytes = stream(&root);

    let mut archive = tar::Archive::new(bytes.as_slice());
    let mut seen = Vec::new();
    for entry in archive.entries().unwrap() {
        let mut entry = entry.unwrap();
        let mut body = String::new();
        entry.read_to_string(&mut body).unwrap();
        let size = entry.header().size().unwrap();
        seen.push((entry.path().unwrap().to_string_lossy().into_owned(), size, body));
    }
    assert_eq!(
        seen,
        vec![
            ("site/a.txt".to_string(), 10, "hello web\n".to_string()),
            ("site/conf/server.conf".to_string(), 10, "port=8080\n".to_string()),
        ]
    );
}

#[test]
fn round_trip_without_strip() {
    let (tmp, root) = fixture();
    let dest = tmp.path().join("out");
    let count = render_tree(&root, &renderer(), Sink::Directory(dest.clone()), StripRule(0)).unwrap();

    assert_eq!(count, 2);
    assert_eq!(read(&dest.join("site/a.txt")), "hello web\n");
    assert_eq!(read(&dest.join("site/conf/server.conf")), "port=8080\n");
}

#[test]
fn round_trip_with_strip_one() {
    let (tmp, root) = fixture();
    let dest = tmp.path().join("out");
    render_tree(&root, &renderer(), Sink::Directory(dest.clone()), StripRule(1)).unwrap();

    assert_eq!(read(&dest.join("a.txt")), "hello web\n");
    assert_eq!(read(&dest.join("conf/server.conf")), "port=8080\n");
    assert!(!dest.join("site").exists());
}

#[test]
fn strip_never_empties_a_name() {
    let (tmp, root) = fixture();
    let dest = tmp.path().join("out");
    render_tree(&root, &renderer(), Sink::Directory(dest.clone()), StripRule(10)).unwrap();

    assert_eq!(read(&dest.join("a.txt")), "hello web\n");
    assert_eq!(read(&dest.join("server.conf")), "port=8080\n");
}

#[test]
fn paths_are_rendered() {
    let (tmp, root) = fixture();
    fs::write(root.join("{{ NAME }}.env"), "NAME={{ NAME }}\n").unwrap();
    let dest = tmp.path().join("out");
    render_tree(&root, &renderer(), Sink::Directory(dest.clone()), StripRule(1)).unwrap();

    assert_eq!(read(&dest.join("web.env")), "NAME=web\n");
}

#[test]
fn html_mode_escapes_content_but_not_paths() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().join("site");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("{{ NAME }}.txt"), "<p>{{ NAME }}</p>").unwrap();
    let renderer = Renderer::new(
        &build_table(),
        Context::from_pairs(["NAME=R&D"]),
        RenderOptions::default().html(true),
    );
    let dest = tmp.path().join("out");
    render_tree(&root, &renderer, Sink::Directory(dest.clone()), StripRule(1)).unwrap();

    assert_eq!(read(&dest.join("R&D.txt")), "<p>R&amp;D</p>");
    assert!(!dest.join("R&amp;D.txt").exists());
}

#[cfg(unix)]
#[test]
fn file_modes_are_kept() {
    use std::os::unix::fs::PermissionsExt;

    let (tmp, root) = fixture();
    fs::set_permissions(root.join("a.txt"), fs::Permissions::from_mode(0o750)).unwrap();
    let dest = tmp.path().join("out");
    render_tree(&root, &renderer(), Sink::Directory(dest.clone()), StripRule(1)).unwrap();

    let mode = fs::metadata(dest.join("a.txt")).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o750);
}

#[test]
fn render_failure_names_the_file() {
    let (tmp, root) = fixture();
    fs::write(root.join("broken.txt"), "{{ fail(\"bad input\") }}").unwrap();
    let dest = tmp.path().join("out");
    let err = render_tree(&root, &renderer(), Sink::Directory(dest.clone()), StripRule(0)).unwrap_err();

    match &err {
        RenderError::Entry { path, .. } => assert!(path.ends_with("broken.txt"), "{:?}", path),
        other => panic!("expected entry error, got {:?}", other),
    }
    assert!(err.is_execution());
    // Extraction only starts once the whole archive rendered.
    assert!(!dest.join("site/a.txt").exists());
}

#[test]
fn syntax_error_in_file_aborts_walk() {
    let (_tmp, root) = fixture();
    fs::write(root.join("b.txt"), "{% for %}").unwrap();
    let mut out = Vec::new();
    let err = render_tree(&root, &renderer(), Sink::Stream(Box::new(&mut out)), StripRule(0)).unwrap_err();
    assert!(err.is_syntax(), "{:?}", err);
}

#[test]
fn missing_root_is_an_error() {
    let tmp = tempfile::tempdir().unwrap();
    let mut out = Vec::new();
    let err = render_tree(
        &tmp.path().join("nope"),
        &renderer(),
        Sink::Stream(Box::new(&mut out)),
        StripRule(0),
    )
    .unwrap_err();
    assert!(matches!(err, RenderError::Walk(_)), "{:?}", err);
}

#[test]
fn extract_accepts_directory_records() {
    let tmp = tempfile::tempdir().unwrap();
    let mut builder = tar::Builder::new(Vec::new());

    let mut dir = tar::Header::new_ustar();
    dir.set_entry_type(tar::EntryType::Directory);
    dir.set_size(0);
    dir.set_mode(0o755);
    builder.append_data(&mut dir, "pkg/empty/", std::io::empty()).unwrap();

    let mut file = tar::Header::new_ustar();
    file.set_size(2);
    file.set_mode(0o644);
    builder.append_data(&mut file, "pkg/x.txt", &b"ok"[..]).unwrap();
    let bytes = builder.into_inner().unwrap();

    let count = extract(bytes.as_slice(), tmp.path(), StripRule(1)).unwrap();
    assert_eq!(count, 1);
    assert!(tmp.path().join("empty").is_dir());
    assert_eq!(read(&tmp.path().join("x.txt")), "ok");
}

#[test]
fn extract_rejects_symlinks() {
    let tmp = tempfile::tempdir().unwrap();
    let mut builder = tar::Builder::new(Vec::new());
    let mut link = tar::Header::new_ustar();
    link.set_entry_type(tar::EntryType::Symlink);
    link.set_size(0);
    link.set_mode(0o777);
    link.set_link_name("target.txt").unwrap();
    builder
        .append_data(&mut link, "pkg/link", std::io::empty())
        .unwrap();
    let bytes = builder.into_inner().unwrap();

    let err = extract(bytes.as_slice(), tmp.path(), StripRule(0)).unwrap_err();
    assert!(
        matches!(err, RenderError::UnsupportedArchiveEntry { ref path, .. } if path == "pkg/link"),
        "{:?}",
        err
    );
}

#[test]
fn extract_rejects_parent_traversal() {
    let tmp = tempfile::tempdir().unwrap();
    let dest = tmp.path().join("dest");

    // `append_data` refuses `..`, so write the name into the header directly.
    let mut header = tar::Header::new_gnu();
    header.as_gnu_mut().unwrap().name[..9].copy_from_slice(b"../escape");
    header.set_size(1);
    header.set_mode(0o644);
    header.set_cksum();
    let mut builder = tar::Builder::new(Vec::new());
    builder.append(&header, &b"x"[..]).unwrap();
    let bytes = builder.into_inner().unwrap();

    let err = extract(bytes.as_slice(), &dest, StripRule(0)).unwrap_err();
    assert!(matches!(err, RenderError::UnsafeArchivePath(_)), "{:?}", err);
    assert!(!tmp.path().join("escape").exists());
}
