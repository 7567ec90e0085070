#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use lopdf::{dictionary, Document, Object, Stream};

/// Write a PDF whose pages each carry a `% page N` marker followed by
/// `padding` bytes of filler, uncompressed, so page sizes are predictable.
pub fn write_sample_pdf(path: &Path, page_count: u32, padding: usize) {
    let mut doc = sample_document(page_count, padding);
    doc.save(path).expect("Failed to write sample PDF");
}

/// Like [`write_sample_pdf`], plus an `attachment`-byte embedded file hung
/// off the catalog's `/Names` tree.
pub fn write_sample_pdf_with_attachment(
    path: &Path,
    page_count: u32,
    padding: usize,
    attachment: usize,
) {
    let mut doc = sample_document(page_count, padding);
    let file_id = doc.add_object(Stream::new(
        dictionary! { "Type" => "EmbeddedFile" },
        vec![b'a'; attachment],
    ));
    let spec_id = doc.add_object(dictionary! {
        "Type" => "Filespec",
        "F" => Object::string_literal("notes.bin"),
        "EF" => dictionary! { "F" => file_id },
    });
    let catalog_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .expect("Missing catalog");
    doc.get_dictionary_mut(catalog_id)
        .expect("Missing catalog")
        .set(
            "Names",
            dictionary! {
                "EmbeddedFiles" => dictionary! {
                    "Names" => vec![Object::string_literal("notes.bin"), Object::Reference(spec_id)],
                },
            },
        );
    doc.save(path).expect("Failed to write sample PDF");
}

fn sample_document(page_count: u32, padding: usize) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids: Vec<Object> = Vec::new();

    for n in 1..=page_count {
        let mut content = format!("% page {n}\n%").into_bytes();
        content.extend(std::iter::repeat(b'x').take(padding));
        content.push(b'\n');
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ],
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

/// Page markers of a PDF on disk, in page order.
pub fn page_markers(path: &Path) -> Vec<u32> {
    let doc = Document::load(path).expect("Failed to load PDF");
    doc.get_pages()
        .values()
        .map(|id| {
            let content = doc.get_page_content(*id).expect("Missing page content");
            let text = String::from_utf8_lossy(&content);
            let first = text.lines().next().unwrap_or_default();
            first
                .trim_start_matches("% page ")
                .trim()
                .parse()
                .expect("Malformed page marker")
        })
        .collect()
}

pub fn dir_entries(dir: &Path) -> Vec<PathBuf> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)
        .expect("Failed to read directory")
        .map(|entry| entry.unwrap().path())
        .collect();
    entries.sort();
    entries
}

static SPAWN_LOCK: Mutex<()> = Mutex::new(());

/// Held while writing engine scripts and while spawning children. A script
/// still open for writing in one thread while another thread forks fails to
/// exec with "text file busy".
pub fn spawn_lock() -> MutexGuard<'static, ()> {
    SPAWN_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Install an executable shell script standing in for Ghostscript.
#[cfg(unix)]
pub fn fake_engine(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    let _guard = spawn_lock();
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("Failed to write engine script");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
        .expect("Failed to mark engine script executable");
    path
}

/// An engine that records its arguments to `log` and copies its input
/// (the last argument) to the `-sOutputFile=` target.
#[cfg(unix)]
pub fn copying_engine(dir: &Path, log: &Path) -> PathBuf {
    let body = format!(
        r#"out=""
last=""
for arg in "$@"; do
  printf '%s\n' "$arg" >> "{log}"
  case "$arg" in
    -sOutputFile=*) out="${{arg#-sOutputFile=}}" ;;
  esac
  last="$arg"
done
cp "$last" "$out""#,
        log = log.display()
    );
    fake_engine(dir, "fake-gs", &body)
}

/// An engine that reports an error and exits non-zero.
#[cfg(unix)]
pub fn failing_engine(dir: &Path) -> PathBuf {
    fake_engine(
        dir,
        "broken-gs",
        "echo 'Unrecoverable error, exit code 1' >&2\nexit 1",
    )
}
