use dmex_core::NoteSource;
use dmex_notes::{FALLBACK_NOTE, FileNoteReader, NoteError};
use std::path::PathBuf;

struct TempDir(PathBuf);

impl TempDir {
    fn new() -> Self {
        let dir = std::env::temp_dir().join(format!("dmex_notes_{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap_or_else(|e| panic!("temp dir: {e}"));
        Self(dir)
    }

    fn write(&self, name: &str, content: impl AsRef<[u8]>) -> PathBuf {
        let path = self.0.join(name);
        std::fs::write(&path, content).unwrap_or_else(|e| panic!("write {name}: {e}"));
        path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

#[tokio::test]
async fn reads_plain_text_note() {
    let dir = TempDir::new();
    let path = dir.write("note.txt", "Patient needs a wheelchair. Dr. Wilson");

    let note = FileNoteReader::new(&path).read().await;
    assert_eq!(note.ok().as_deref(), Some("Patient needs a wheelchair. Dr. Wilson"));
}

#[tokio::test]
async fn unwraps_json_note() {
    let dir = TempDir::new();
    let path = dir.write(
        "note.json",
        r#"{"data": "Patient requires oxygen 2 L during sleep. Dr. Cuddy"}"#,
    );

    let note = FileNoteReader::new(&path).read_note().await;
    assert_eq!(
        note.ok().as_deref(),
        Some("Patient requires oxygen 2 L during sleep. Dr. Cuddy")
    );
}

#[tokio::test]
async fn missing_file_uses_fallback() {
    let dir = TempDir::new();
    let reader = FileNoteReader::new(dir.0.join("absent.txt"));

    assert_eq!(reader.read().await.ok().as_deref(), Some(FALLBACK_NOTE));
}

#[tokio::test]
async fn blank_file_uses_custom_fallback() {
    let dir = TempDir::new();
    let path = dir.write("blank.txt", "  \n\t\n");
    let reader = FileNoteReader::new(&path).with_fallback("Wheelchair. Dr. Grey");

    assert_eq!(reader.read().await.ok().as_deref(), Some("Wheelchair. Dr. Grey"));
}

#[tokio::test]
async fn non_utf8_file_uses_fallback() {
    let dir = TempDir::new();
    let path = dir.write("binary.txt", [0xff_u8, 0xfe, 0x00, 0x43]);

    let note = FileNoteReader::new(&path).read().await;
    assert_eq!(note.ok().as_deref(), Some(FALLBACK_NOTE));
}

#[tokio::test]
async fn directory_path_is_an_io_error() {
    let dir = TempDir::new();

    let err = FileNoteReader::new(&dir.0).read().await.err();
    assert!(
        matches!(err, Some(NoteError::Io { .. } | NoteError::AccessDenied { .. })),
        "expected a read error, got {err:?}"
    );
}
