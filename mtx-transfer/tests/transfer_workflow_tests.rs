//! End-to-end transfer runs against temporary library/destination trees
//!
//! The external encoder is replaced by a recording fake so the tests do not
//! depend on ffmpeg being installed.

use mtx_common::config::TransferConfig;
use mtx_transfer::services::{Codec, CodecError, FixedAnswer, RemovalConfirmer};
use mtx_transfer::{
    Preparation, TransferError, TransferOutcome, TransferRequest, TransferWorkflow,
};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Records conversions and writes a marker instead of encoding
#[derive(Default)]
struct RecordingCodec {
    calls: Mutex<Vec<PathBuf>>,
}

impl RecordingCodec {
    fn calls(&self) -> Vec<PathBuf> {
        let mut calls = self.calls.lock().unwrap().clone();
        calls.sort();
        calls
    }
}

impl Codec for RecordingCodec {
    fn convert(&self, input: &Path, output: &Path) -> Result<(), CodecError> {
        self.calls.lock().unwrap().push(input.to_path_buf());
        fs::write(output, b"encoded mp3")?;
        Ok(())
    }
}

/// Fails the test if asked for confirmation
struct NeverAsked;

impl RemovalConfirmer for NeverAsked {
    fn confirm(&mut self, candidates: &[PathBuf]) -> io::Result<bool> {
        panic!("Unexpected confirmation request for {:?}", candidates);
    }
}

/// Library fixture:
///
/// ```text
/// lib/
/// ├── A/
/// │   └── song.flac
/// ├── B/
/// │   ├── x.mp3
/// │   └── cover.jpg
/// └── unlisted.flac
/// ```
struct Fixture {
    _temp_dir: TempDir,
    lib: PathBuf,
    dest: PathBuf,
    manifest: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let lib = root.join("lib");
        let dest = root.join("dest");

        fs::create_dir_all(lib.join("A")).unwrap();
        fs::create_dir_all(lib.join("B")).unwrap();
        fs::write(lib.join("A/song.flac"), b"fLaC source").unwrap();
        fs::write(lib.join("B/x.mp3"), b"ID3 original bytes").unwrap();
        fs::write(lib.join("B/cover.jpg"), b"jpeg").unwrap();
        fs::write(lib.join("unlisted.flac"), b"fLaC").unwrap();

        let manifest = root.join("paths.txt");
        fs::write(
            &manifest,
            format!("{}\n\n{}\n", lib.join("A/song.flac").display(), lib.join("B").display()),
        )
        .unwrap();

        Self {
            _temp_dir: temp_dir,
            lib,
            dest,
            manifest,
        }
    }

    fn request(&self) -> TransferRequest {
        TransferRequest {
            manifest: self.manifest.clone(),
            destination: self.dest.clone(),
        }
    }
}

fn workflow(codec: Arc<RecordingCodec>) -> TransferWorkflow {
    let config = TransferConfig {
        workers: Some(2),
        ..TransferConfig::default()
    };
    TransferWorkflow::new(config, codec)
}

#[tokio::test]
async fn test_fresh_destination_transfers_everything() {
    let fixture = Fixture::new();
    let codec = Arc::new(RecordingCodec::default());

    let outcome = workflow(codec.clone())
        .run(&fixture.request(), &mut NeverAsked)
        .await
        .unwrap();

    let TransferOutcome::Completed(report) = outcome else {
        panic!("Expected a completed run");
    };

    // Ancestor is lib/, so the A/ and B/ layout is kept under dest/
    assert_eq!(codec.calls(), vec![fixture.lib.join("A/song.flac")]);
    assert_eq!(report.converted, vec![fixture.dest.join("A/song.mp3")]);
    assert_eq!(report.copied, vec![fixture.dest.join("B/x.mp3")]);
    assert!(report.failed.is_empty());
    assert_eq!(report.removal.candidates, 0);

    assert_eq!(fs::read(fixture.dest.join("A/song.mp3")).unwrap(), b"encoded mp3");
    assert_eq!(
        fs::read(fixture.dest.join("B/x.mp3")).unwrap(),
        b"ID3 original bytes"
    );
    assert!(!fixture.dest.join("B/cover.mp3").exists());
    assert!(!fixture.dest.join("unlisted.mp3").exists());
}

#[tokio::test]
async fn test_matching_destination_file_is_skipped() {
    let fixture = Fixture::new();
    fs::create_dir_all(fixture.dest.join("Old Place")).unwrap();
    fs::write(fixture.dest.join("Old Place/song.mp3"), b"previous run").unwrap();
    let codec = Arc::new(RecordingCodec::default());

    let outcome = workflow(codec.clone())
        .run(&fixture.request(), &mut NeverAsked)
        .await
        .unwrap();

    let TransferOutcome::Completed(report) = outcome else {
        panic!("Expected a completed run");
    };

    // song.mp3 is neither transferred nor offered for removal
    assert!(codec.calls().is_empty());
    assert!(report.converted.is_empty());
    assert_eq!(report.copied, vec![fixture.dest.join("B/x.mp3")]);
    assert_eq!(report.removal.candidates, 0);
    assert_eq!(
        fs::read(fixture.dest.join("Old Place/song.mp3")).unwrap(),
        b"previous run"
    );
}

#[tokio::test]
async fn test_declined_removal_keeps_orphan_and_still_transfers() {
    let fixture = Fixture::new();
    fs::create_dir_all(&fixture.dest).unwrap();
    fs::write(fixture.dest.join("orphan.mp3"), b"old").unwrap();
    let codec = Arc::new(RecordingCodec::default());

    let outcome = workflow(codec)
        .run(&fixture.request(), &mut FixedAnswer(false))
        .await
        .unwrap();

    let TransferOutcome::Completed(report) = outcome else {
        panic!("Expected a completed run");
    };

    assert!(fixture.dest.join("orphan.mp3").exists());
    assert_eq!(report.removal.candidates, 1);
    assert!(!report.removal.confirmed);
    assert!(report.removal.removed.is_empty());
    assert_eq!(report.transferred(), 2);
}

#[tokio::test]
async fn test_confirmed_removal_deletes_orphan() {
    let fixture = Fixture::new();
    fs::create_dir_all(&fixture.dest).unwrap();
    let orphan = fixture.dest.join("orphan.mp3");
    fs::write(&orphan, b"old").unwrap();
    fs::write(fixture.dest.join("notes.txt"), b"not audio").unwrap();
    let codec = Arc::new(RecordingCodec::default());

    let outcome = workflow(codec)
        .run(&fixture.request(), &mut FixedAnswer(true))
        .await
        .unwrap();

    let TransferOutcome::Completed(report) = outcome else {
        panic!("Expected a completed run");
    };

    assert!(!orphan.exists());
    assert!(fixture.dest.join("notes.txt").exists());
    assert_eq!(report.removal.removed, vec![orphan]);
    assert_eq!(report.transferred(), 2);
}

#[tokio::test]
async fn test_second_run_finds_everything_present() {
    let fixture = Fixture::new();
    let codec = Arc::new(RecordingCodec::default());
    let workflow = workflow(codec.clone());

    workflow
        .run(&fixture.request(), &mut NeverAsked)
        .await
        .unwrap();

    let outcome = workflow
        .run(&fixture.request(), &mut NeverAsked)
        .await
        .unwrap();

    assert!(matches!(
        outcome,
        TransferOutcome::AllPresent { already_present: 2 }
    ));
    assert_eq!(codec.calls().len(), 1);
}

#[tokio::test]
async fn test_normalised_names_match_on_rerun() {
    let fixture = Fixture::new();
    fs::write(fixture.lib.join("B/Am I Awake?.flac"), b"fLaC").unwrap();
    let codec = Arc::new(RecordingCodec::default());
    let workflow = workflow(codec);

    let first = workflow
        .run(&fixture.request(), &mut NeverAsked)
        .await
        .unwrap();
    assert!(matches!(first, TransferOutcome::Completed(_)));
    assert!(fixture.dest.join("B/Am I Awake-.mp3").exists());

    let second = workflow
        .run(&fixture.request(), &mut NeverAsked)
        .await
        .unwrap();
    assert!(matches!(second, TransferOutcome::AllPresent { .. }));
}

#[tokio::test]
async fn test_prepare_plans_without_writing() {
    let fixture = Fixture::new();
    let codec = Arc::new(RecordingCodec::default());
    let workflow = workflow(codec.clone());

    let Preparation::Ready(prepared) = workflow
        .prepare(&fixture.request(), &mut NeverAsked)
        .unwrap()
    else {
        panic!("Expected a planned transfer");
    };

    assert_eq!(prepared.plan().len(), 2);
    assert_eq!(prepared.plan().conversions(), 1);
    assert!(!fixture.dest.exists());
    assert!(codec.calls().is_empty());

    let TransferOutcome::Completed(report) = workflow.execute(prepared).await else {
        panic!("Expected a completed run");
    };
    assert_eq!(report.transferred(), 2);
}

#[tokio::test]
async fn test_sources_sharing_a_destination_transfer_once() {
    let fixture = Fixture::new();
    fs::write(fixture.lib.join("A/song.mp3"), b"ID3 song").unwrap();
    fs::write(
        &fixture.manifest,
        format!("{}\n", fixture.lib.join("A").display()),
    )
    .unwrap();
    let codec = Arc::new(RecordingCodec::default());

    let outcome = workflow(codec.clone())
        .run(&fixture.request(), &mut NeverAsked)
        .await
        .unwrap();

    let TransferOutcome::Completed(report) = outcome else {
        panic!("Expected a completed run");
    };

    // Ancestor is lib/A/; song.flac sorts first and claims song.mp3
    assert_eq!(codec.calls(), vec![fixture.lib.join("A/song.flac")]);
    assert_eq!(report.converted, vec![fixture.dest.join("song.mp3")]);
    assert!(report.copied.is_empty());
    assert_eq!(report.transferred(), 1);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].source, fixture.lib.join("A/song.mp3"));
    assert!(report.failed[0].reason.contains("collides"));
    assert_eq!(fs::read(fixture.dest.join("song.mp3")).unwrap(), b"encoded mp3");
}

#[tokio::test]
async fn test_no_source_files() {
    let fixture = Fixture::new();
    fs::write(&fixture.manifest, format!("{}\n", fixture.lib.join("B/cover.jpg").display())).unwrap();
    let codec = Arc::new(RecordingCodec::default());

    let outcome = workflow(codec)
        .run(&fixture.request(), &mut NeverAsked)
        .await
        .unwrap();

    assert!(matches!(outcome, TransferOutcome::NoSourceFiles));
    assert!(!fixture.dest.exists());
}

#[tokio::test]
async fn test_missing_source_path_is_fatal() {
    let fixture = Fixture::new();
    let missing = fixture.lib.join("Vanished");
    fs::write(&fixture.manifest, format!("{}\n", missing.display())).unwrap();
    let codec = Arc::new(RecordingCodec::default());

    let err = workflow(codec)
        .run(&fixture.request(), &mut NeverAsked)
        .await
        .unwrap_err();

    match &err {
        TransferError::SourcePathNotFound(path) => assert_eq!(path, &missing),
        other => panic!("Expected SourcePathNotFound, got {:?}", other),
    }
    assert_eq!(err.exit_code(), 3);
    assert!(!fixture.dest.exists());
}

#[tokio::test]
async fn test_missing_manifest_is_fatal() {
    let fixture = Fixture::new();
    let request = TransferRequest {
        manifest: fixture.lib.join("no-such-paths.txt"),
        destination: fixture.dest.clone(),
    };
    let codec = Arc::new(RecordingCodec::default());

    let err = workflow(codec)
        .run(&request, &mut NeverAsked)
        .await
        .unwrap_err();
    assert_eq!(err.exit_code(), 2);
}
