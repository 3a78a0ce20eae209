//! Tests for archive batch conversion
//!
//! Archives are assembled in memory with the zip writer and converted into a
//! temporary directory.

use std::fs;
use std::io::{Cursor, Write};
use tempfile::tempdir;
use tex2png::{
    convert_file, BatchConverter, BatchOptions, EntryOutcome, Header, PixelFormat, PvrtcDecoder,
};
use zip::write::SimpleFileOptions;

fn rgba16_container(width: u16) -> Vec<u8> {
    let mut data = Header::new(width, 8, PixelFormat::Rgba16)
        .to_bytes()
        .unwrap()
        .to_vec();
    data.extend(std::iter::repeat(0xF0).take(width as usize * 8 * 2));
    data
}

fn build_archive(entries: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    writer.add_directory("Payload/Game.app/", options).unwrap();
    for (name, data) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

#[test]
fn test_archive_conversion() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let archive_path = dir.path().join("Game.ipa");
    fs::write(
        &archive_path,
        build_archive(&[
            ("Payload/Game.app/icon.tex", rgba16_container(2)),
            ("Payload/Game.app/Title.TEX", rgba16_container(4)),
            ("Payload/Game.app/readme.txt", b"not a texture".to_vec()),
            ("Payload/Game.app/broken.tex", b"TEX garbage".to_vec()),
        ]),
    )?;

    assert_eq!(BatchConverter::count_textures(&archive_path)?, 3);

    let decoder = PvrtcDecoder::new();
    let converter = BatchConverter::new(BatchOptions::new(), &decoder);
    let mut seen = Vec::new();
    let report = converter.convert_archive(&archive_path, |entry| seen.push(entry.name.clone()))?;

    assert_eq!(report.converted(), 2);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.skipped(), 0);
    assert_eq!(seen.len(), 3);

    let app_dir = dir.path().join("Payload").join("Game.app");
    assert!(app_dir.join("icon.png").exists());
    assert!(app_dir.join("Title.png").exists());
    assert!(!app_dir.join("readme.png").exists());
    assert!(!app_dir.join("broken.png").exists());

    let broken = report
        .entries
        .iter()
        .find(|e| e.name.ends_with("broken.tex"))
        .unwrap();
    assert!(matches!(broken.outcome, EntryOutcome::Failed { .. }));

    Ok(())
}

#[test]
fn test_existing_outputs() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let out_dir = dir.path().join("out");
    let png_path = out_dir.join("a.png");
    let archive = build_archive(&[("a.tex", rgba16_container(1))]);

    let decoder = PvrtcDecoder::new();
    let converter = BatchConverter::new(BatchOptions::new(), &decoder);
    let first = converter.convert_reader(Cursor::new(archive.clone()), &out_dir, |_| {})?;
    assert_eq!(first.converted(), 1);
    let png = fs::read(&png_path)?;

    // Reruns overwrite by default
    fs::write(&png_path, b"stale")?;
    let second = converter.convert_reader(Cursor::new(archive.clone()), &out_dir, |_| {})?;
    assert_eq!(second.converted(), 1);
    assert_eq!(fs::read(&png_path)?, png);

    fs::write(&png_path, b"stale")?;
    let keeping = BatchConverter::new(BatchOptions::new().with_skip_existing(true), &decoder);
    let third = keeping.convert_reader(Cursor::new(archive), &out_dir, |_| {})?;
    assert_eq!(third.skipped(), 1);
    assert_eq!(fs::read(&png_path)?, b"stale");

    Ok(())
}

#[test]
fn test_count_matches_reported_entries() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let archive_path = dir.path().join("Game.ipa");
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    writer.add_directory("assets.tex/", options)?;
    writer.start_file("assets.tex/a.tex", options)?;
    writer.write_all(&rgba16_container(1))?;
    writer.start_file("notes.txt", options)?;
    writer.write_all(b"hello")?;
    writer.start_file("bad.tex", options)?;
    writer.write_all(b"nope")?;
    fs::write(&archive_path, writer.finish()?.into_inner())?;

    let total = BatchConverter::count_textures(&archive_path)?;
    let decoder = PvrtcDecoder::new();
    let converter = BatchConverter::new(BatchOptions::new(), &decoder);
    let mut callbacks = 0;
    let report = converter.convert_archive(&archive_path, |_| callbacks += 1)?;

    assert_eq!(total, 2);
    assert_eq!(callbacks, total);
    assert_eq!(report.entries.len(), total);
    assert_eq!(report.converted(), 1);
    assert_eq!(report.failed(), 1);
    Ok(())
}

#[test]
fn test_output_dir_option() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let archive_path = dir.path().join("Game.ipa");
    let out_dir = dir.path().join("exported");
    fs::write(
        &archive_path,
        build_archive(&[("textures/a.tex", rgba16_container(1))]),
    )?;

    let decoder = PvrtcDecoder::new();
    let converter = BatchConverter::new(BatchOptions::new().with_output_dir(&out_dir), &decoder);
    let report = converter.convert_archive(&archive_path, |_| {})?;

    assert_eq!(report.converted(), 1);
    assert!(out_dir.join("textures").join("a.png").exists());
    Ok(())
}

#[test]
fn test_not_an_archive() {
    let decoder = PvrtcDecoder::new();
    let converter = BatchConverter::new(BatchOptions::new(), &decoder);
    let dir = tempdir().unwrap();
    let result = converter.convert_reader(Cursor::new(b"plain bytes".to_vec()), dir.path(), |_| {});
    assert!(result.is_err());
}

#[test]
fn test_convert_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("single.tex");
    let output = dir.path().join("png").join("single.png");
    fs::write(&input, rgba16_container(3))?;

    let header = convert_file(&input, &output, &PvrtcDecoder::new())?;
    assert_eq!(header, Header::new(3, 8, PixelFormat::Rgba16));
    assert!(output.exists());

    let png = fs::read(&output)?;
    assert_eq!(&png[1..4], b"PNG");
    Ok(())
}
