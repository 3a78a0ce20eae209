//! File and archive conversion drivers
//!
//! [`convert_file`] handles a single `.tex` file. [`BatchConverter`] walks a
//! zip archive (such as an `.ipa` application bundle), converting every
//! `.tex` entry to a PNG. A failing entry is recorded and the walk continues.

use crate::header::Header;
use crate::pvrtc::BlockDecompressor;
use crate::{PixelFormat, Result, Texture};
use log::{debug, info, warn};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};

/// Extension of texture containers, matched case-insensitively
pub const TEXTURE_EXTENSION: &str = "tex";

/// Extension of archives processed in batch mode, matched case-insensitively
pub const ARCHIVE_EXTENSION: &str = "ipa";

/// Whether `path` names a texture container
pub fn is_texture_path<P: AsRef<Path>>(path: P) -> bool {
    has_extension(path.as_ref(), TEXTURE_EXTENSION)
}

/// Whether `path` names an archive for batch conversion
pub fn is_archive_path<P: AsRef<Path>>(path: P) -> bool {
    has_extension(path.as_ref(), ARCHIVE_EXTENSION)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

/// Decode `input` and write it as a PNG to `output`
///
/// Returns the header of the source texture.
pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    decompressor: &dyn BlockDecompressor,
) -> Result<Header> {
    let mut reader = BufReader::new(File::open(input.as_ref())?);
    let texture = Texture::read_from(&mut reader)?;
    let header = *texture.header();
    texture.save_png(output.as_ref(), decompressor)?;
    Ok(header)
}

/// Archive entries that name a texture, in archive order
fn texture_entry_names<R: Read + Seek>(archive: &zip::ZipArchive<R>) -> Vec<String> {
    archive
        .file_names()
        .filter(|name| !name.ends_with('/') && is_texture_path(name))
        .map(str::to_string)
        .collect()
}

/// Settings for archive conversion
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    output_dir: Option<PathBuf>,
    skip_existing: bool,
}

impl BatchOptions {
    /// Create options with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Write PNGs under `dir` instead of the archive's directory
    pub fn with_output_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Leave existing PNG files in place instead of overwriting them
    pub fn with_skip_existing(mut self, skip_existing: bool) -> Self {
        self.skip_existing = skip_existing;
        self
    }

    /// Output directory override, if any
    pub fn output_dir(&self) -> Option<&Path> {
        self.output_dir.as_deref()
    }

    /// Whether existing outputs are left untouched
    pub fn skip_existing(&self) -> bool {
        self.skip_existing
    }
}

/// Result of processing one archive entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    /// PNG written
    Converted {
        /// Output path
        output: PathBuf,
        /// Texture width
        width: u16,
        /// Texture height
        height: u16,
        /// Source pixel format
        format: PixelFormat,
    },
    /// Entry not converted
    Skipped {
        /// Why the entry was skipped
        reason: String,
    },
    /// Decoding or writing failed
    Failed {
        /// Error description
        error: String,
    },
}

/// Outcome for a named archive entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryReport {
    /// Entry path inside the archive
    pub name: String,
    /// What happened to it
    pub outcome: EntryOutcome,
}

/// Summary of an archive conversion
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Per-entry outcomes in archive order
    pub entries: Vec<EntryReport>,
}

impl BatchReport {
    /// Number of textures written
    pub fn converted(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::Converted { .. }))
    }

    /// Number of textures skipped
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::Skipped { .. }))
    }

    /// Number of textures that failed
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::Failed { .. }))
    }

    fn count(&self, predicate: impl Fn(&EntryOutcome) -> bool) -> usize {
        self.entries.iter().filter(|e| predicate(&e.outcome)).count()
    }
}

/// Converts the textures stored in a zip archive
pub struct BatchConverter<'d> {
    options: BatchOptions,
    decompressor: &'d dyn BlockDecompressor,
}

impl std::fmt::Debug for BatchConverter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchConverter")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<'d> BatchConverter<'d> {
    /// Create a converter using `decompressor` for compressed textures
    pub fn new(options: BatchOptions, decompressor: &'d dyn BlockDecompressor) -> Self {
        Self {
            options,
            decompressor,
        }
    }

    /// Count the texture entries in an archive file
    pub fn count_textures<P: AsRef<Path>>(archive_path: P) -> Result<usize> {
        let archive = zip::ZipArchive::new(BufReader::new(File::open(archive_path)?))?;
        Ok(texture_entry_names(&archive).len())
    }

    /// Convert every texture in the archive at `archive_path`
    ///
    /// Outputs go to the configured output directory, or next to the archive.
    /// `on_entry` is called after each texture entry is processed.
    pub fn convert_archive<P, F>(&self, archive_path: P, on_entry: F) -> Result<BatchReport>
    where
        P: AsRef<Path>,
        F: FnMut(&EntryReport),
    {
        let archive_path = archive_path.as_ref();
        let output_dir = match self.options.output_dir() {
            Some(dir) => dir.to_path_buf(),
            None => archive_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
        };

        info!(
            "Converting textures in '{}' into '{}'",
            archive_path.display(),
            output_dir.display()
        );

        let reader = BufReader::new(File::open(archive_path)?);
        self.convert_reader(reader, &output_dir, on_entry)
    }

    /// Convert every texture in a zip archive read from `reader`
    pub fn convert_reader<R, F>(
        &self,
        reader: R,
        output_dir: &Path,
        mut on_entry: F,
    ) -> Result<BatchReport>
    where
        R: Read + Seek,
        F: FnMut(&EntryReport),
    {
        let mut archive = zip::ZipArchive::new(reader)?;
        let mut report = BatchReport::default();

        for name in texture_entry_names(&archive) {
            let outcome = match archive.by_name(&name) {
                Err(e) => EntryOutcome::Failed {
                    error: e.to_string(),
                },
                Ok(mut entry) => match entry.enclosed_name() {
                    None => EntryOutcome::Skipped {
                        reason: "unsafe path".to_string(),
                    },
                    Some(relative) => {
                        let output = output_dir.join(relative).with_extension("png");
                        if output.exists() && self.options.skip_existing() {
                            EntryOutcome::Skipped {
                                reason: format!("'{}' already exists", output.display()),
                            }
                        } else {
                            self.convert_entry(&mut entry, output)
                        }
                    }
                },
            };

            match &outcome {
                EntryOutcome::Converted { output, .. } => {
                    info!("{name} -> {}", output.display())
                }
                EntryOutcome::Skipped { reason } => debug!("Skipping {name}: {reason}"),
                EntryOutcome::Failed { error } => warn!("Failed to convert {name}: {error}"),
            }

            let entry = EntryReport { name, outcome };
            on_entry(&entry);
            report.entries.push(entry);
        }

        Ok(report)
    }

    fn convert_entry<R: Read>(&self, entry: &mut R, output: PathBuf) -> EntryOutcome {
        let result = Texture::read_from(entry).and_then(|texture| {
            let header = *texture.header();
            texture.save_png(&output, self.decompressor)?;
            Ok(header)
        });

        match result {
            Ok(header) => EntryOutcome::Converted {
                output,
                width: header.width,
                height: header.height,
                format: header.format,
            },
            Err(e) => EntryOutcome::Failed {
                error: e.to_string(),
            },
        }
    }
}
