//! Per-entry translation pipeline over a PPTX archive.
//!
//! Each entry goes through Skip, or Extract then Translate then Rewrite, with
//! Passthrough whenever there is nothing to change. Entries are handled one at
//! a time, in the archive's own order, and share no state.

use crate::filter::EntryFilter;
use deck_core::{
    BatchTranslator, Error, FragmentExtractor, PayloadRewriter, Result, TranslationClient,
    TranslationConfig,
};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use zip::read::ZipFile;
use zip::write::FileOptions;
use zip::{ZipArchive, ZipWriter};

/// Why an eligible entry was emitted unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassthroughReason {
    /// The payload contains no text runs.
    NoFragments,
    /// The payload is not valid UTF-8.
    NotUtf8,
}

/// What the pipeline decided for one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    /// The entry is not eligible for translation.
    Skipped,
    /// The entry is eligible but is emitted unchanged.
    Passthrough(PassthroughReason),
    /// The entry was rewritten.
    Rewritten {
        /// New entry contents.
        data: Vec<u8>,
        /// Number of fragments sent for translation.
        fragments: usize,
        /// Whether the model's answer was discarded in favour of the originals.
        fallback: bool,
    },
}

/// Counters for one archive run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineReport {
    /// Entries seen.
    pub entries: usize,
    /// Entries not eligible for translation.
    pub skipped: usize,
    /// Eligible entries emitted unchanged.
    pub passthrough: usize,
    /// Entries rewritten.
    pub rewritten: usize,
    /// Fragments sent to the model across all entries.
    pub fragments: usize,
    /// Rewritten entries whose translation fell back to the originals.
    pub fallbacks: usize,
}

impl PipelineReport {
    fn record(&mut self, outcome: &EntryOutcome) {
        self.entries += 1;
        match outcome {
            EntryOutcome::Skipped => self.skipped += 1,
            EntryOutcome::Passthrough(_) => self.passthrough += 1,
            EntryOutcome::Rewritten {
                fragments,
                fallback,
                ..
            } => {
                self.rewritten += 1;
                self.fragments += fragments;
                if *fallback {
                    self.fallbacks += 1;
                }
            }
        }
    }
}

/// Translates the eligible entries of a presentation archive.
pub struct DocumentPipeline<C> {
    client: C,
    translator: BatchTranslator,
    extractor: FragmentExtractor,
    rewriter: PayloadRewriter,
    filter: EntryFilter,
}

impl<C: TranslationClient> DocumentPipeline<C> {
    /// Create a pipeline that sends its requests through `client`.
    pub fn new(client: C, config: TranslationConfig) -> Self {
        Self {
            client,
            extractor: FragmentExtractor::new(config.tag().clone()),
            rewriter: PayloadRewriter::new(config.tag().clone()),
            translator: BatchTranslator::new(config),
            filter: EntryFilter::default(),
        }
    }

    /// Replace the eligible-entry predicate.
    pub fn with_filter(mut self, filter: EntryFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Translate the archive at `input` into a new archive at `output`.
    ///
    /// The archive is written to a temporary file beside `output` and only
    /// moved into place once every entry succeeded, so a failed run leaves no
    /// partial output behind.
    pub fn translate_file(&self, input: &Path, output: &Path) -> Result<PipelineReport> {
        log::info!("Processing: {}", input.display());

        if output.exists() && same_file(input, output)? {
            return Err(Error::ConfigError(format!(
                "Output would overwrite input: {}",
                output.display()
            )));
        }

        let reader = BufReader::new(File::open(input)?);
        let dir = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let staged = NamedTempFile::new_in(dir)?;
        let report = self.translate_archive(reader, BufWriter::new(staged.as_file()))?;
        staged
            .persist(output)
            .map_err(|e| Error::IoError(e.error))?;

        log::info!("Done! Output: {}", output.display());
        Ok(report)
    }

    /// Translate a ZIP archive from `reader` into `writer`.
    ///
    /// Entry order and per-entry metadata are preserved. Unchanged entries are
    /// copied raw, without recompression.
    pub fn translate_archive<R, W>(&self, reader: R, writer: W) -> Result<PipelineReport>
    where
        R: Read + Seek,
        W: Write + Seek,
    {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;
        let mut zip_out = ZipWriter::new(writer);
        let mut report = PipelineReport::default();

        for index in 0..archive.len() {
            let name = archive
                .by_index_raw(index)
                .map_err(|e| Error::ZipError(format!("Failed to read entry {}: {}", index, e)))?
                .name()
                .to_string();

            let outcome = if self.filter.is_eligible(&name) {
                let data = read_entry(&mut archive, index, &name)?;
                self.process_entry(&name, &data)?
            } else {
                EntryOutcome::Skipped
            };

            match &outcome {
                EntryOutcome::Rewritten { data, .. } => {
                    let options = {
                        let file = archive.by_index_raw(index).map_err(|e| {
                            Error::ZipError(format!("Failed to read '{}': {}", name, e))
                        })?;
                        entry_options(&file, data.len())
                    };
                    zip_out
                        .start_file(name.as_str(), options)
                        .map_err(|e| Error::ZipError(format!("Failed to write '{}': {}", name, e)))?;
                    zip_out.write_all(data)?;
                }
                EntryOutcome::Skipped | EntryOutcome::Passthrough(_) => {
                    let file = archive
                        .by_index_raw(index)
                        .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", name, e)))?;
                    zip_out
                        .raw_copy_file(file)
                        .map_err(|e| Error::ZipError(format!("Failed to copy '{}': {}", name, e)))?;
                }
            }

            report.record(&outcome);
        }

        let mut writer = zip_out
            .finish()
            .map_err(|e| Error::ZipError(format!("Failed to finish ZIP: {}", e)))?;
        writer.flush()?;

        log::debug!(
            "{} entries: {} rewritten, {} unchanged, {} skipped, {} fallbacks",
            report.entries,
            report.rewritten,
            report.passthrough,
            report.skipped,
            report.fallbacks
        );
        Ok(report)
    }

    /// Run one entry through the state machine.
    ///
    /// Only transport failures are returned as errors; every other problem
    /// leaves the entry unchanged.
    pub fn process_entry(&self, name: &str, data: &[u8]) -> Result<EntryOutcome> {
        if !self.filter.is_eligible(name) {
            return Ok(EntryOutcome::Skipped);
        }

        log::info!("  Translating {}...", display_stem(name));

        let payload = match std::str::from_utf8(data) {
            Ok(payload) => payload,
            Err(e) => {
                log::warn!("Skipping {}: not valid UTF-8 ({})", name, e);
                return Ok(EntryOutcome::Passthrough(PassthroughReason::NotUtf8));
            }
        };

        let fragments = self.extractor.extract(payload);
        log::debug!("    Found {} text elements", fragments.len());
        if fragments.is_empty() {
            return Ok(EntryOutcome::Passthrough(PassthroughReason::NoFragments));
        }

        let reconciliation = self.translator.translate(&self.client, &fragments)?;
        let data = self.rewriter.rewrite(payload, &reconciliation.result);

        Ok(EntryOutcome::Rewritten {
            data,
            fragments: fragments.len(),
            fallback: reconciliation.is_fallback(),
        })
    }
}

/// Read the decompressed contents of entry `index`.
fn read_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    index: usize,
    name: &str,
) -> Result<Vec<u8>> {
    let mut file = archive
        .by_index(index)
        .map_err(|e| Error::ZipError(format!("Failed to open '{}': {}", name, e)))?;

    // The header's size is untrusted; let the buffer grow with the real data.
    let mut data = Vec::new();
    file.read_to_end(&mut data)
        .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", name, e)))?;

    Ok(data)
}

/// Write options that carry over the original entry's metadata.
fn entry_options(file: &ZipFile<'_>, len: usize) -> FileOptions {
    let mut options = FileOptions::default()
        .compression_method(file.compression())
        .last_modified_time(file.last_modified())
        .large_file(len as u64 >= u32::MAX as u64);

    if let Some(mode) = file.unix_mode() {
        options = options.unix_permissions(mode);
    }

    options
}

/// `ppt/slides/slide1.xml` -> `slide1`
fn display_stem(name: &str) -> &str {
    let base = name.rsplit('/').next().unwrap_or(name);
    base.strip_suffix(".xml").unwrap_or(base)
}

fn same_file(a: &Path, b: &Path) -> Result<bool> {
    Ok(a.canonicalize()? == b.canonicalize()?)
}
