//! GE-006: Model bundle construction.
//!
//! Produces, inside a scratch directory:
//! 1. `<tag>.model.params`: byte copy of the user's model file
//! 2. `<tag>.model.opts`: one-line options descriptor
//! 3. `<tag>.model`: stored zip holding (1) then (2), by bare file name

use super::digest;
use super::error::{EvalError, EvalResult};
use super::types::{ModelBundle, ModelOptions};
use serde::Serialize;
use std::fs::File;
use std::io;
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// JSON formatter with `", "` and `": "` separators.
///
/// The planner's reference tooling writes descriptors in this spacing.
struct SpacedFormatter;

impl serde_json::ser::Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

/// Render the options descriptor: a single JSON line ending in `\n`.
pub fn render_options(options: &ModelOptions) -> EvalResult<Vec<u8>> {
    let mut ser = serde_json::Serializer::with_formatter(Vec::new(), SpacedFormatter);
    options.serialize(&mut ser)?;
    let mut line = ser.into_inner();
    line.push(b'\n');
    Ok(line)
}

/// Copy the model, write the descriptor and zip both under `scratch`.
pub fn build_model_archive(
    scratch: &Path,
    tag: &str,
    model: &Path,
    options: &ModelOptions,
) -> EvalResult<ModelBundle> {
    let bundle = ModelBundle::layout(scratch, tag);

    std::fs::copy(model, &bundle.params).map_err(|e| {
        EvalError::io(
            format!(
                "cannot copy {} to {}",
                model.display(),
                bundle.params.display()
            ),
            e,
        )
    })?;
    let params_hash = digest::verify_copy(model, &bundle.params)?;

    let descriptor = render_options(options)?;
    std::fs::write(&bundle.options, &descriptor)
        .map_err(|e| EvalError::io(format!("cannot write {}", bundle.options.display()), e))?;

    write_archive(&bundle)?;

    tracing::info!(
        archive = %bundle.archive.display(),
        params = %params_hash,
        archive_hash = %digest::hash_file(&bundle.archive)?,
        "model bundle ready"
    );
    Ok(bundle)
}

/// Zip the parameters entry, then the options entry.
fn write_archive(bundle: &ModelBundle) -> EvalResult<()> {
    let file = File::create(&bundle.archive)
        .map_err(|e| EvalError::io(format!("cannot create {}", bundle.archive.display()), e))?;
    let mut zip = ZipWriter::new(file);

    for entry in [&bundle.params, &bundle.options] {
        let name = entry_name(entry)?;
        let size = std::fs::metadata(entry)
            .map_err(|e| EvalError::io(format!("cannot stat {}", entry.display()), e))?
            .len();
        let opts = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Stored)
            .large_file(size > u64::from(u32::MAX));
        zip.start_file(name, opts)?;

        let mut src = File::open(entry)
            .map_err(|e| EvalError::io(format!("cannot open {}", entry.display()), e))?;
        io::copy(&mut src, &mut zip)
            .map_err(|e| EvalError::io(format!("cannot archive {}", entry.display()), e))?;
    }

    zip.finish()?;
    Ok(())
}

fn entry_name(path: &Path) -> EvalResult<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| EvalError::Config(format!("{} has no file name", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Read;

    const OPTIONS_LINE: &str =
        "{\"mode\": \"wlf\", \"policy_type\": \"search\", \"state_representation\": \"downward\"}\n";

    fn read_entries(archive: &Path) -> Vec<(String, Vec<u8>)> {
        let mut zip = zip::ZipArchive::new(File::open(archive).unwrap()).unwrap();
        (0..zip.len())
            .map(|i| {
                let mut f = zip.by_index(i).unwrap();
                let mut buf = Vec::new();
                f.read_to_end(&mut buf).unwrap();
                (f.name().to_string(), buf)
            })
            .collect()
    }

    fn build(model_bytes: &[u8]) -> (tempfile::TempDir, ModelBundle) {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("m.bin");
        std::fs::write(&model, model_bytes).unwrap();
        let scratch = dir.path().join("scratch");
        std::fs::create_dir(&scratch).unwrap();
        let bundle =
            build_model_archive(&scratch, "blocksworld", &model, &ModelOptions::default())
                .unwrap();
        (dir, bundle)
    }

    #[test]
    fn test_ge006_render_options_exact() {
        let line = render_options(&ModelOptions::default()).unwrap();
        assert_eq!(String::from_utf8(line).unwrap(), OPTIONS_LINE);
    }

    #[test]
    fn test_ge006_render_options_is_single_line() {
        let line = render_options(&ModelOptions::default()).unwrap();
        assert_eq!(line.iter().filter(|b| **b == b'\n').count(), 1);
        assert_eq!(line.last(), Some(&b'\n'));
    }

    #[test]
    fn test_ge006_bundle_files_written() {
        let (_dir, bundle) = build(b"\x00\x01weights\xff");
        assert!(bundle.params.ends_with("blocksworld.model.params"));
        assert!(bundle.options.ends_with("blocksworld.model.opts"));
        assert!(bundle.archive.ends_with("blocksworld.model"));
        assert_eq!(std::fs::read(&bundle.params).unwrap(), b"\x00\x01weights\xff");
        assert_eq!(
            std::fs::read_to_string(&bundle.options).unwrap(),
            OPTIONS_LINE
        );
    }

    #[test]
    fn test_ge006_archive_layout() {
        let (_dir, bundle) = build(b"params");
        let entries = read_entries(&bundle.archive);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "blocksworld.model.params");
        assert_eq!(entries[0].1, b"params");
        assert_eq!(entries[1].0, "blocksworld.model.opts");
        assert_eq!(entries[1].1, OPTIONS_LINE.as_bytes());
    }

    #[test]
    fn test_ge006_archive_entries_stored() {
        let (_dir, bundle) = build(b"params");
        let mut zip = zip::ZipArchive::new(File::open(&bundle.archive).unwrap()).unwrap();
        for i in 0..zip.len() {
            assert_eq!(
                zip.by_index(i).unwrap().compression(),
                CompressionMethod::Stored
            );
        }
    }

    #[test]
    fn test_ge006_custom_tag() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("m.bin");
        std::fs::write(&model, "w").unwrap();
        let bundle =
            build_model_archive(dir.path(), "ferry", &model, &ModelOptions::default()).unwrap();
        let names: Vec<_> = read_entries(&bundle.archive)
            .into_iter()
            .map(|(n, _)| n)
            .collect();
        assert_eq!(names, vec!["ferry.model.params", "ferry.model.opts"]);
    }

    #[test]
    fn test_ge006_rebuild_same_entry_contents() {
        let (_d1, b1) = build(b"same weights");
        let (_d2, b2) = build(b"same weights");
        assert_eq!(read_entries(&b1.archive), read_entries(&b2.archive));
    }

    #[test]
    fn test_ge006_missing_model_errors() {
        let dir = tempfile::tempdir().unwrap();
        let result = build_model_archive(
            dir.path(),
            "blocksworld",
            &dir.path().join("absent.bin"),
            &ModelOptions::default(),
        );
        assert!(matches!(result, Err(EvalError::Io { .. })));
        assert!(!dir.path().join("blocksworld.model").exists());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_ge006_params_preserved_options_fixed(
            bytes in proptest::collection::vec(any::<u8>(), 0..4096)
        ) {
            let (_dir, bundle) = build(&bytes);
            let entries = read_entries(&bundle.archive);
            prop_assert_eq!(entries.len(), 2);
            prop_assert_eq!(&entries[0].1, &bytes);
            prop_assert_eq!(entries[1].1.as_slice(), OPTIONS_LINE.as_bytes());
        }
    }
}
