use clap::Parser;
use deident_core::cli::{Cli, OutputFormat};
use deident_core::tags::{self, get_string_value};
use deident_core::{AnonymizationReport, Anonymizer, BatchIdentity, Profile, TextReport, UidRoot};
use dicom_object::{open_file, FileMetaTableBuilder};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::process;

fn main() {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(cli.verbose);

    let uid_root = match cli.uid_root.as_deref() {
        Some(root) => match UidRoot::new(root) {
            Ok(root) => root,
            Err(e) => {
                eprintln!("Error: invalid UID root: {}", e);
                process::exit(1);
            }
        },
        None => UidRoot::default(),
    };

    let anonymizer = match Anonymizer::with_uid_root(Profile::basic(), uid_root) {
        Ok(anonymizer) => anonymizer,
        Err(e) => {
            eprintln!("Error: invalid profile: {}", e);
            process::exit(1);
        }
    };
    info!("Profile loaded with {} rules", anonymizer.profile().len());

    if let Err(e) = std::fs::create_dir_all(&cli.output) {
        eprintln!(
            "Error: cannot create output directory {}: {}",
            cli.output.display(),
            e
        );
        process::exit(1);
    }

    // One shared identity for the whole invocation; all files of this
    // run end up under the same anonymized patient and study.
    let batch = match anonymizer.new_batch() {
        Ok(batch) => batch,
        Err(e) => {
            error!("Failed to generate batch identity: {}", e);
            eprintln!("Error: failed to generate batch identity: {}", e);
            process::exit(1);
        }
    };

    info!("Processing {} files", cli.files.len());

    let mut results = Vec::new();
    let mut failures = 0usize;
    for file in &cli.files {
        match process_file(&anonymizer, &batch, file, &cli.output, &cli.prefix) {
            Ok((out_path, report)) => {
                info!(
                    "Anonymized {} -> {} ({} elements changed)",
                    file.display(),
                    out_path.display(),
                    report.num_changed()
                );
                results.push(FileResult {
                    input: file.clone(),
                    output: out_path,
                    report,
                });
            }
            Err(e) => {
                warn!("Skipping {}: {}", file.display(), e);
                failures += 1;
            }
        }
    }

    if results.is_empty() {
        eprintln!("Error: no files could be anonymized");
        process::exit(1);
    }

    if failures > 0 {
        warn!("{} of {} files failed", failures, cli.files.len());
    }

    output_results(&results, cli.format);
}

/// One successfully anonymized file
struct FileResult {
    input: PathBuf,
    output: PathBuf,
    report: AnonymizationReport,
}

fn setup_logging(verbose: bool) {
    if verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }
}

/// Anonymizes a single file and writes the result
///
/// The source file is never modified. A failed file leaves nothing
/// behind in the output directory, so a partially written output can
/// not be mistaken for an anonymized one.
fn process_file(
    anonymizer: &Anonymizer,
    batch: &BatchIdentity,
    path: &Path,
    output_dir: &Path,
    prefix: &str,
) -> deident_core::Result<(PathBuf, AnonymizationReport)> {
    let obj = open_file(path)?;

    let meta = obj.meta();
    let sop_class_uid = meta
        .media_storage_sop_class_uid
        .trim_end_matches('\0')
        .to_string();
    let source_sop_instance_uid = meta
        .media_storage_sop_instance_uid
        .trim_end_matches('\0')
        .to_string();
    let transfer_syntax = meta.transfer_syntax.trim_end_matches('\0').to_string();
    let implementation_class_uid = meta
        .implementation_class_uid
        .trim_end_matches('\0')
        .to_string();

    let mut dataset = obj.into_inner();
    let report = anonymizer.anonymize(&mut dataset, batch)?;

    // The file meta group must carry the refreshed SOPInstanceUID
    let sop_instance_uid =
        get_string_value(&dataset, tags::SOP_INSTANCE_UID).unwrap_or(source_sop_instance_uid);

    let anonymized = dataset.with_meta(
        FileMetaTableBuilder::new()
            .media_storage_sop_class_uid(sop_class_uid)
            .media_storage_sop_instance_uid(sop_instance_uid)
            .transfer_syntax(transfer_syntax)
            .implementation_class_uid(implementation_class_uid),
    )?;

    let out_path = output_path(path, output_dir, prefix);
    if let Err(e) = anonymized.write_to_file(&out_path) {
        let _ = std::fs::remove_file(&out_path);
        return Err(e.into());
    }

    Ok((out_path, report))
}

fn output_path(input: &Path, output_dir: &Path, prefix: &str) -> PathBuf {
    let name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unnamed.dcm".to_string());
    output_dir.join(format!("{}{}", prefix, name))
}

fn output_results(results: &[FileResult], format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            for result in results {
                println!("{} -> {}", result.input.display(), result.output.display());
                println!();
                println!("{}", TextReport::new(&result.report));
            }
        }
        OutputFormat::Paths => {
            for result in results {
                println!("{}", result.output.display());
            }
        }
        OutputFormat::Json => {
            #[cfg(feature = "json")]
            {
                match output_json(results) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        error!("Failed to serialize to JSON: {}", e);
                        eprintln!("Error: Failed to serialize to JSON: {}", e);
                        process::exit(1);
                    }
                }
            }
            #[cfg(not(feature = "json"))]
            {
                eprintln!("Error: JSON output requires the 'json' feature");
                eprintln!("Rebuild with: cargo build --features json");
                process::exit(1);
            }
        }
    }
}

#[cfg(feature = "json")]
fn output_json(results: &[FileResult]) -> Result<String, serde_json::Error> {
    use serde::Serialize;

    #[derive(Serialize)]
    struct BatchJson<'a> {
        files: Vec<FileJson<'a>>,
    }

    #[derive(Serialize)]
    struct FileJson<'a> {
        input: String,
        output: String,
        changed: usize,
        skipped: usize,
        unchanged: usize,
        entries: &'a [deident_core::ActionEntry],
    }

    let files = results
        .iter()
        .map(|result| FileJson {
            input: result.input.display().to_string(),
            output: result.output.display().to_string(),
            changed: result.report.num_changed(),
            skipped: result.report.num_skipped(),
            unchanged: result.report.num_unchanged(),
            entries: &result.report.entries,
        })
        .collect();

    serde_json::to_string_pretty(&BatchJson { files })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicom_core::{DataElement, PrimitiveValue, VR};
    use dicom_object::InMemDicomObject;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    const SECONDARY_CAPTURE: &str = "1.2.840.10008.5.1.4.1.1.7";
    const EXPLICIT_VR_LE: &str = "1.2.840.10008.1.2.1";

    fn write_test_dicom(path: &Path, sop_instance_uid: &str) {
        let dataset = InMemDicomObject::from_element_iter([
            DataElement::new(tags::SOP_CLASS_UID, VR::UI, PrimitiveValue::from(SECONDARY_CAPTURE)),
            DataElement::new(
                tags::SOP_INSTANCE_UID,
                VR::UI,
                PrimitiveValue::from(sop_instance_uid),
            ),
            DataElement::new(tags::PATIENT_NAME, VR::PN, PrimitiveValue::from("Doe^Jane")),
            DataElement::new(tags::PATIENT_ID, VR::LO, PrimitiveValue::from("PID-7781")),
            DataElement::new(
                tags::STUDY_INSTANCE_UID,
                VR::UI,
                PrimitiveValue::from("1.2.840.99.1"),
            ),
            DataElement::new(
                tags::SERIES_INSTANCE_UID,
                VR::UI,
                PrimitiveValue::from("1.2.840.99.1.2"),
            ),
        ]);

        let file_obj = dataset
            .with_meta(
                FileMetaTableBuilder::new()
                    .media_storage_sop_class_uid(SECONDARY_CAPTURE)
                    .media_storage_sop_instance_uid(sop_instance_uid)
                    .transfer_syntax(EXPLICIT_VR_LE)
                    .implementation_class_uid(dicom_object::IMPLEMENTATION_CLASS_UID),
            )
            .unwrap();
        file_obj.write_to_file(path).unwrap();
    }

    fn test_anonymizer() -> Anonymizer {
        Anonymizer::new(Profile::basic()).unwrap()
    }

    #[test]
    fn test_output_path_prefixes_file_name() {
        let path = output_path(
            Path::new("/data/incoming/scan01.dcm"),
            Path::new("/data/out"),
            "anon_",
        );
        assert_eq!(path, PathBuf::from("/data/out/anon_scan01.dcm"));
    }

    #[test]
    fn test_process_file_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("scan.dcm");
        let out_dir = temp_dir.path().join("out");
        std::fs::create_dir(&out_dir).unwrap();
        write_test_dicom(&input, "1.2.840.99.1.2.3");

        let anonymizer = test_anonymizer();
        let batch = anonymizer.new_batch().unwrap();
        let (out_path, report) =
            process_file(&anonymizer, &batch, &input, &out_dir, "anon_").unwrap();

        assert_eq!(out_path, out_dir.join("anon_scan.dcm"));
        assert!(report.num_changed() > 0);

        let reopened = open_file(&out_path).unwrap();
        let name = get_string_value(&reopened, tags::PATIENT_NAME).unwrap();
        assert_ne!(name, "Doe^Jane");

        // meta group follows the refreshed SOPInstanceUID
        let meta_uid = reopened
            .meta()
            .media_storage_sop_instance_uid
            .trim_end_matches('\0')
            .to_string();
        let dataset_uid = get_string_value(&reopened, tags::SOP_INSTANCE_UID).unwrap();
        assert_eq!(meta_uid, dataset_uid);
        assert_ne!(dataset_uid, "1.2.840.99.1.2.3");
    }

    #[test]
    fn test_invalid_file_does_not_abort_batch() {
        let temp_dir = TempDir::new().unwrap();
        let garbage = temp_dir.path().join("broken.dcm");
        let mut file = File::create(&garbage).unwrap();
        file.write_all(b"this is not a dicom file").unwrap();

        let valid = temp_dir.path().join("scan.dcm");
        write_test_dicom(&valid, "1.2.840.99.1.2.3");

        let out_dir = temp_dir.path().join("out");
        std::fs::create_dir(&out_dir).unwrap();

        let anonymizer = test_anonymizer();
        let batch = anonymizer.new_batch().unwrap();

        assert!(process_file(&anonymizer, &batch, &garbage, &out_dir, "anon_").is_err());
        assert!(!out_dir.join("anon_broken.dcm").exists());
        // the sibling file still goes through with the same identity
        assert!(process_file(&anonymizer, &batch, &valid, &out_dir, "anon_").is_ok());
    }

    #[test]
    fn test_failed_write_leaves_no_output_file() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("scan.dcm");
        write_test_dicom(&input, "1.2.840.99.1.2.3");

        // occupy the output path with a directory so the write fails
        let out_dir = temp_dir.path().join("out");
        let blocked = out_dir.join("anon_scan.dcm");
        std::fs::create_dir_all(&blocked).unwrap();

        let anonymizer = test_anonymizer();
        let batch = anonymizer.new_batch().unwrap();

        assert!(process_file(&anonymizer, &batch, &input, &out_dir, "anon_").is_err());
        assert!(!blocked.is_file());
    }

    #[test]
    fn test_batch_files_share_study_uid() {
        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.path().join("a.dcm");
        let second = temp_dir.path().join("b.dcm");
        write_test_dicom(&first, "1.2.840.99.1.2.3");
        write_test_dicom(&second, "1.2.840.99.1.2.4");

        let out_dir = temp_dir.path().join("out");
        std::fs::create_dir(&out_dir).unwrap();

        let anonymizer = test_anonymizer();
        let batch = anonymizer.new_batch().unwrap();
        let (out_a, _) = process_file(&anonymizer, &batch, &first, &out_dir, "anon_").unwrap();
        let (out_b, _) = process_file(&anonymizer, &batch, &second, &out_dir, "anon_").unwrap();

        let obj_a = open_file(out_a).unwrap();
        let obj_b = open_file(out_b).unwrap();

        assert_eq!(
            get_string_value(&obj_a, tags::STUDY_INSTANCE_UID),
            get_string_value(&obj_b, tags::STUDY_INSTANCE_UID)
        );
        assert_ne!(
            get_string_value(&obj_a, tags::SOP_INSTANCE_UID),
            get_string_value(&obj_b, tags::SOP_INSTANCE_UID)
        );
    }
}
