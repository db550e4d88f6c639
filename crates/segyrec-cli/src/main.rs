//! Command-line front end: read the first 3600 bytes of a SEG-Y file,
//! reconcile its headers, and print the report as JSON.

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use segyrec::{reconcile, Endianness, LayoutRevision, PipelineConfig, Report, TrustDirection};
use segyrec_types::{BINARY_HEADER_BYTES, TEXTUAL_HEADER_BYTES};
use tracing::warn;

const USAGE: &str = "usage: segyrec [OPTIONS] <FILE>

Reconcile the textual and binary headers of a SEG-Y file and print a JSON
report of extracted fields, contradictions, applied patches, and CRS
candidates.

options:
  --little-endian   decode the binary header little-endian
  --rev0            use the SEG-Y rev0 binary layout
  --rev2            use the SEG-Y rev2 binary layout
  --trust-binary    report contradictions but never patch the buffer
  --textual-only    ignore the binary header even if present
  --compact         one-line JSON instead of pretty-printed
  -h, --help        show this help";

struct Args {
    path: PathBuf,
    config: PipelineConfig,
    textual_only: bool,
    compact: bool,
}

fn parse_args<I: Iterator<Item = String>>(argv: I) -> Result<Args, String> {
    let mut path = None;
    let mut config = PipelineConfig::default();
    let mut textual_only = false;
    let mut compact = false;

    for arg in argv {
        match arg.as_str() {
            "--little-endian" => config.binary_endianness = Endianness::Little,
            "--rev0" => config.layout_revision = LayoutRevision::Rev0,
            "--rev2" => config.layout_revision = LayoutRevision::Rev2,
            "--trust-binary" => config.patch_trust_direction = TrustDirection::Binary,
            "--textual-only" => textual_only = true,
            "--compact" => compact = true,
            "-h" | "--help" => return Err(USAGE.to_owned()),
            other if other.starts_with('-') => {
                return Err(format!("unknown option `{other}`\n\n{USAGE}"));
            }
            other => {
                if path.replace(PathBuf::from(other)).is_some() {
                    return Err(format!("more than one input file given\n\n{USAGE}"));
                }
            }
        }
    }

    let path = path.ok_or_else(|| format!("no input file given\n\n{USAGE}"))?;
    Ok(Args {
        path,
        config,
        textual_only,
        compact,
    })
}

fn run(args: &Args) -> Result<Report, String> {
    let mut file =
        File::open(&args.path).map_err(|e| format!("{}: {e}", args.path.display()))?;
    let mut buf = vec![0u8; TEXTUAL_HEADER_BYTES + BINARY_HEADER_BYTES];
    let mut read = 0;
    while read < buf.len() {
        match file.read(&mut buf[read..]) {
            Ok(0) => break,
            Ok(n) => read += n,
            Err(e) => return Err(format!("{}: {e}", args.path.display())),
        }
    }
    buf.truncate(read);

    let textual = buf
        .get(..TEXTUAL_HEADER_BYTES)
        .ok_or_else(|| format!("{}: only {read} bytes, no textual header", args.path.display()))?;
    let binary = if args.textual_only {
        None
    } else {
        let rest = &buf[TEXTUAL_HEADER_BYTES..];
        if rest.len() >= BINARY_HEADER_BYTES {
            Some(rest)
        } else {
            warn!(
                got = rest.len(),
                "binary header missing or truncated; running textual side only"
            );
            None
        }
    };

    reconcile(textual, binary, args.config).map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "segyrec=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    match run(&args) {
        Ok(report) => {
            let json = if args.compact {
                serde_json::to_string(&report)
            } else {
                serde_json::to_string_pretty(&report)
            };
            match json {
                Ok(json) => {
                    println!("{json}");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("serializing report: {e}");
                    ExitCode::FAILURE
                }
            }
        }
        Err(msg) => {
            eprintln!("{msg}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args(list: &[&str]) -> Result<Args, String> {
        parse_args(list.iter().map(|s| (*s).to_owned()))
    }

    #[test]
    fn defaults_and_flags() {
        let parsed = args(&["--little-endian", "--rev2", "--trust-binary", "shot.segy"]).unwrap();
        assert_eq!(parsed.path, PathBuf::from("shot.segy"));
        assert_eq!(parsed.config.binary_endianness, Endianness::Little);
        assert_eq!(parsed.config.layout_revision, LayoutRevision::Rev2);
        assert_eq!(parsed.config.patch_trust_direction, TrustDirection::Binary);
    }

    #[test]
    fn rejects_unknown_option_and_missing_file() {
        assert!(args(&["--frobnicate", "a.segy"]).is_err());
        assert!(args(&[]).is_err());
        assert!(args(&["a.segy", "b.segy"]).is_err());
    }

    #[test]
    fn reconciles_a_file_on_disk() {
        let mut lines = vec![b' '; TEXTUAL_HEADER_BYTES];
        let card = b"C12 SAMPLE INTERVAL: 4 MS";
        lines[11 * 80..11 * 80 + card.len()].copy_from_slice(card);
        let mut binary = vec![0u8; BINARY_HEADER_BYTES];
        binary[16..18].copy_from_slice(&4000u16.to_be_bytes());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&lines).unwrap();
        file.write_all(&binary).unwrap();
        file.flush().unwrap();

        let parsed = args(&[file.path().to_str().unwrap()]).unwrap();
        let report = run(&parsed).unwrap();
        assert!(report.contradictions.is_empty());
        assert!(report.record.get("sample_interval_ms").is_some());
    }

    #[test]
    fn textual_only_file_still_reconciles() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&vec![b' '; TEXTUAL_HEADER_BYTES]).unwrap();
        file.flush().unwrap();

        let parsed = args(&[file.path().to_str().unwrap()]).unwrap();
        let report = run(&parsed).unwrap();
        assert!(report.binary.is_none());
    }
}
