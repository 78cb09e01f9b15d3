use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use dakku::codec;
use dakku::entry::EntryPayload;
use dakku::geometry::CanvasRect;
use dakku::logging;

const USAGE: &str = "usage: dakku <entry.json> [--canvas WIDTHxHEIGHT] [--write PATH]

Decodes a diary entry, reports what the scene holds, and prints the entry
re-encoded in the current schema. --write stores the result instead of
printing it.";

struct CliArgs {
    entry: PathBuf,
    canvas: CanvasRect,
    write: Option<PathBuf>,
}

impl CliArgs {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut entry = None;
        let mut canvas = CanvasRect::FALLBACK;
        let mut write = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--canvas" => {
                    let value = args.next().context("--canvas needs WIDTHxHEIGHT")?;
                    canvas = parse_canvas(&value)?;
                }
                "--write" => {
                    let value = args.next().context("--write needs a path")?;
                    write = Some(PathBuf::from(value));
                }
                "--help" | "-h" => {
                    println!("{USAGE}");
                    std::process::exit(0);
                }
                _ if entry.is_none() => entry = Some(PathBuf::from(arg)),
                _ => bail!("unexpected argument {arg:?}\n{USAGE}"),
            }
        }

        Ok(Self {
            entry: entry.with_context(|| format!("missing entry file\n{USAGE}"))?,
            canvas,
            write,
        })
    }
}

fn parse_canvas(value: &str) -> Result<CanvasRect> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .with_context(|| format!("canvas size {value:?} is not WIDTHxHEIGHT"))?;
    let width: f64 = w
        .trim()
        .parse()
        .with_context(|| format!("bad canvas width {w:?}"))?;
    let height: f64 = h
        .trim()
        .parse()
        .with_context(|| format!("bad canvas height {h:?}"))?;
    if width <= 0.0 || height <= 0.0 {
        bail!("canvas size {value:?} must be positive");
    }
    Ok(CanvasRect::new(width, height))
}

fn main() -> Result<()> {
    logging::init();

    let args = CliArgs::parse(std::env::args().skip(1))?;

    let json = fs::read_to_string(&args.entry)
        .with_context(|| format!("failed to read {}", args.entry.display()))?;
    let payload = EntryPayload::from_json_str(&json)
        .with_context(|| format!("{} is not a diary entry", args.entry.display()))?;

    let loaded = codec::load_scene(&payload, args.canvas);
    for issue in &loaded.issues {
        tracing::warn!(%issue, "collection dropped during decode");
    }
    tracing::info!(
        stickers = loaded.store.stickers().len(),
        text_blocks = loaded.store.text_blocks().len(),
        photos = loaded.store.photos().len(),
        mood = %loaded.mood_glyph,
        "decoded scene"
    );

    let normalized = codec::normalize_entry_json(&json, args.canvas)?;
    match &args.write {
        Some(path) => {
            fs::write(path, normalized)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(?path, "normalized entry written");
        }
        None => println!("{normalized}"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_args(args: &[&str]) -> Result<CliArgs> {
        CliArgs::parse(args.iter().map(|arg| arg.to_string()))
    }

    #[test]
    fn parse_accepts_entry_with_canvas_and_write() {
        let args = parse_args(&["entry.json", "--canvas", "390x844", "--write", "out.json"])
            .expect("args should parse");

        assert_eq!(args.entry, PathBuf::from("entry.json"));
        assert_eq!(args.canvas, CanvasRect::new(390.0, 844.0));
        assert_eq!(args.write, Some(PathBuf::from("out.json")));
    }

    #[test]
    fn parse_defaults_to_the_fallback_canvas() {
        let args = parse_args(&["entry.json"]).expect("args should parse");

        assert_eq!(args.canvas, CanvasRect::FALLBACK);
        assert_eq!(args.write, None);
    }

    #[test]
    fn parse_rejects_missing_entry_and_extra_positionals() {
        assert!(parse_args(&[]).is_err());
        assert!(parse_args(&["a.json", "b.json"]).is_err());
    }

    #[test]
    fn parse_canvas_rejects_malformed_sizes() {
        assert!(parse_canvas("390").is_err());
        assert!(parse_canvas("widexhigh").is_err());
        assert!(parse_canvas("0x700").is_err());
        assert!(parse_canvas("390x-700").is_err());
    }

    #[test]
    fn parse_canvas_accepts_upper_and_lower_separators() {
        assert_eq!(
            parse_canvas("390X700").expect("size should parse"),
            CanvasRect::new(390.0, 700.0)
        );
    }
}
