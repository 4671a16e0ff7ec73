//! # Furigana CLI
//!
//! Usage:
//!   furigana input.json -o layout.json
//!   echo '{ "text": "{寒気;さむけ}" }' | furigana
//!   furigana --example > sample.json
//!
//! Without `-o` the layout is written to stdout. Set `RUST_LOG` to control
//! logging (default `furigana=info`), which goes to stderr.

use std::env;
use std::fs;
use std::io::{self, Read, Write};
use std::process;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "furigana=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--example") {
        print!("{}", example_document_json());
        return;
    }

    let input = if args.len() > 1 && !args[1].starts_with('-') {
        match fs::read_to_string(&args[1]) {
            Ok(s) => s,
            Err(e) => {
                error!("failed to read {}: {}", args[1], e);
                process::exit(1);
            }
        }
    } else {
        let mut buf = String::new();
        if let Err(e) = io::stdin().read_to_string(&mut buf) {
            error!("failed to read stdin: {}", e);
            process::exit(1);
        }
        buf
    };

    let output_path = args
        .windows(2)
        .find(|w| w[0] == "-o")
        .map(|w| w[1].clone());

    let layout = match furigana::layout_json(&input) {
        Ok(json) => json,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    let written = match &output_path {
        Some(path) => fs::write(path, &layout),
        None => io::stdout()
            .write_all(layout.as_bytes())
            .and_then(|_| io::stdout().write_all(b"\n")),
    };
    match written {
        Ok(()) => {
            if let Some(path) = output_path {
                info!("wrote {} bytes to {}", layout.len(), path);
            }
        }
        Err(e) => {
            error!("failed to write layout: {}", e);
            process::exit(1);
        }
    }
}

fn example_document_json() -> &'static str {
    r##"{
  "text": "{彼女;かのじょ}は{寒気;さむけ}を{防;ふせ}ぐために{厚;あつ}いコートを{着;き}ていた。",
  "highlight": [3, 5],
  "maxWidth": 360,
  "style": {
    "baseTextSize": 36,
    "furiganaScale": 0.5,
    "baseColor": { "r": 0.0, "g": 0.0, "b": 0.0 },
    "highlightColor": { "r": 0.85, "g": 0.1, "b": 0.1 },
    "furiganaColor": { "r": 0.4, "g": 0.4, "b": 0.4 },
    "bold": true
  }
}
"##
}
