use std::error::Error;
use std::io::{self, BufRead, Write};

use bigram_gen_core::config::{self, Config};
use bigram_gen_core::io::{TextOrigin, preview_words, seed_from_prompt};
use bigram_gen_core::model::{BigramModel, DiagnosticEvent, DiagnosticsSink, Generator};
use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

const RULE: &str = "============================================================";

/// Sends fallback events to the logger.
struct LogDiagnostics;

impl DiagnosticsSink for LogDiagnostics {
    fn record(&mut self, event: DiagnosticEvent) {
        warn!("{event}");
    }
}

/// Reads one line without its line ending, `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_owned()))
}

fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, message: &str) -> io::Result<Option<String>> {
    write!(out, "{message}")?;
    out.flush()?;
    read_line(input)
}

/// Interactive session: pick a training file, show the model, then generate
/// from prompts until an empty line (or end of input).
fn run<R: BufRead, W: Write>(config: &Config, mut input: R, mut out: W) -> Result<(), Box<dyn Error>> {
    // Load the training text, or the example file if none/not found
    writeln!(out, "\n{RULE}")?;
    let filename = prompt(
        &mut input,
        &mut out,
        &format!(
            "Enter the filename of a text (\".txt\") file located in \"{}\" to build the bigram model with (leave blank for example file): ",
            config.data_dir.display()
        ),
    )?;
    let loaded = config.text_source().load(filename.as_deref())?;
    match loaded.origin {
        TextOrigin::Requested => info!("loading {}", loaded.path.display()),
        TextOrigin::NotFound => warn!(
            "{:?} not found, loading example file {}",
            filename.as_deref().unwrap_or_default(),
            loaded.path.display()
        ),
        TextOrigin::NoInput => info!("no filename entered, loading example file {}", loaded.path.display()),
    }
    writeln!(out, "\"{}\" loaded ({}).", loaded.path.display(), loaded.origin)?;
    writeln!(out, "\n{RULE}")?;

    // Build and show the model
    writeln!(
        out,
        "Building bigram model from text:\n\"\"\"\n{}\n\"\"\"",
        preview_words(&loaded.text, config.preview_words)
    )?;
    let model = BigramModel::from_text(&loaded.text, config.chunk_size)?;
    info!("bigram model built: {} predecessor tokens", model.len());
    writeln!(out, "\nFinished building bigram model.")?;
    writeln!(out, "\n{RULE}")?;
    writeln!(out, "Bigram model (first token -> second token: probability):")?;
    write!(out, "{model}")?;
    writeln!(out, "\n{RULE}")?;

    let generator = Generator::new(&model).with_fallback(config.fallback);
    let mut rng = match config.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    debug!("generating {} tokens per prompt, fallback {}", config.max_steps, generator.fallback());

    loop {
        let line = prompt(
            &mut input,
            &mut out,
            "Enter a generation prompt token. It should be in the built bigram model. Enter nothing to quit: ",
        )?;
        let Some(seed) = line.as_deref().and_then(seed_from_prompt) else {
            break;
        };

        let tokens = generator.generate(seed, config.max_steps, &mut rng, &mut LogDiagnostics)?;
        writeln!(
            out,
            "\nGenerated text from prompt \"{seed}\":\n\"\"\"\n{}\n\"\"\"",
            tokens.join(config.separator.as_str())
        )?;
        writeln!(out, "\n{RULE}")?;
    }

    writeln!(out, "Nothing entered, quitting.")?;
    writeln!(out, "\n{RULE}")?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = config::from_env()?;
    config.validate()?;

    run(&config, io::stdin().lock(), io::stdout().lock())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup(default_text: &str) -> (TempDir, Config) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("default.txt"), default_text).unwrap();
        let config = Config {
            data_dir: dir.path().to_path_buf(),
            default_file: "default.txt".to_owned(),
            max_steps: 4,
            rng_seed: Some(1),
            separator: String::new(),
            ..Config::default()
        };
        (dir, config)
    }

    fn session(config: &Config, input: &str) -> String {
        let mut out = Vec::new();
        run(config, input.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn generates_from_the_default_file() {
        let (_dir, config) = setup("ab ab ab ab");
        let out = session(&config, "\nab\n\n");
        assert!(out.contains("\"ab\":\n\t\" \": 1.0\n"), "{out}");
        assert!(out.contains("Generated text from prompt \"ab\":\n\"\"\"\nab ab ab\n\"\"\""), "{out}");
        assert!(out.ends_with(&format!("Nothing entered, quitting.\n\n{RULE}\n")));
    }

    #[test]
    fn uses_the_last_prompt_word_as_seed() {
        let (_dir, config) = setup("ab ab ab ab");
        let out = session(&config, "\nwolf ab\n");
        assert!(out.contains("Generated text from prompt \"ab\""), "{out}");
    }

    #[test]
    fn loads_a_requested_file() {
        let (dir, config) = setup("ab ab");
        fs::write(dir.path().join("other.txt"), "xy xy xy").unwrap();
        let out = session(&config, "other.txt\n\n");
        assert!(out.contains("\"xy\":"), "{out}");
        assert!(!out.contains("\"ab\":"), "{out}");
    }

    #[test]
    fn empty_model_is_reported_as_an_error() {
        let (_dir, config) = setup("a");
        let mut out = Vec::new();
        let err = run(&config, "\nab\n".as_bytes(), &mut out).unwrap_err();
        assert_eq!(err.to_string(), "model is empty, no token to generate from");
    }

    #[test]
    fn missing_default_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let config = Config { data_dir: dir.path().to_path_buf(), ..Config::default() };
        let mut out = Vec::new();
        assert!(run(&config, "\n".as_bytes(), &mut out).is_err());
    }
}
