use crate::error::ChocoError;
use crate::evaluator::{EvalConfig, Evaluator};
use crate::parser::parse;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub eval: EvalConfig,
    /// Also render parse and runtime errors as annotated source snippets on stderr.
    pub diagnostics: bool,
}

/// Script run when the CLI is started without a FILE argument.
pub const DEFAULT_SCRIPT: &str = "main.choco";

/// `dir/main.choco` if that file exists.
pub fn default_script(dir: &Path) -> Option<PathBuf> {
    let path = dir.join(DEFAULT_SCRIPT);
    path.is_file().then_some(path)
}

/// Reads `path` and runs it, writing everything the program produces to `output`.
pub fn run_file<W: Write>(path: &Path, output: &mut W, options: &RunOptions) -> Result<(), ChocoError> {
    let source = fs::read_to_string(path).map_err(|source| ChocoError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), bytes = source.len(), "running file");

    let filename = path.to_string_lossy();
    run_source(&source, Some(&*filename), output, options)?;
    Ok(())
}

/// Parse errors do not stop the run: each is printed on its own tab-indented
/// line and whatever parsed is evaluated anyway.
pub fn run_source<W: Write>(
    source: &str,
    filename: Option<&str>,
    output: &mut W,
    options: &RunOptions,
) -> std::io::Result<()> {
    let (program, errors) = parse(source);

    for error in &errors {
        writeln!(output, "\t{}", error)?;
        if options.diagnostics {
            error.report(source, filename);
        }
    }
    if !errors.is_empty() {
        debug!(count = errors.len(), "evaluating partial program");
    }

    let mut evaluator = Evaluator::with_output(&mut *output).with_config(options.eval.clone());
    let result = evaluator.evaluate_program(&program);
    drop(evaluator);

    match result {
        Ok(Some(value)) => writeln!(output, "{}", value.inspect())?,
        Ok(None) => {}
        Err(error) => {
            writeln!(output, "{}", error.inspect())?;
            if options.diagnostics {
                error.report(source, filename);
            }
        }
    }

    output.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(source: &str) -> String {
        let mut output = Vec::new();
        run_source(source, None, &mut output, &RunOptions::default()).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn prints_the_result() {
        assert_eq!(run("let a = 2; a * 21"), "42\n");
        assert_eq!(run("\"hi\""), "hi\n");
    }

    #[test]
    fn nothing_printed_without_a_result() {
        assert_eq!(run("let a = 1;"), "");
        assert_eq!(run(""), "");
    }

    #[test]
    fn runtime_errors_are_printed() {
        assert_eq!(run("1 + true"), "ERROR: type mismatch: INTEGER + BOOLEAN\n");
    }

    #[test]
    fn parse_errors_then_partial_evaluation() {
        assert_eq!(
            run("let = 1; 5 * 5"),
            "\texpected next token to be IDENT, got = instead\n\tno prefix parse function for = found\n25\n"
        );
    }

    #[test]
    fn puts_output_comes_before_the_result() {
        assert_eq!(run("puts(1); 2"), "1\n2\n");
    }

    #[test]
    fn default_script_found_in_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(default_script(dir.path()), None);

        let script = dir.path().join(DEFAULT_SCRIPT);
        fs::write(&script, "let answer = 6 * 7; answer").unwrap();
        assert_eq!(default_script(dir.path()), Some(script.clone()));

        let mut output = Vec::new();
        run_file(&script, &mut output, &RunOptions::default()).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "42\n");
    }

    #[test]
    fn default_script_must_be_a_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join(DEFAULT_SCRIPT)).unwrap();
        assert_eq!(default_script(dir.path()), None);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let mut output = Vec::new();
        let error = run_file(
            Path::new("definitely/not/here.mk"),
            &mut output,
            &RunOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(error, ChocoError::Read { .. }));
        assert!(error.to_string().starts_with("could not read 'definitely/not/here.mk'"));
    }
}
