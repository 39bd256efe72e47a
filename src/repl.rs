use crate::evaluator::{EvalConfig, Evaluator};
use crate::parser::parse;
use std::io::{self, BufRead, Write};
use tracing::debug;

pub const PROMPT: &str = ">> ";

/// Reads one line at a time from `input` until EOF, `exit` or `quit`. All lines
/// share one global scope, so bindings made on one line are visible on the next.
pub fn start<R: BufRead, W: Write>(mut input: R, mut output: W, config: EvalConfig) -> io::Result<()> {
    let mut evaluator = Evaluator::with_output(Vec::new()).with_config(config);

    loop {
        write!(output, "{}", PROMPT)?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            break;
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "exit" || line == "quit" {
            break;
        }

        evaluate_line(line, &mut evaluator, &mut output)?;
    }

    Ok(())
}

fn evaluate_line<W: Write>(line: &str, evaluator: &mut Evaluator<Vec<u8>>, output: &mut W) -> io::Result<()> {
    let (program, errors) = parse(line);
    if !errors.is_empty() {
        debug!(count = errors.len(), "skipping line with parse errors");
        for error in &errors {
            writeln!(output, "\t{}", error)?;
        }
        return Ok(());
    }

    let result = evaluator.evaluate_program(&program);

    // Anything `puts` wrote goes out ahead of the line's result.
    output.write_all(evaluator.output())?;
    evaluator.output().clear();

    match result {
        Ok(Some(value)) => writeln!(output, "{}", value.inspect()),
        Ok(None) => Ok(()),
        Err(error) => writeln!(output, "{}", error.inspect()),
    }
}
