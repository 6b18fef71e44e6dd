mod config;
mod forth;
mod ops;
mod stack;

use std::process;

use clap::Parser;
use rustyline::{
    completion::Completer, error::ReadlineError, history::DefaultHistory, Context, Editor, Helper,
    Highlighter, Hinter, Validator,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use config::Config;
use forth::{Flow, Forth};

/// Line-editor glue: owns the interpreter so completion can ask it for
/// candidates.
#[derive(Helper, Hinter, Highlighter, Validator)]
struct ForthHelper {
    forth: Forth,
}

impl Completer for ForthHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        Ok((0, self.forth.complete(&line[..pos])))
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();

    if let Err(e) = command_loop(Forth::new().with_show_stack(config.show_stack)) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn command_loop(forth: Forth) -> rustyline::Result<()> {
    let mut editor: Editor<ForthHelper, DefaultHistory> = Editor::new()?;
    editor.set_helper(Some(ForthHelper { forth }));

    loop {
        let prompt = match editor.helper() {
            Some(helper) => helper.forth.prompt(),
            None => return Ok(()),
        };

        let line = match editor.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => {
                debug!("end of input");
                return Ok(());
            }
            Err(e) => return Err(e),
        };
        editor.add_history_entry(line.as_str())?;

        let helper = match editor.helper_mut() {
            Some(helper) => helper,
            None => return Ok(()),
        };
        match helper.forth.eval_line(&line) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => return Ok(()),
            Err(e) => println!("{}", e),
        }
    }
}
