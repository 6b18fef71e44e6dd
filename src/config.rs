use clap::Parser;

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "forther", version, about = "A small stack calculator with Forth-like words")]
#[command(after_help = "Type `help` at the prompt for the list of words.")]
pub struct Config {
    /// Start with the stack shown in the prompt
    #[arg(long = "showstack")]
    pub show_stack: bool,
}
