use clap::{Subcommand, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the models available to the API key
    Models,

    /// Send one prompt to several models and compare their answers
    Test {
        prompt: String,

        /// Model to query (repeatable, at least one)
        #[arg(short, long = "model", required = true)]
        models: Vec<String>,

        /// Selected model whose answer gets a reflection pass (repeatable)
        #[arg(short, long = "reflect")]
        reflect: Vec<String>,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Line-based chat on stdin/stdout (`/model`, `/reflect on|off`, `/clear`, `/quit`)
    Chat {
        #[arg(short, long)]
        model: String,

        /// Have the model revise each answer before it is recorded
        #[arg(long)]
        reflect: bool,
    },

    /// Full-screen terminal UI with both modes
    Ui,
}
