use clap::{Parser, Subcommand};

/// `postcraft` - draft, review and publish LinkedIn posts with an LLM.
#[derive(Parser, Debug)]
#[command(name = "postcraft")]
#[command(version)]
#[command(about = "Draft, review and publish LinkedIn posts.", long_about = None)]
pub struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Draft a post interactively and review it until it is published or dropped
    Draft {
        /// Topic for the post (prompted for when omitted)
        topic: Option<String>,

        /// Page to use as source material
        #[arg(short, long)]
        url: Option<String>,

        /// Temperature (0.0 - 2.0)
        #[arg(short, long)]
        temperature: Option<f64>,
    },

    /// Start a run and leave it suspended for review (file run store)
    Start {
        /// Topic for the post
        topic: String,

        /// Page to use as source material
        #[arg(short, long)]
        url: Option<String>,

        /// Temperature (0.0 - 2.0)
        #[arg(short, long)]
        temperature: Option<f64>,
    },

    /// Resume a suspended run with feedback ("approve", "exit", or revision notes)
    Resume {
        /// Run id printed by `start` or `draft`
        run_id: String,

        /// Reviewer feedback
        feedback: String,
    },

    /// Serve the HTTP run API
    Serve {
        /// Port to listen on (use 0 for random available port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
    },

    /// Publish text directly, skipping drafting and review
    Publish {
        /// Post text
        text: String,
    },

    /// List suspended runs
    Runs,
}
