use std::io;
use std::process;

use clap::{Parser, Subcommand};
use rsa_files::commands::{self, DecryptOptions, EncryptOptions};
use rsa_files::rsa::LabelPolicy;
use rsa_files::util::FileConfig;
use tracing_subscriber::EnvFilter;

/// Encrypt/Decrypt tool by the RSA encryption for your secret files.
#[derive(Debug, Parser)]
#[command(name = "rsa-files", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Encrypt your files
    #[command(visible_alias = "e")]
    Encrypt {
        /// Files to bundle into one ciphertext
        files: Vec<String>,

        /// Public key to encrypt with (PEM, "PUBLIC KEY")
        #[arg(short, long)]
        key: String,

        /// Output filename; ciphertext goes to stdout when omitted
        #[arg(short, long)]
        output: Option<String>,

        /// OAEP label override
        #[arg(long, env = "RSA_FILES_LABEL")]
        label: Option<String>,
    },

    /// Decrypt files produced by `encrypt`
    #[command(visible_alias = "d")]
    Decrypt {
        /// Encrypted files
        files: Vec<String>,

        /// Private key to decrypt with (PEM, "RSA PRIVATE KEY")
        #[arg(short, long)]
        key: String,

        /// Directory decrypted files are restored into
        #[arg(long, default_value = ".")]
        output_dir: String,

        /// Write stored paths verbatim, including absolute and `..` paths
        #[arg(long)]
        allow_unsafe_paths: bool,

        /// OAEP label override
        #[arg(long, env = "RSA_FILES_LABEL")]
        label: Option<String>,
    },
}

fn label_policy(label: Option<String>) -> LabelPolicy {
    label.map(LabelPolicy::with_current).unwrap_or_default()
}

fn run(cli: Cli) -> rsa_files::Result<()> {
    match cli.command {
        Command::Encrypt {
            files,
            key,
            output,
            label,
        } => {
            let options = EncryptOptions {
                key,
                output,
                files,
                labels: label_policy(label),
            };
            commands::encrypt(&options, &mut io::stdout().lock())
        }
        Command::Decrypt {
            files,
            key,
            output_dir,
            allow_unsafe_paths,
            label,
        } => {
            let options = DecryptOptions {
                key,
                files,
                config: FileConfig::default()
                    .with_output_dir(output_dir)
                    .with_unsafe_paths(allow_unsafe_paths),
                labels: label_policy(label),
            };
            commands::decrypt(&options).map(|_| ())
        }
    }
}

fn main() {
    // stdout carries ciphertext, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
