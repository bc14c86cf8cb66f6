//! Lockshop signer generation tool
//!
//! Generates secp256k1 signer identities for locksmiths, key holders, and
//! marketplace operators, and derives account addresses from secret keys.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lockshop_crypto::Signer;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lockshop-keygen")]
#[command(about = "Lockshop signer generation tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new secp256k1 signer identity
    Generate {
        /// Output directory for key material
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Key name/prefix
        #[arg(short, long, default_value = "signer")]
        name: String,

        /// Print the secret to stdout (insecure, for development only)
        #[arg(long)]
        stdout: bool,
    },

    /// Derive the account address from a secret key
    Address {
        /// Path to a secret key file or a hex string
        secret_key: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            output,
            name,
            stdout,
        } => {
            generate_signer(&output, &name, stdout)?;
        }
        Commands::Address { secret_key } => {
            derive_address(&secret_key)?;
        }
    }

    Ok(())
}

fn generate_signer(output: &PathBuf, name: &str, stdout: bool) -> Result<()> {
    println!("🔐 Generating new secp256k1 signer...");

    let signer = Signer::random();
    let secret_hex = hex::encode(signer.secret_bytes());
    let address = signer.address();

    if stdout {
        println!("\n⚠️  WARNING: Printing secrets to stdout is insecure!");
        println!("Secret key: {}", secret_hex);
        println!("Address:    {}", address);
    } else {
        let secret_path = output.join(format!("{}_secret.key", name));
        let address_path = output.join(format!("{}_address.txt", name));

        fs::write(&secret_path, &secret_hex).context("Failed to write secret key")?;
        fs::write(&address_path, address.to_string()).context("Failed to write address")?;

        println!("\n✓ Signer generated successfully!");
        println!("  Secret key: {}", secret_path.display());
        println!("  Address:    {}", address_path.display());
    }

    println!("\n📋 Account address: {}", address);

    if !stdout {
        println!("\n⚠️  IMPORTANT: Keep your secret key secure!");
        println!("   Anyone holding it can sign permits and lock requests as you.");
    }

    Ok(())
}

fn derive_address(secret_key_input: &str) -> Result<()> {
    // Try to read as file first, otherwise treat as hex string
    let secret_hex = if PathBuf::from(secret_key_input).exists() {
        fs::read_to_string(secret_key_input).context("Failed to read secret key file")?
    } else {
        secret_key_input.to_string()
    };

    let secret_hex = secret_hex.trim();
    let secret_bytes = hex::decode(secret_hex).context("Invalid hex format in secret key")?;

    if secret_bytes.len() != 32 {
        anyhow::bail!(
            "Invalid secret key length: expected 32 bytes, got {}",
            secret_bytes.len()
        );
    }

    let mut key_bytes = [0u8; 32];
    key_bytes.copy_from_slice(&secret_bytes);

    let signer = Signer::from_secret_bytes(&key_bytes)?;
    println!("Address: {}", signer.address());

    Ok(())
}
