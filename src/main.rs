use anyhow::{Context, Result, anyhow};
use bip38crypt::{Bip38, EncryptedPayload, KdfBackend, KdfParams, PrivateKey};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;
mod auth;

#[derive(Debug, clap::Args)]
struct KdfArgs {
    /// Key derivation backend
    #[arg(
        long = "kdf-backend",
        global = true,
        env = "BIP38_KDF_BACKEND",
        default_value = "scrypt"
    )]
    backend: String,

    /// scrypt cost as log2(N) (default: 14)
    #[arg(long = "scrypt-log-n", global = true)]
    log_n: Option<u8>,

    /// scrypt block size (default: 8)
    #[arg(long = "scrypt-r", global = true)]
    r: Option<u32>,

    /// scrypt parallelism (default: 8)
    #[arg(long = "scrypt-p", global = true)]
    p: Option<u32>,
}

impl KdfArgs {
    fn to_bip38(&self) -> Result<Bip38> {
        let default = KdfParams::default();
        let params = KdfParams::new(
            self.log_n.unwrap_or(default.log_n()),
            self.r.unwrap_or(default.r()),
            self.p.unwrap_or(default.p()),
        )?;
        let backend: KdfBackend = self.backend.parse()?;

        let bip38 = Bip38::with_backend(backend, params)?;
        let params = bip38.kdf().params();
        debug!(
            backend = bip38.kdf().name(),
            log_n = params.log_n(),
            r = params.r(),
            p = params.p(),
            "configured key derivation"
        );
        Ok(bip38)
    }
}

#[derive(Debug, Parser)]
#[command(name = "bip38crypt")]
#[command(
    version,
    about = "Encrypt and decrypt private keys with a passphrase (BIP38, non-EC-multiply)."
)]
struct Cli {
    #[command(flatten)]
    kdf: KdfArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Encrypts a private key given as WIF or 64 hex characters
    #[command(arg_required_else_help = true)]
    Encrypt { key: String },

    /// Decrypts a 6P... key and prints it as WIF
    #[command(arg_required_else_help = true)]
    Decrypt {
        encrypted: String,

        /// Print the key as hex instead of WIF
        #[arg(long, default_value_t = false)]
        hex: bool,
    },

    /// Shows the fields of an encrypted key without decrypting it
    #[command(arg_required_else_help = true)]
    Inspect {
        encrypted: String,

        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Generates a new private key and prints it encrypted
    Generate {
        /// Also print the unencrypted WIF
        #[arg(long, default_value_t = false)]
        show_key: bool,
    },
}

#[derive(Debug, Serialize)]
struct PayloadInfo {
    kind: &'static str,
    flag: String,
    salt: String,
}

impl From<&EncryptedPayload> for PayloadInfo {
    fn from(payload: &EncryptedPayload) -> Self {
        Self {
            kind: "non-ec-multiply, uncompressed",
            flag: format!("0x{:02x}", payload.flag()),
            salt: hex::encode(payload.salt()),
        }
    }
}

fn generate_key() -> Result<PrivateKey> {
    loop {
        let mut bytes = zeroize::Zeroizing::new([0u8; 32]);
        getrandom::fill(&mut bytes[..]).map_err(|_| anyhow!("OS random generator unavailable"))?;
        // retry on the negligible chance of zero or a value past the curve order
        if let Ok(key) = PrivateKey::from_bytes(&bytes) {
            return Ok(key);
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let args = Cli::parse();

    match args.command {
        Commands::Encrypt { key } => {
            let bip38 = args.kdf.to_bip38()?;
            let key = PrivateKey::parse(&key).context("failed to read private key")?;
            let passphrase = auth::read_new_passphrase_with_confirmation()?;
            let encrypted = bip38.encrypt(&key, passphrase.as_str())?;
            println!("{encrypted}");
        }
        Commands::Decrypt { encrypted, hex } => {
            let bip38 = args.kdf.to_bip38()?;
            let passphrase = auth::read_passphrase()?;
            let key = bip38
                .decrypt(&encrypted, passphrase.as_str())
                .context("failed to decrypt key")?;
            if hex {
                println!("{}", key.to_hex().as_str());
            } else {
                println!("{}", key.to_wif().as_str());
            }
        }
        Commands::Inspect { encrypted, json } => {
            let payload = EncryptedPayload::from_base58(&encrypted)
                .context("not a non-EC-multiply BIP38 key")?;
            let info = PayloadInfo::from(&payload);
            if json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("kind  {}", info.kind);
                println!("flag  {}", info.flag);
                println!("salt  {}", info.salt);
            }
        }
        Commands::Generate { show_key } => {
            let bip38 = args.kdf.to_bip38()?;
            let key = generate_key()?;
            let passphrase = auth::read_new_passphrase_with_confirmation()?;
            let encrypted = bip38.encrypt(&key, passphrase.as_str())?;

            println!("address    {}", bip38.address(&key));
            println!("encrypted  {encrypted}");
            if show_key {
                println!("wif        {}", key.to_wif().as_str());
            }
        }
    }

    Ok(())
}
