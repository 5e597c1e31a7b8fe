//! passlock: password-encrypt files and streams into self-contained blobs
//!
//! Commands:
//!   encrypt [INPUT] [-o OUTPUT]  - seal data under a password
//!   decrypt [INPUT] [-o OUTPUT]  - verify and open a blob
//!   inspect [INPUT]              - show a blob's layout (no password needed)
//!
//! INPUT and OUTPUT default to stdin/stdout; `-` means the same. `--armor`
//! switches blobs to base64 text.

mod config;

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD as B64, Engine};
use clap::{Args, Parser, Subcommand, ValueEnum};
use secrecy::{ExposeSecret, SecretString};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use zeroize::Zeroizing;

use passlock::{Blob, BLOB_OVERHEAD, NONCE_SIZE, SALT_SIZE, TAG_SIZE};

// ── CLI structure ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "passlock",
    version,
    about = "Password-based encryption into a single self-contained blob",
    long_about = "passlock: scrypt + AES-256-GCM; the salt, nonce, and tag travel inside the output"
)]
struct Cli {
    /// Path to config.toml (default: ~/.config/passlock/config.toml)
    #[arg(long, short = 'c', env = "PASSLOCK_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG wins if set
    #[arg(long, env = "PASSLOCK_LOG")]
    log: Option<String>,

    /// Log format (json, text)
    #[arg(long, env = "PASSLOCK_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encrypt INPUT under a password
    Encrypt {
        #[command(flatten)]
        io: IoArgs,
        #[command(flatten)]
        secret: PasswordArgs,
    },

    /// Decrypt a blob produced by `passlock encrypt`
    Decrypt {
        #[command(flatten)]
        io: IoArgs,
        #[command(flatten)]
        secret: PasswordArgs,
    },

    /// Show the nonce / ciphertext / tag / salt breakdown of a blob
    Inspect {
        /// Blob file (default: stdin)
        input: Option<PathBuf>,
        /// Input is base64 text
        #[arg(long)]
        armor: bool,
    },
}

#[derive(Args, Debug)]
struct IoArgs {
    /// Input file (default: stdin)
    input: Option<PathBuf>,
    /// Output file (default: stdout)
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
    /// Blobs are base64 text instead of raw bytes
    #[arg(long)]
    armor: bool,
}

#[derive(Args, Debug)]
struct PasswordArgs {
    /// Password (prompted for when absent)
    #[arg(long, env = "PASSLOCK_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[derive(Clone, Debug, ValueEnum, PartialEq)]
enum LogFormat {
    Json,
    Text,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(config::default_path);
    let config = config::load(&config_path)?;

    let level = cli.log.clone().unwrap_or_else(|| config.log_level.clone());
    let format = match cli.log_format.clone() {
        Some(format) => format,
        None => LogFormat::from_str(&config.log_format, true)
            .map_err(|e| anyhow::anyhow!("invalid log_format in config: {e}"))?,
    };
    init_logging(&level, &format);

    tracing::debug!(config = %config_path.display(), "passlock starting");

    match cli.command {
        Commands::Encrypt { io, secret } => {
            let password = resolve_password(secret.password, true)?;
            cmd_encrypt(&io, io.armor || config.armor, &password)
        }
        Commands::Decrypt { io, secret } => {
            let password = resolve_password(secret.password, false)?;
            cmd_decrypt(&io, io.armor || config.armor, &password)
        }
        Commands::Inspect { input, armor } => {
            cmd_inspect(input.as_deref(), armor || config.armor)
        }
    }
}

fn init_logging(level: &str, format: &LogFormat) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries blob/plaintext output; logs go to stderr
    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

// ── Password and I/O helpers ──────────────────────────────────────────────────

/// Password from flag/env, otherwise an interactive hidden prompt.
fn resolve_password(flag: Option<String>, confirm: bool) -> Result<SecretString> {
    if let Some(password) = flag {
        return Ok(SecretString::from(password));
    }

    let password =
        SecretString::from(rpassword::prompt_password("Password: ").context("reading password")?);
    if confirm {
        let again = Zeroizing::new(
            rpassword::prompt_password("Confirm password: ").context("reading password")?,
        );
        if password.expose_secret() != again.as_str() {
            anyhow::bail!("passwords do not match");
        }
    }
    Ok(password)
}

fn is_stdio(path: Option<&Path>) -> bool {
    path.map_or(true, |p| p == Path::new("-"))
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(p) if !is_stdio(Some(p)) => {
            std::fs::read(p).with_context(|| format!("reading {}", p.display()))
        }
        _ => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("reading stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match path {
        Some(p) if !is_stdio(Some(p)) => {
            std::fs::write(p, bytes).with_context(|| format!("writing {}", p.display()))
        }
        _ => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes).context("writing stdout")?;
            stdout.flush().context("flushing stdout")
        }
    }
}

fn armor(blob: &[u8]) -> Vec<u8> {
    let mut text = B64.encode(blob);
    text.push('\n');
    text.into_bytes()
}

fn dearmor(text: &[u8]) -> Result<Vec<u8>> {
    let text = std::str::from_utf8(text).context("armored blob is not UTF-8 text")?;
    B64.decode(text.trim()).context("decoding base64 blob")
}

fn read_blob(path: Option<&Path>, armored: bool) -> Result<Vec<u8>> {
    let raw = read_input(path)?;
    if armored {
        dearmor(&raw)
    } else {
        Ok(raw)
    }
}

// ── `passlock encrypt` ────────────────────────────────────────────────────────

fn cmd_encrypt(io: &IoArgs, armored: bool, password: &SecretString) -> Result<()> {
    let plaintext = Zeroizing::new(read_input(io.input.as_deref())?);

    let blob = passlock::encrypt(password.expose_secret().as_bytes(), &plaintext)
        .context("encrypting")?;

    tracing::info!(
        plaintext_len = plaintext.len(),
        blob_len = blob.len(),
        armored,
        "encrypted"
    );

    let out = if armored { armor(&blob) } else { blob };
    write_output(io.output.as_deref(), &out)
}

// ── `passlock decrypt` ────────────────────────────────────────────────────────

fn cmd_decrypt(io: &IoArgs, armored: bool, password: &SecretString) -> Result<()> {
    let blob = read_blob(io.input.as_deref(), armored)?;

    let plaintext = Zeroizing::new(
        passlock::decrypt(password.expose_secret().as_bytes(), &blob).context("decrypting")?,
    );

    tracing::info!(
        blob_len = blob.len(),
        plaintext_len = plaintext.len(),
        "decrypted"
    );

    write_output(io.output.as_deref(), &plaintext)
}

// ── `passlock inspect` ────────────────────────────────────────────────────────

fn cmd_inspect(input: Option<&Path>, armored: bool) -> Result<()> {
    let bytes = read_blob(input, armored)?;
    let blob = Blob::parse(&bytes).context("parsing blob")?;
    print!("{}", render_inspect(&blob));
    Ok(())
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn render_inspect(blob: &Blob<'_>) -> String {
    let ct_len = blob.plaintext_len();
    let tag_at = NONCE_SIZE + ct_len;
    let salt_at = tag_at + TAG_SIZE;

    let mut out = String::new();
    out.push_str(&format!("blob:        {} bytes\n", blob.len()));
    out.push_str(&format!(
        "  nonce       offset {:>6}  len {:>6}  {}\n",
        0,
        NONCE_SIZE,
        hex(blob.nonce())
    ));
    out.push_str(&format!(
        "  ciphertext  offset {:>6}  len {:>6}\n",
        NONCE_SIZE, ct_len
    ));
    out.push_str(&format!(
        "  tag         offset {:>6}  len {:>6}  {}\n",
        tag_at,
        TAG_SIZE,
        hex(blob.tag())
    ));
    out.push_str(&format!(
        "  salt        offset {:>6}  len {:>6}  {}\n",
        salt_at,
        SALT_SIZE,
        hex(blob.salt())
    ));
    out.push_str(&format!(
        "plaintext:   {} bytes ({} = {} + {} + {} + {}, overhead {})\n",
        ct_len,
        blob.len(),
        NONCE_SIZE,
        ct_len,
        TAG_SIZE,
        SALT_SIZE,
        BLOB_OVERHEAD
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_encrypt() {
        let cli = Cli::try_parse_from([
            "passlock", "encrypt", "secret.txt", "-o", "secret.lock", "--armor",
        ])
        .unwrap();

        match cli.command {
            Commands::Encrypt { io, .. } => {
                assert_eq!(io.input, Some(PathBuf::from("secret.txt")));
                assert_eq!(io.output, Some(PathBuf::from("secret.lock")));
                assert!(io.armor);
            }
            other => panic!("expected encrypt, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_decrypt_with_password() {
        let cli = Cli::try_parse_from(["passlock", "decrypt", "--password", "Pa$$w0rd"]).unwrap();

        match cli.command {
            Commands::Decrypt { io, secret } => {
                assert_eq!(io.input, None);
                assert_eq!(secret.password.as_deref(), Some("Pa$$w0rd"));
            }
            other => panic!("expected decrypt, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_log_format() {
        let cli = Cli::try_parse_from(["passlock", "--log-format", "json", "inspect"]).unwrap();
        assert_eq!(cli.log_format, Some(LogFormat::Json));
        assert!(Cli::try_parse_from(["passlock", "--log-format", "xml", "inspect"]).is_err());
    }

    #[test]
    fn test_password_flag_skips_prompt() {
        let password = resolve_password(Some("hunter2".into()), true).unwrap();
        assert_eq!(password.expose_secret(), "hunter2");
    }

    #[test]
    fn test_stdio_paths() {
        assert!(is_stdio(None));
        assert!(is_stdio(Some(Path::new("-"))));
        assert!(!is_stdio(Some(Path::new("blob.bin"))));
    }

    #[test]
    fn test_armor_tolerates_whitespace() {
        let blob = vec![0xFFu8, 0x00, 0x10, 0x80];
        let mut text = b"  \n".to_vec();
        text.extend_from_slice(&armor(&blob));
        text.extend_from_slice(b"\r\n");

        assert_eq!(dearmor(&text).unwrap(), blob);
        assert!(dearmor(b"not base64!").is_err());
    }

    #[test]
    fn test_render_inspect() {
        let mut bytes = vec![0x01u8; NONCE_SIZE];
        bytes.extend_from_slice(&[0x02u8; 12]);
        bytes.extend_from_slice(&[0x03u8; TAG_SIZE]);
        bytes.extend_from_slice(&[0x04u8; SALT_SIZE]);
        let blob = Blob::parse(&bytes).unwrap();

        let report = render_inspect(&blob);

        assert!(report.contains("blob:        72 bytes"));
        assert!(report.contains(&"01".repeat(NONCE_SIZE)));
        assert!(report.contains(&"03".repeat(TAG_SIZE)));
        assert!(report.contains(&"04".repeat(SALT_SIZE)));
        assert!(report.contains("plaintext:   12 bytes (72 = 12 + 12 + 16 + 32, overhead 60)"));
    }

    #[test]
    fn test_armored_blob_file_roundtrip() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("blob.txt");
        let blob = vec![7u8; BLOB_OVERHEAD + 3];

        write_output(Some(&path), &armor(&blob)).unwrap();
        assert_eq!(read_blob(Some(&path), true).unwrap(), blob);
        assert!(read_input(Some(&tmp.path().join("missing"))).is_err());
    }

    #[test]
    fn test_inspect_rejects_short_blob() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("short.lock");
        std::fs::write(&path, [0u8; BLOB_OVERHEAD - 1]).unwrap();

        let err = cmd_inspect(Some(&path), false).unwrap_err();
        assert_eq!(
            err.downcast_ref::<passlock::PasslockError>(),
            Some(&passlock::PasslockError::MalformedBlob {
                len: BLOB_OVERHEAD - 1,
                min: BLOB_OVERHEAD
            })
        );
    }

    // Standard scrypt cost (1 GiB per derivation): keep every derivation in
    // this one test so they run sequentially.
    #[test]
    fn test_encrypt_inspect_decrypt_armored_files() {
        let tmp = tempfile::TempDir::new().unwrap();
        let plain = tmp.path().join("secret.txt");
        let locked = tmp.path().join("secret.lock");
        let opened = tmp.path().join("secret.out");
        std::fs::write(&plain, b"Encrypt this").unwrap();
        let password = SecretString::from("Pa$$w0rd");

        let encrypt_io = IoArgs {
            input: Some(plain.clone()),
            output: Some(locked.clone()),
            armor: true,
        };
        cmd_encrypt(&encrypt_io, true, &password).unwrap();

        let text = std::fs::read_to_string(&locked).unwrap();
        assert!(text.ends_with('\n'));
        let blob = dearmor(text.as_bytes()).unwrap();
        assert_eq!(blob.len(), 72);

        cmd_inspect(Some(&locked), true).unwrap();
        let report = render_inspect(&Blob::parse(&blob).unwrap());
        assert!(report.contains("plaintext:   12 bytes"));

        let decrypt_io = IoArgs {
            input: Some(locked.clone()),
            output: Some(opened.clone()),
            armor: true,
        };
        cmd_decrypt(&decrypt_io, true, &password).unwrap();
        assert_eq!(std::fs::read(&opened).unwrap(), b"Encrypt this");

        std::fs::remove_file(&opened).unwrap();
        let err = cmd_decrypt(&decrypt_io, true, &SecretString::from("Pa$$w0rd!")).unwrap_err();
        assert!(
            err.chain().any(|cause| {
                cause.downcast_ref::<passlock::PasslockError>()
                    == Some(&passlock::PasslockError::Authentication)
            }),
            "wrong password must surface Authentication, got {err:#}"
        );
        assert!(!opened.exists(), "no plaintext may be written on failure");
    }
}
