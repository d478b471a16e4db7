//! `walletstore`: inspect and manage the wallet credential kept in a local
//! directory.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use eyre::{eyre, Result, WrapErr};
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;
use walletstore_core::platform::FileKeyValueStore;
use walletstore_core::{CredentialStore, FailureKind, WalletCredential};
use zeroize::Zeroizing;

mod cli;

use cli::{Cli, Command, KeySource};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let data_dir = cli::resolve_data_dir(cli.data_dir)?;
    tracing::debug!(data_dir = %data_dir.display(), "opening wallet store");
    let kv = FileKeyValueStore::new(&data_dir)
        .await
        .wrap_err_with(|| format!("opening store at {}", data_dir.display()))?;
    let store = CredentialStore::new(Arc::new(kv));

    let (ok, output) = run(&store, cli.command, cli.json).await?;
    if let Some(output) = output {
        println!("{output}");
    }
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Executes `command`, returning whether it succeeded and what to print.
async fn run(
    store: &CredentialStore,
    command: Command,
    json: bool,
) -> Result<(bool, Option<String>)> {
    match command {
        Command::Save(args) => {
            let credential = match read_key(args.key).await? {
                Some(key) => WalletCredential::new(args.address, key.as_str()),
                None => WalletCredential::address_only(args.address),
            };
            let saved = store.save(&credential).await;
            Ok((saved, Some(outcome("saved", saved, json))))
        }
        Command::Load { reveal } => Ok(store.load().await.map_or_else(
            || (false, Some(outcome("found", false, json))),
            |credential| (true, Some(render_credential(&credential, reveal, json))),
        )),
        Command::Delete => {
            let deleted = store.delete().await;
            Ok((deleted, Some(outcome("deleted", deleted, json))))
        }
        Command::Status => {
            let status = match store.try_load().await {
                Ok(Some(_)) => "present",
                Ok(None) => "empty",
                Err(err) if err.kind() == FailureKind::Serialization => "unreadable",
                Err(err) => return Err(err).wrap_err("reading the wallet slot"),
            };
            let output = if json {
                serde_json::json!({ "status": status }).to_string()
            } else {
                status.to_string()
            };
            Ok((true, Some(output)))
        }
    }
}

async fn read_key(source: KeySource) -> Result<Option<Zeroizing<String>>> {
    match source {
        KeySource {
            private_key: Some(key),
            ..
        } => Ok(Some(Zeroizing::new(key))),
        KeySource {
            private_key_stdin: true,
            ..
        } => {
            let mut input = Zeroizing::new(String::new());
            tokio::io::stdin()
                .read_to_string(&mut input)
                .await
                .wrap_err("reading private key from stdin")?;
            Ok(Some(Zeroizing::new(
                input.trim_end_matches(['\r', '\n']).to_string(),
            )))
        }
        KeySource {
            address_only: true, ..
        } => Ok(None),
        KeySource { .. } => Err(eyre!(
            "one of --private-key, --private-key-stdin or --address-only is required"
        )),
    }
}

fn outcome(field: &str, value: bool, json: bool) -> String {
    if json {
        serde_json::json!({ field: value }).to_string()
    } else {
        format!("{field}: {value}")
    }
}

fn render_credential(credential: &WalletCredential, reveal: bool, json: bool) -> String {
    let key = credential.private_key();
    let key_len = credential.private_key_len();
    let shown = if reveal {
        key.map(|key| key.expose_secret().to_string())
    } else {
        None
    };

    if json {
        serde_json::json!({
            "address": credential.address(),
            "privateKey": shown,
            "privateKeyLength": key.map(|_| key_len),
        })
        .to_string()
    } else {
        let key_line = match (key, shown) {
            (None, _) => "<none>".to_string(),
            (Some(_), Some(shown)) => shown,
            (Some(_), None) => format!("<redacted, {key_len} bytes>"),
        };
        format!("address: {}\nprivate_key: {key_line}", credential.address())
    }
}

#[cfg(test)]
mod tests {
    use walletstore_core::platform::MemoryKeyValueStore;

    use super::*;

    fn memory_store() -> CredentialStore {
        CredentialStore::new(Arc::new(MemoryKeyValueStore::new()))
    }

    fn save_command(address: &str, key: Option<&str>) -> Command {
        Command::Save(cli::SaveArgs {
            address: address.to_string(),
            key: KeySource {
                private_key: key.map(ToString::to_string),
                private_key_stdin: false,
                address_only: key.is_none(),
            },
        })
    }

    #[tokio::test]
    async fn test_save_load_delete() {
        let store = memory_store();

        let (ok, output) = run(&store, save_command("Addr1", Some("Key1")), false)
            .await
            .unwrap();
        assert!(ok);
        assert_eq!(output.as_deref(), Some("saved: true"));

        let (ok, output) = run(&store, Command::Load { reveal: false }, false)
            .await
            .unwrap();
        assert!(ok);
        assert_eq!(
            output.as_deref(),
            Some("address: Addr1\nprivate_key: <redacted, 4 bytes>")
        );

        let (ok, output) = run(&store, Command::Load { reveal: true }, true)
            .await
            .unwrap();
        assert!(ok);
        let value: serde_json::Value = serde_json::from_str(&output.unwrap()).unwrap();
        assert_eq!(value["privateKey"], "Key1");
        assert_eq!(value["privateKeyLength"], 4);

        let (ok, _) = run(&store, Command::Delete, false).await.unwrap();
        assert!(ok);

        let (ok, output) = run(&store, Command::Load { reveal: false }, false)
            .await
            .unwrap();
        assert!(!ok);
        assert_eq!(output.as_deref(), Some("found: false"));
    }

    #[tokio::test]
    async fn test_save_rejects_empty_address() {
        let store = memory_store();
        let (ok, output) = run(&store, save_command("", Some("Key1")), true)
            .await
            .unwrap();
        assert!(!ok);
        assert_eq!(output.as_deref(), Some(r#"{"saved":false}"#));
    }

    #[tokio::test]
    async fn test_status() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(Arc::new(
            FileKeyValueStore::new(dir.path()).await.unwrap(),
        ));

        let (_, output) = run(&store, Command::Status, false).await.unwrap();
        assert_eq!(output.as_deref(), Some("empty"));

        run(&store, save_command("Addr1", None), false).await.unwrap();
        let (_, output) = run(&store, Command::Status, false).await.unwrap();
        assert_eq!(output.as_deref(), Some("present"));

        std::fs::write(dir.path().join("currentWallet"), "garbage").unwrap();
        let (_, output) = run(&store, Command::Status, true).await.unwrap();
        assert_eq!(output.as_deref(), Some(r#"{"status":"unreadable"}"#));

        std::fs::write(dir.path().join("currentWallet"), [0xff, 0xfe, b'{']).unwrap();
        let (_, output) = run(&store, Command::Status, false).await.unwrap();
        assert_eq!(output.as_deref(), Some("unreadable"));
    }

    #[test]
    fn test_render_degraded_record() {
        let credential = WalletCredential::address_only("Addr1");
        assert_eq!(
            render_credential(&credential, true, false),
            "address: Addr1\nprivate_key: <none>"
        );
        assert_eq!(
            render_credential(&credential, false, true),
            r#"{"address":"Addr1","privateKey":null,"privateKeyLength":null}"#
        );
    }
}
