use std::io::{self, Read, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use tracing::info;

use mcpe_api::{ApiConfig, ApiServer};
use mcpe_store::{DiskBackend, StoreError, StoreHandle, StoreOpener};
use mcpe_world::codec::{
    decode_key, decode_value, encode_key, encode_value, escape_segment, hex_dump,
};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let backend = DiskBackend::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Command::Api(args) => cmd_api(args),
        Command::Keys(args) => cmd_keys(&backend, &args.world, &mut out),
        Command::Get(args) => cmd_get(&backend, &args, &mut out),
        Command::Put(args) => cmd_put(&backend, &args, &mut io::stdin().lock()),
        Command::Delete(args) => cmd_delete(&backend, &args),
        Command::Develop(args) => cmd_develop(&backend, &args.world, &mut out),
    }
}

fn open_world(opener: &dyn StoreOpener, world: &Path) -> anyhow::Result<StoreHandle> {
    opener
        .open(world)
        .with_context(|| format!("opening world {}", world.display()))
}

fn parse_key(key: &str) -> anyhow::Result<Vec<u8>> {
    decode_key(key).with_context(|| format!("decoding key \"{key}\""))
}

fn cmd_keys(opener: &dyn StoreOpener, world: &Path, out: &mut dyn Write) -> anyhow::Result<()> {
    let store = open_world(opener, world)?;
    for key in store.keys()? {
        writeln!(out, "{}", encode_key(&key))?;
    }
    store.close()?;
    Ok(())
}

fn cmd_get(opener: &dyn StoreOpener, args: &GetArgs, out: &mut dyn Write) -> anyhow::Result<()> {
    let key = parse_key(&args.key)?;
    let store = open_world(opener, &args.world)?;
    let value = store
        .get(&key)?
        .ok_or_else(|| StoreError::KeyNotFound(encode_key(&key)))?;
    store.close()?;

    if args.dump {
        write!(out, "{}", hex_dump(&value))?;
    } else {
        writeln!(out, "{}", encode_value(&value))?;
    }
    Ok(())
}

fn cmd_put(opener: &dyn StoreOpener, args: &KeyArgs, input: &mut dyn Read) -> anyhow::Result<()> {
    let key = parse_key(&args.key)?;
    let mut text = String::new();
    input.read_to_string(&mut text).context("reading value from stdin")?;
    let value = decode_value(&text).context("decoding base64 value")?;

    let store = open_world(opener, &args.world)?;
    store.put(&key, &value)?;
    store.close()?;
    Ok(())
}

fn cmd_delete(opener: &dyn StoreOpener, args: &KeyArgs) -> anyhow::Result<()> {
    let key = parse_key(&args.key)?;
    let store = open_world(opener, &args.world)?;
    store.delete(&key)?;
    store.close()?;
    Ok(())
}

fn cmd_develop(opener: &dyn StoreOpener, world: &Path, out: &mut dyn Write) -> anyhow::Result<()> {
    let store = open_world(opener, world)?;
    let keys = store.keys()?;
    writeln!(out, "{} {}", "Path:".bold(), store.path().display())?;
    writeln!(out, "{} {}", "Keys:".bold(), keys.len())?;
    for key in &keys {
        let size = store.get(key)?.map_or(0, |v| v.len());
        writeln!(out, "  {} ({size} bytes)", encode_key(key).cyan())?;
    }
    store.close()?;
    Ok(())
}

fn cmd_api(args: ApiArgs) -> anyhow::Result<()> {
    let opener: Arc<dyn StoreOpener> = Arc::new(DiskBackend::new());
    let store = open_world(opener.as_ref(), &args.world)?;

    let file = args.config.as_deref().map(ApiConfig::load).transpose()?;
    let config = resolve_api_config(&args, file, store.path())?;

    if let Some(name) = store.path().file_name() {
        info!(
            "serving world at http://{}{}{}/",
            config.bind_addr,
            config.mount_prefix(),
            escape_segment(&name.to_string_lossy())
        );
    }

    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    runtime.block_on(ApiServer::new(config, opener).serve())?;
    store.close()?;
    Ok(())
}

/// Merge flags over the config file over defaults. The worlds root falls
/// back to the directory containing `world`.
fn resolve_api_config(
    args: &ApiArgs,
    file: Option<ApiConfig>,
    world: &Path,
) -> anyhow::Result<ApiConfig> {
    let mut config = file.unwrap_or_default();
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(mount) = &args.mount {
        config.mount = mount.clone();
    }
    let worlds_root = match (&args.worlds_root, config.worlds_root.take()) {
        (Some(root), _) => root.clone(),
        (None, Some(root)) => root,
        (None, None) => world
            .parent()
            .map(Path::to_path_buf)
            .context("world has no parent directory")?,
    };
    config.worlds_root = Some(worlds_root);
    Ok(config)
}
