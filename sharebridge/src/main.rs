//! Drive one share through the handler from the command line.
//!
//! Content references are read from the local file system, cached the same
//! way a platform share would be, and the payload the app shell would see is
//! printed as JSON on stdout.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use sharebridge::{
    init_tracing, load_settings, ContentUri, FsContentResolver, MethodCall, ShareAction,
    ShareChannel, ShareEvent, ShareHost, ShareIngestionBuffer, METHOD_GET_SHARED_DATA,
};

/// Simulate a share arriving at the app
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Settings file (defaults apply if it does not exist)
    #[arg(long, default_value = "sharebridge.json")]
    settings: PathBuf,

    /// Share action: SEND, SEND_MULTIPLE or a full platform action name
    #[arg(short, long, default_value = "SEND")]
    action: String,

    /// Declared MIME type of the shared content
    #[arg(short, long)]
    mime_type: Option<String>,

    /// Shared plain text
    #[arg(short, long)]
    text: Option<String>,

    /// Deliver to a running shell (onShared push) instead of a cold-start poll
    #[arg(long)]
    push: bool,

    /// Content references: file paths or URIs
    refs: Vec<String>,
}

fn parse_ref(input: &str) -> Result<ContentUri> {
    let path = Path::new(input);
    if path.exists() {
        let absolute = path
            .canonicalize()
            .with_context(|| format!("Failed to resolve {:?}", path))?;
        return Ok(ContentUri::from_path(&absolute)?);
    }
    Ok(ContentUri::parse(input)?)
}

fn build_event(args: &Args) -> Result<ShareEvent> {
    let refs = args
        .refs
        .iter()
        .map(|r| parse_ref(r))
        .collect::<Result<Vec<_>>>()?;

    let mut event = ShareEvent::new(ShareAction::from(args.action.clone()));
    event.mime_type = args.mime_type.clone();
    event.text = args.text.clone();

    if event.action == ShareAction::SendMultiple {
        event.content_refs = refs;
    } else {
        if refs.len() > 1 {
            warn!("Single-item share: only the first of {} references is used", refs.len());
        }
        event.content_ref = refs.into_iter().next();
    }
    Ok(event)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let settings = load_settings(&args.settings)
        .with_context(|| format!("Failed to load settings from {:?}", args.settings))?;
    init_tracing(&settings.log_filter)?;

    let cache = settings
        .open_cache()
        .with_context(|| format!("Failed to open cache at {:?}", settings.cache_dir))?;
    info!("Caching shared content in {}", cache.dir().display());

    let event = build_event(&args)?;
    let host = ShareHost::new(ShareIngestionBuffer::new(FsContentResolver::new(), cache));
    let (channel, mut rx) = ShareChannel::new(settings.channel_name.as_str());

    let output = if args.push {
        host.attach_channel(channel, None);
        host.on_new_event(Some(&event));
        let message = rx
            .try_recv()
            .context("Share push was not delivered to the shell")?;
        serde_json::to_string_pretty(&message)?
    } else {
        host.attach_channel(channel, Some(&event));
        let reply = host.handle_method_call(&MethodCall::new(METHOD_GET_SHARED_DATA));
        serde_json::to_string_pretty(&reply)?
    };

    println!("{}", output);
    Ok(())
}
