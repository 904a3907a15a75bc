use std::io::{self, Write};

use anyhow::{Result, anyhow, bail};
use grua_console::page::{BannerKind, PageChrome};

pub(super) fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

/// Fails when loading the page left a danger banner.
pub(super) fn ensure_loaded(chrome: &PageChrome) -> Result<()> {
    if let Some(banner) = chrome.banner()
        && banner.kind == BannerKind::Danger
    {
        bail!("failed to load page: {}", banner.text);
    }
    Ok(())
}

/// Prints the banner of a finished commit, or fails with its text.
pub(super) fn report_commit(outcome: grua_console::Result<()>, chrome: &PageChrome) -> Result<()> {
    match outcome {
        Ok(()) => print_json(&chrome.banner()),
        Err(err) => {
            let text = chrome
                .banner()
                .map_or_else(|| err.banner_text(), |banner| banner.text.clone());
            Err(anyhow!(text).context(format!("commit failed ({})", err.code())))
        }
    }
}
