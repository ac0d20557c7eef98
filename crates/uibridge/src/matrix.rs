use std::collections::HashSet;
use std::env::consts::{DLL_PREFIX, DLL_SUFFIX};
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use once_cell::sync::OnceCell;
use uibridge_sdk::toolkit;

/// One row of the built-in wrap table: a known pairing, the module that
/// serves it, and the adaptation quality.
#[derive(Debug)]
pub(crate) struct WrapTableEntry {
    pub host_toolkit: &'static str,
    pub ui_toolkit: &'static str,
    /// Module basename; the platform dynamic-library prefix and suffix are
    /// added when probing the module directory.
    pub module: &'static str,
    pub quality: u32,
}

/// Pairings served by the stock module set, in priority order: embedding a
/// raw native window beats bridging two widget toolkits, which beats any
/// generic fallback. Ties in quality are broken by position in this table,
/// never by filesystem order, so selection is deterministic across
/// platforms.
pub(crate) const WRAP_TABLE: &[WrapTableEntry] = &[
    // Native-window embeddings: the UI already speaks the platform's
    // windowing layer, the module only reparents it.
    WrapTableEntry {
        host_toolkit: toolkit::GTK3,
        ui_toolkit: toolkit::X11,
        module: "uibridge_x11_in_gtk3",
        quality: 2,
    },
    WrapTableEntry {
        host_toolkit: toolkit::QT5,
        ui_toolkit: toolkit::X11,
        module: "uibridge_x11_in_qt5",
        quality: 2,
    },
    WrapTableEntry {
        host_toolkit: toolkit::GTK3,
        ui_toolkit: toolkit::WINDOWS,
        module: "uibridge_win_in_gtk3",
        quality: 2,
    },
    WrapTableEntry {
        host_toolkit: toolkit::GTK3,
        ui_toolkit: toolkit::COCOA,
        module: "uibridge_cocoa_in_gtk3",
        quality: 2,
    },
    // Cross-toolkit bridges: two widget toolkits, two event loops.
    WrapTableEntry {
        host_toolkit: toolkit::GTK3,
        ui_toolkit: toolkit::QT5,
        module: "uibridge_qt5_in_gtk3",
        quality: 3,
    },
    WrapTableEntry {
        host_toolkit: toolkit::QT5,
        ui_toolkit: toolkit::GTK3,
        module: "uibridge_gtk3_in_qt5",
        quality: 3,
    },
];

pub(crate) fn module_file_name(base: &str) -> String {
    format!("{DLL_PREFIX}{base}{DLL_SUFFIX}")
}

/// Answers "can this pairing be wrapped, and how well?" for dynamically
/// installed modules.
///
/// Backed by the built-in wrap table filtered to modules actually present
/// in the module directory. The directory is listed once, at first query,
/// and the listing is held for the life of the registry: quality answers
/// are stable within a process, modules are not hot-swapped.
pub struct SupportMatrix {
    dir: PathBuf,
    installed: OnceCell<HashSet<String>>,
}

impl SupportMatrix {
    pub(crate) fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            installed: OnceCell::new(),
        }
    }

    pub fn module_dir(&self) -> &Path {
        &self.dir
    }

    /// Quality rank for a pairing: 1 for identical toolkits (native, no
    /// module involved), 0 when no installed module serves it.
    pub fn query(&self, host_toolkit: &str, ui_toolkit: &str) -> u32 {
        if host_toolkit == ui_toolkit {
            return 1;
        }
        self.best(host_toolkit, ui_toolkit)
            .map(|entry| entry.quality)
            .unwrap_or(0)
    }

    /// Best installed table entry for a pairing, honoring table order on
    /// quality ties.
    pub(crate) fn best(&self, host_toolkit: &str, ui_toolkit: &str) -> Option<&WrapTableEntry> {
        let mut best: Option<&WrapTableEntry> = None;
        for entry in WRAP_TABLE {
            if entry.host_toolkit != host_toolkit || entry.ui_toolkit != ui_toolkit {
                continue;
            }
            if !self.installed().contains(&module_file_name(entry.module)) {
                continue;
            }
            if best.map(|b| entry.quality < b.quality).unwrap_or(true) {
                best = Some(entry);
            }
        }
        best
    }

    pub(crate) fn module_path(&self, entry: &WrapTableEntry) -> PathBuf {
        self.dir.join(module_file_name(entry.module))
    }

    fn installed(&self) -> &HashSet<String> {
        self.installed.get_or_init(|| {
            let mut found = HashSet::new();
            match fs::read_dir(&self.dir) {
                Ok(entries) => {
                    for entry in entries.flatten() {
                        if let Some(name) = entry.file_name().to_str() {
                            found.insert(name.to_string());
                        }
                    }
                    debug!(
                        "scanned module dir {}: {} candidate file(s)",
                        self.dir.display(),
                        found.len()
                    );
                }
                Err(err) => {
                    // A missing module directory just means no dynamic
                    // modules; hosts probing support expect rank 0, not an
                    // error.
                    warn!("module dir {} unreadable: {err}", self.dir.display());
                }
            }
            found
        })
    }
}
