use std::path::PathBuf;

pub const DEFAULT_SERVICE_HOST: &str = "localhost";
pub const DEFAULT_SERVICE_PORT: u16 = 5000;

pub fn data_dir() -> PathBuf {
    // Keep ~/.local/share on macOS too instead of Application Support
    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".local")
            .join("share")
            .join("yt2mpv")
    }
    #[cfg(windows)]
    {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("yt2mpv")
    }
}

pub fn config_dir() -> PathBuf {
    // Portable install: config.toml next to the executable wins
    #[cfg(windows)]
    {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let portable_config = exe_dir.join("config.toml");
                if portable_config.exists() {
                    return exe_dir.to_path_buf();
                }
            }
        }
    }

    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("yt2mpv")
    }

    #[cfg(windows)]
    {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("yt2mpv")
    }
}

#[cfg(unix)]
fn notify_send_binary_names() -> &'static [&'static str] {
    &["notify-send"]
}

#[cfg(windows)]
fn notify_send_binary_names() -> &'static [&'static str] {
    &["notify-send.exe", "notify-send"]
}

fn find_on_path(names: &[&str]) -> Option<PathBuf> {
    let path = std::env::var("PATH").ok()?;
    #[cfg(unix)]
    let sep = ":";
    #[cfg(windows)]
    let sep = ";";
    for dir in path.split(sep) {
        for name in names {
            let p = PathBuf::from(dir).join(name);
            if p.exists() {
                return Some(p);
            }
        }
    }
    None
}

/// Find the `notify-send` binary used for desktop notifications.
///
/// `NOTIFY_SEND_PATH` overrides the PATH lookup.
pub fn find_notify_send_binary() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("NOTIFY_SEND_PATH") {
        let path = PathBuf::from(p);
        if path.exists() {
            return Some(path);
        }
    }
    find_on_path(notify_send_binary_names())
}
