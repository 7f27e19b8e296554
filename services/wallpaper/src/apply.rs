//! Setting the desktop background through the operating system.

use std::path::{Path, PathBuf};
use std::process::Command;

use himawari_common::ApplyError;
use tracing::{debug, info};

/// Sets an image file as the desktop background.
pub trait WallpaperApplier: Send + Sync {
    fn apply(&self, path: &Path) -> Result<(), ApplyError>;
}

/// Applies the wallpaper with the platform's own tooling.
///
/// Windows calls `SystemParametersInfoW(SPI_SETDESKWALLPAPER)` through
/// PowerShell, macOS uses `osascript`, other Unix desktops use GNOME's
/// `gsettings`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemWallpaper;

impl WallpaperApplier for SystemWallpaper {
    fn apply(&self, path: &Path) -> Result<(), ApplyError> {
        if !path.is_file() {
            return Err(ApplyError::MissingImage(path.to_path_buf()));
        }
        let path = absolute_path(path)?;

        let plan = wallpaper_commands(std::env::consts::OS, &path)?;
        for (mut command, required) in plan {
            match run(&mut command) {
                Ok(()) => {}
                Err(e) if !required => {
                    debug!(error = %e, "Optional wallpaper command failed");
                }
                Err(e) => return Err(e),
            }
        }

        info!(path = %path.display(), "Wallpaper applied");
        Ok(())
    }
}

fn absolute_path(path: &Path) -> Result<PathBuf, ApplyError> {
    let canonical = path
        .canonicalize()
        .map_err(|_| ApplyError::MissingImage(path.to_path_buf()))?;

    // Strip the verbatim prefix Windows adds; the shell APIs reject it.
    let text = canonical.to_string_lossy();
    match text.strip_prefix(r"\\?\") {
        Some(stripped) => Ok(PathBuf::from(stripped)),
        None => Ok(canonical),
    }
}

/// Commands that set `path` as the wallpaper on `os`, each flagged as
/// required or best-effort.
pub fn wallpaper_commands(os: &'static str, path: &Path) -> Result<Vec<(Command, bool)>, ApplyError> {
    let path_str = path.to_string_lossy();

    match os {
        "windows" => {
            let script = format!(
                "Add-Type -TypeDefinition 'using System.Runtime.InteropServices; \
                 public class Wallpaper {{ [DllImport(\"user32.dll\", CharSet = CharSet.Unicode)] \
                 public static extern int SystemParametersInfo(int uAction, int uParam, string lpvParam, int fuWinIni); }}'; \
                 if ([Wallpaper]::SystemParametersInfo(20, 0, '{}', 3) -eq 0) {{ exit 1 }}",
                path_str.replace('\'', "''")
            );
            let mut cmd = Command::new("powershell");
            cmd.args(["-NoProfile", "-NonInteractive", "-Command", &script]);
            Ok(vec![(cmd, true)])
        }
        "macos" => {
            let script = format!(
                "tell application \"System Events\" to tell every desktop to set picture to \"{}\"",
                path_str.replace('\\', "\\\\").replace('"', "\\\"")
            );
            let mut cmd = Command::new("osascript");
            cmd.args(["-e", &script]);
            Ok(vec![(cmd, true)])
        }
        "linux" | "freebsd" | "openbsd" | "netbsd" | "dragonfly" => {
            let uri = format!("file://{}", path_str);
            let mut light = Command::new("gsettings");
            light.args(["set", "org.gnome.desktop.background", "picture-uri", &uri]);
            // Older GNOME releases have no dark-mode key.
            let mut dark = Command::new("gsettings");
            dark.args(["set", "org.gnome.desktop.background", "picture-uri-dark", &uri]);
            Ok(vec![(light, true), (dark, false)])
        }
        other => Err(ApplyError::Unsupported(other)),
    }
}

fn run(command: &mut Command) -> Result<(), ApplyError> {
    let program = command.get_program().to_string_lossy().into_owned();
    debug!(command = %program, "Running wallpaper command");

    let output = command.output().map_err(|e| ApplyError::CommandFailed {
        command: program.clone(),
        message: e.to_string(),
    })?;

    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    Err(ApplyError::CommandFailed {
        command: program,
        message: if stderr.is_empty() {
            output.status.to_string()
        } else {
            stderr
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(cmd: &Command) -> Vec<String> {
        cmd.get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = SystemWallpaper
            .apply(Path::new("/no/such/wallpaper.jpg"))
            .unwrap_err();
        assert!(matches!(err, ApplyError::MissingImage(_)));
    }

    #[test]
    fn test_linux_sets_light_and_dark_uri() {
        let plan = wallpaper_commands("linux", Path::new("/tmp/out/wallpaper.jpg")).unwrap();
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].0.get_program(), "gsettings");
        assert!(plan[0].1);
        assert!(!plan[1].1);
        assert_eq!(
            args(&plan[0].0),
            vec![
                "set",
                "org.gnome.desktop.background",
                "picture-uri",
                "file:///tmp/out/wallpaper.jpg"
            ]
        );
        assert_eq!(args(&plan[1].0)[2], "picture-uri-dark");
    }

    #[test]
    fn test_windows_uses_spi_setdeskwallpaper() {
        let plan = wallpaper_commands("windows", Path::new(r"C:\Users\o'neil\wallpaper.jpg")).unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].0.get_program(), "powershell");
        let script = args(&plan[0].0).pop().unwrap();
        assert!(script.contains("SystemParametersInfo(20, 0, 'C:\\Users\\o''neil\\wallpaper.jpg', 3)"));
    }

    #[test]
    fn test_macos_quotes_path() {
        let plan = wallpaper_commands("macos", Path::new("/Users/me/a \"b\".jpg")).unwrap();
        let script = args(&plan[0].0).pop().unwrap();
        assert!(script.contains("set picture to \"/Users/me/a \\\"b\\\".jpg\""));
    }

    #[test]
    fn test_unknown_platform_unsupported() {
        let err = wallpaper_commands("haiku", Path::new("/x.jpg")).unwrap_err();
        assert!(matches!(err, ApplyError::Unsupported("haiku")));
    }
}
