//! Playback - player region state and the local player process
//!
//! Source URLs are embed pages, so binding one opens it in the system
//! browser by default; mpv and VLC are supported for direct links.

use serde::Deserialize;
use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::process::Stdio;
use std::str::FromStr;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, Command};

use crate::models::Source;

// =============================================================================
// Player Region State
// =============================================================================

/// What the player region currently shows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerState {
    /// Bound source URL
    pub url: Option<String>,
    /// "Now Playing - {name}"
    pub label: Option<String>,
    pub visible: bool,
    /// Index of the active source button
    pub active: Option<usize>,
    pub fullscreen: bool,
}

impl PlayerState {
    /// Bind a source, making `index` the only active button
    pub fn bind(&mut self, source: &Source, index: usize) {
        self.url = Some(source.url.clone());
        self.label = Some(format!("Now Playing - {}", source.name));
        self.visible = true;
        self.active = Some(index);
        self.fullscreen = false;
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.active == Some(index)
    }
}

// =============================================================================
// Player Kinds
// =============================================================================

/// Supported local players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerKind {
    /// System browser (default; sources are embed pages)
    #[default]
    Browser,
    /// mpv media player
    Mpv,
    /// VLC media player
    Vlc,
    /// Bind without launching anything
    None,
}

impl PlayerKind {
    /// Get the command name for this player
    pub fn command(&self) -> &'static str {
        match self {
            PlayerKind::Browser => {
                #[cfg(target_os = "macos")]
                return "open";
                #[cfg(target_os = "windows")]
                return "explorer";
                #[cfg(not(any(target_os = "macos", target_os = "windows")))]
                return "xdg-open";
            }
            PlayerKind::Mpv => "mpv",
            PlayerKind::Vlc => {
                #[cfg(target_os = "macos")]
                if std::path::Path::new("/Applications/VLC.app").exists() {
                    return "/Applications/VLC.app/Contents/MacOS/VLC";
                }
                "vlc"
            }
            PlayerKind::None => "",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PlayerKind::Browser => "browser",
            PlayerKind::Mpv => "mpv",
            PlayerKind::Vlc => "VLC",
            PlayerKind::None => "none",
        }
    }
}

impl fmt::Display for PlayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for PlayerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "browser" => Ok(PlayerKind::Browser),
            "mpv" => Ok(PlayerKind::Mpv),
            "vlc" => Ok(PlayerKind::Vlc),
            "none" => Ok(PlayerKind::None),
            other => Err(format!("unknown player: {}", other)),
        }
    }
}

// =============================================================================
// Fullscreen Capability Chain
// =============================================================================

/// Known fullscreen mechanisms, in detection order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullscreenApi {
    /// mpv JSON IPC `set_property`
    Standard,
    /// VLC remote-control interface
    Prefixed,
    /// Relaunch the player with `--fullscreen`
    Legacy,
}

impl FullscreenApi {
    pub const ALL: [FullscreenApi; 3] = [
        FullscreenApi::Standard,
        FullscreenApi::Prefixed,
        FullscreenApi::Legacy,
    ];
}

impl fmt::Display for FullscreenApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FullscreenApi::Standard => write!(f, "ipc"),
            FullscreenApi::Prefixed => write!(f, "remote-control"),
            FullscreenApi::Legacy => write!(f, "relaunch"),
        }
    }
}

/// Something that may be able to go fullscreen
pub trait FullscreenTarget {
    fn supports(&self, api: FullscreenApi) -> bool;

    fn enter(&mut self, api: FullscreenApi)
        -> impl Future<Output = Result<(), PlayerError>> + Send;
}

/// Enter fullscreen through the first supported mechanism that succeeds
///
/// A failing mechanism falls through to the next one. Returns the mechanism
/// used, or `None` when nothing is supported or every attempt failed.
pub async fn request_fullscreen<T: FullscreenTarget>(target: &mut T) -> Option<FullscreenApi> {
    for api in FullscreenApi::ALL {
        if !target.supports(api) {
            continue;
        }
        match target.enter(api).await {
            Ok(()) => {
                tracing::info!(%api, "entered fullscreen");
                return Some(api);
            }
            Err(e) => tracing::warn!(%api, error = %e, "fullscreen request failed"),
        }
    }
    None
}

// =============================================================================
// Local Player
// =============================================================================

/// Errors from local player operations
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("Player '{0}' not found. Install it first.")]
    NotFound(String),
    #[error("Failed to start player: {0}")]
    StartFailed(std::io::Error),
    #[error("Player control failed: {0}")]
    Control(#[from] std::io::Error),
    #[error("Fullscreen via {0} is not available")]
    Unsupported(FullscreenApi),
}

/// Local player process for bound sources
#[derive(Debug, Default)]
pub struct LocalPlayer {
    kind: PlayerKind,
    mpv_ipc_socket: Option<PathBuf>,
    vlc_rc_port: Option<u16>,
    child: Option<Child>,
    current_url: Option<String>,
}

impl LocalPlayer {
    pub fn new(kind: PlayerKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    /// Enable mpv's JSON IPC server at `path`
    pub fn with_mpv_ipc(mut self, path: impl Into<PathBuf>) -> Self {
        self.mpv_ipc_socket = Some(path.into());
        self
    }

    /// Enable VLC's remote-control interface on localhost:`port`
    pub fn with_vlc_rc(mut self, port: u16) -> Self {
        self.vlc_rc_port = Some(port);
        self
    }

    pub fn kind(&self) -> PlayerKind {
        self.kind
    }

    pub fn current_url(&self) -> Option<&str> {
        self.current_url.as_deref()
    }

    /// Check if the player is available on the system
    pub async fn is_available(&self) -> bool {
        let cmd = self.kind.command();
        if cmd.is_empty() {
            return true;
        }
        if cmd.starts_with('/') {
            return std::path::Path::new(cmd).exists();
        }

        Command::new("which")
            .arg(cmd)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Bind a new URL, replacing whatever is playing
    pub async fn play(&mut self, url: &str) -> Result<(), PlayerError> {
        self.launch(url, false).await
    }

    /// Play a URL and wait for the player to close
    pub async fn play_and_wait(&mut self, url: &str, fullscreen: bool) -> Result<(), PlayerError> {
        self.launch(url, fullscreen).await?;
        if let Some(mut child) = self.child.take() {
            let _ = child.wait().await;
        }
        Ok(())
    }

    /// Kill the running player, if any
    pub async fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.kill().await {
                tracing::debug!(error = %e, "player already exited");
            }
        }
    }

    async fn launch(&mut self, url: &str, fullscreen: bool) -> Result<(), PlayerError> {
        self.stop().await;
        self.current_url = Some(url.to_string());

        let mut cmd = match self.kind {
            PlayerKind::None => return Ok(()),
            PlayerKind::Browser => {
                let mut cmd = Command::new(self.kind.command());
                cmd.arg(url);
                cmd
            }
            PlayerKind::Mpv => {
                let mut cmd = Command::new(self.kind.command());
                cmd.arg(url).arg("--force-window=immediate");
                if let Some(socket) = &self.mpv_ipc_socket {
                    cmd.arg(format!("--input-ipc-server={}", socket.display()));
                }
                if fullscreen {
                    cmd.arg("--fullscreen");
                }
                cmd
            }
            PlayerKind::Vlc => {
                let mut cmd = Command::new(self.kind.command());
                cmd.arg(url).arg("--no-video-title-show");
                if let Some(port) = self.vlc_rc_port {
                    cmd.arg("--extraintf=rc")
                        .arg(format!("--rc-host=127.0.0.1:{}", port));
                }
                if fullscreen {
                    cmd.arg("--fullscreen");
                }
                cmd
            }
        };

        cmd.stdout(Stdio::null());
        cmd.stderr(Stdio::null());

        let child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PlayerError::NotFound(self.kind.command().to_string())
            } else {
                PlayerError::StartFailed(e)
            }
        })?;
        tracing::info!(player = %self.kind, %url, "player launched");

        // The opener hands off to the browser and exits
        if self.kind != PlayerKind::Browser {
            self.child = Some(child);
        }
        Ok(())
    }

    #[cfg(unix)]
    async fn mpv_set_fullscreen(&self) -> Result<(), PlayerError> {
        let path = self
            .mpv_ipc_socket
            .as_ref()
            .ok_or(PlayerError::Unsupported(FullscreenApi::Standard))?;
        let mut stream = tokio::net::UnixStream::connect(path).await?;
        stream
            .write_all(b"{\"command\":[\"set_property\",\"fullscreen\",true]}\n")
            .await?;
        Ok(())
    }

    #[cfg(not(unix))]
    async fn mpv_set_fullscreen(&self) -> Result<(), PlayerError> {
        Err(PlayerError::Unsupported(FullscreenApi::Standard))
    }

    async fn vlc_set_fullscreen(&self) -> Result<(), PlayerError> {
        let port = self
            .vlc_rc_port
            .ok_or(PlayerError::Unsupported(FullscreenApi::Prefixed))?;
        let mut stream = tokio::net::TcpStream::connect(("127.0.0.1", port)).await?;
        stream.write_all(b"fullscreen on\n").await?;
        Ok(())
    }
}

impl FullscreenTarget for LocalPlayer {
    fn supports(&self, api: FullscreenApi) -> bool {
        if self.current_url.is_none() {
            return false;
        }
        match (api, self.kind) {
            (FullscreenApi::Standard, PlayerKind::Mpv) => {
                cfg!(unix) && self.mpv_ipc_socket.is_some()
            }
            (FullscreenApi::Prefixed, PlayerKind::Vlc) => self.vlc_rc_port.is_some(),
            (FullscreenApi::Legacy, PlayerKind::Mpv | PlayerKind::Vlc) => true,
            _ => false,
        }
    }

    async fn enter(&mut self, api: FullscreenApi) -> Result<(), PlayerError> {
        match api {
            FullscreenApi::Standard => self.mpv_set_fullscreen().await,
            FullscreenApi::Prefixed => self.vlc_set_fullscreen().await,
            FullscreenApi::Legacy => {
                let url = self
                    .current_url
                    .clone()
                    .ok_or(PlayerError::Unsupported(api))?;
                self.launch(&url, true).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    fn source(name: &str) -> Source {
        Source {
            url: format!("https://embed.example/{}", name),
            name: name.to_string(),
            quality: "HD".to_string(),
            has_subtitles: true,
        }
    }

    #[derive(Default)]
    struct FakeTarget {
        supported: Vec<FullscreenApi>,
        entered: Vec<FullscreenApi>,
        failing: Vec<FullscreenApi>,
    }

    impl FullscreenTarget for FakeTarget {
        fn supports(&self, api: FullscreenApi) -> bool {
            self.supported.contains(&api)
        }

        async fn enter(&mut self, api: FullscreenApi) -> Result<(), PlayerError> {
            self.entered.push(api);
            if self.failing.contains(&api) {
                Err(PlayerError::Unsupported(api))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_bind_sets_label_and_active() {
        let mut state = PlayerState::default();
        state.bind(&source("VidSrc"), 2);
        assert_eq!(state.url.as_deref(), Some("https://embed.example/VidSrc"));
        assert_eq!(state.label.as_deref(), Some("Now Playing - VidSrc"));
        assert!(state.visible);
        assert!(state.is_active(2));
        assert!(!state.is_active(0));
    }

    #[test]
    fn test_player_kind_parse() {
        assert_eq!("mpv".parse::<PlayerKind>(), Ok(PlayerKind::Mpv));
        assert_eq!("VLC".parse::<PlayerKind>(), Ok(PlayerKind::Vlc));
        assert_eq!(PlayerKind::default(), PlayerKind::Browser);
        assert!("chromecast".parse::<PlayerKind>().is_err());
    }

    #[test]
    fn test_player_kind_command() {
        let vlc_cmd = PlayerKind::Vlc.command();
        assert!(vlc_cmd == "vlc" || vlc_cmd == "/Applications/VLC.app/Contents/MacOS/VLC");
        assert_eq!(PlayerKind::Mpv.command(), "mpv");
        assert_eq!(PlayerKind::None.command(), "");
    }

    #[tokio::test]
    async fn test_chain_uses_first_supported() {
        let mut target = FakeTarget {
            supported: vec![FullscreenApi::Prefixed, FullscreenApi::Legacy],
            ..Default::default()
        };
        assert_eq!(
            request_fullscreen(&mut target).await,
            Some(FullscreenApi::Prefixed)
        );
        assert_eq!(target.entered, vec![FullscreenApi::Prefixed]);
    }

    #[tokio::test]
    async fn test_chain_silent_when_unsupported() {
        let mut target = FakeTarget::default();
        assert_eq!(request_fullscreen(&mut target).await, None);
        assert!(target.entered.is_empty());
    }

    #[tokio::test]
    async fn test_chain_reports_failure() {
        let mut target = FakeTarget {
            supported: vec![FullscreenApi::Standard],
            failing: vec![FullscreenApi::Standard],
            ..Default::default()
        };
        assert_eq!(request_fullscreen(&mut target).await, None);
        assert_eq!(target.entered, vec![FullscreenApi::Standard]);
    }

    #[tokio::test]
    async fn test_chain_falls_through_on_failure() {
        let mut target = FakeTarget {
            supported: vec![FullscreenApi::Standard, FullscreenApi::Legacy],
            failing: vec![FullscreenApi::Standard],
            ..Default::default()
        };
        assert_eq!(
            request_fullscreen(&mut target).await,
            Some(FullscreenApi::Legacy)
        );
        assert_eq!(
            target.entered,
            vec![FullscreenApi::Standard, FullscreenApi::Legacy]
        );
    }

    #[tokio::test]
    async fn test_none_player_binds_without_launch() {
        let mut player = LocalPlayer::new(PlayerKind::None);
        player.play("https://embed.example/a").await.unwrap();
        assert_eq!(player.current_url(), Some("https://embed.example/a"));
        for api in FullscreenApi::ALL {
            assert!(!player.supports(api));
        }
        assert_eq!(request_fullscreen(&mut player).await, None);
    }

    #[test]
    fn test_browser_supports_nothing() {
        let player = LocalPlayer {
            current_url: Some("https://embed.example/a".into()),
            ..LocalPlayer::new(PlayerKind::Browser)
        };
        for api in FullscreenApi::ALL {
            assert!(!player.supports(api));
        }
    }

    #[test]
    fn test_unbound_player_supports_nothing() {
        let player = LocalPlayer::new(PlayerKind::Mpv).with_mpv_ipc("/tmp/mpv.sock");
        assert!(!player.supports(FullscreenApi::Standard));
        assert!(!player.supports(FullscreenApi::Legacy));
    }

    #[tokio::test]
    async fn test_vlc_remote_control_command() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let mut player = LocalPlayer {
            current_url: Some("https://embed.example/a".into()),
            ..LocalPlayer::new(PlayerKind::Vlc).with_vlc_rc(port)
        };
        assert!(player.supports(FullscreenApi::Prefixed));
        assert!(!player.supports(FullscreenApi::Standard));

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = String::new();
            socket.read_to_string(&mut buf).await.unwrap();
            buf
        });

        assert_eq!(
            request_fullscreen(&mut player).await,
            Some(FullscreenApi::Prefixed)
        );
        drop(player);
        assert_eq!(server.await.unwrap(), "fullscreen on\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_mpv_ipc_command() {
        let path = std::env::temp_dir().join(format!("streamagg-mpv-{}.sock", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let listener = tokio::net::UnixListener::bind(&path).unwrap();

        let mut player = LocalPlayer {
            current_url: Some("https://example.com/video.m3u8".into()),
            ..LocalPlayer::new(PlayerKind::Mpv).with_mpv_ipc(&path)
        };

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = String::new();
            socket.read_to_string(&mut buf).await.unwrap();
            buf
        });

        assert_eq!(
            request_fullscreen(&mut player).await,
            Some(FullscreenApi::Standard)
        );
        let received = server.await.unwrap();
        assert!(received.contains("\"set_property\",\"fullscreen\",true"));
        let _ = std::fs::remove_file(&path);
    }
}
