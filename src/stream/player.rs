//! mpv media element
//!
//! Runs mpv as a separate idle process and drives it over its JSON IPC
//! socket. Position, duration and pause state are tracked from observed
//! property changes; `end-file` with reason `eof` becomes `Ended`.

use serde_json::{json, Value};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::time::Duration;

#[cfg(unix)]
use std::os::unix::net::UnixStream;

use super::media::{MediaElement, MediaError, MediaEvent};

/// Scale of the always-on-top window used for picture-in-picture
const PIP_WINDOW_SCALE: f64 = 0.4;

/// How long to wait for mpv to create its IPC socket
const CONNECT_ATTEMPTS: u32 = 40;
const CONNECT_DELAY: Duration = Duration::from_millis(50);

const OBSERVE_TIME_POS: u64 = 1;
const OBSERVE_DURATION: u64 = 2;
const OBSERVE_PAUSE: u64 = 3;

/// Which media element to drive
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PlayerKind {
    /// mpv over JSON IPC (default)
    #[default]
    Mpv,
    /// In-memory simulation, no video output
    Headless,
}

impl PlayerKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            PlayerKind::Mpv => "mpv",
            PlayerKind::Headless => "headless",
        }
    }
}

impl std::fmt::Display for PlayerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// mpv process plus IPC connection, spawned lazily on first load
pub struct MpvPlayer {
    command: String,
    pip_enabled: bool,
    socket_path: PathBuf,
    process: Option<Child>,
    #[cfg(unix)]
    connection: Option<BufReader<UnixStream>>,
    /// Partial line carried over between non-blocking reads
    partial: String,
    request_id: u64,
    position: f64,
    duration: Option<f64>,
    paused: bool,
    pip: bool,
    has_source: bool,
    events: Vec<MediaEvent>,
}

impl MpvPlayer {
    pub fn new(command: impl Into<String>, pip_enabled: bool) -> Self {
        let socket_path =
            std::env::temp_dir().join(format!("hlsdeck-mpv-{}.sock", uuid::Uuid::new_v4()));
        Self {
            command: command.into(),
            pip_enabled,
            socket_path,
            process: None,
            #[cfg(unix)]
            connection: None,
            partial: String::new(),
            request_id: 1,
            position: 0.0,
            duration: None,
            paused: true,
            pip: false,
            has_source: false,
            events: Vec::new(),
        }
    }

    /// Spawn mpv and connect if it is not running
    fn ensure_running(&mut self) -> Result<(), MediaError> {
        let alive = match self.process.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        };
        if alive {
            return Ok(());
        }
        self.spawn()
    }

    #[cfg(unix)]
    fn spawn(&mut self) -> Result<(), MediaError> {
        use std::os::unix::process::CommandExt;

        let _ = std::fs::remove_file(&self.socket_path);

        let mut cmd = Command::new(&self.command);
        cmd.arg(format!("--input-ipc-server={}", self.socket_path.display()))
            .arg("--idle=yes") // Stay alive between files
            .arg("--force-window=yes")
            .arg("--keep-open=no")
            .arg("--no-terminal") // The TUI owns the terminal
            .arg("--osc=yes")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        // Own session so terminal signals aimed at the TUI never reach mpv
        unsafe {
            cmd.pre_exec(|| {
                libc::setsid();
                Ok(())
            });
        }

        tracing::info!(command = %self.command, socket = %self.socket_path.display(), "spawning mpv");
        let child = cmd.spawn().map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                MediaError::NotFound(self.command.clone())
            } else {
                MediaError::StartFailed(e)
            }
        })?;
        self.process = Some(child);

        let stream = self.connect()?;
        stream.set_nonblocking(true)?;
        self.connection = Some(BufReader::new(stream));
        self.partial.clear();

        self.send(json!(["observe_property", OBSERVE_TIME_POS, "time-pos"]))?;
        self.send(json!(["observe_property", OBSERVE_DURATION, "duration"]))?;
        self.send(json!(["observe_property", OBSERVE_PAUSE, "pause"]))?;
        Ok(())
    }

    #[cfg(not(unix))]
    fn spawn(&mut self) -> Result<(), MediaError> {
        Err(MediaError::Unsupported)
    }

    #[cfg(unix)]
    fn connect(&self) -> Result<UnixStream, MediaError> {
        let mut last_err = None;
        for _ in 0..CONNECT_ATTEMPTS {
            match UnixStream::connect(&self.socket_path) {
                Ok(stream) => return Ok(stream),
                Err(e) => {
                    last_err = Some(e);
                    std::thread::sleep(CONNECT_DELAY);
                }
            }
        }
        Err(MediaError::Ipc(last_err.unwrap_or_else(|| {
            std::io::Error::new(ErrorKind::TimedOut, "mpv IPC socket never appeared")
        })))
    }

    /// Send one IPC command
    #[cfg(unix)]
    fn send(&mut self, command: Value) -> Result<(), MediaError> {
        let message = json!({
            "command": command,
            "request_id": self.request_id,
        });
        self.request_id += 1;

        let conn = self.connection.as_mut().ok_or(MediaError::NoSource)?;
        let stream = conn.get_mut();
        writeln!(stream, "{}", message)?;
        stream.flush()?;
        Ok(())
    }

    #[cfg(not(unix))]
    fn send(&mut self, _command: Value) -> Result<(), MediaError> {
        Err(MediaError::Unsupported)
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<(), MediaError> {
        self.send(json!(["set_property", name, value]))
    }

    /// Read every complete IPC line currently buffered
    #[cfg(unix)]
    fn read_messages(&mut self) {
        let Some(conn) = self.connection.as_mut() else {
            return;
        };

        let mut lines = Vec::new();
        loop {
            match conn.read_line(&mut self.partial) {
                Ok(0) => break,
                Ok(_) => {
                    if self.partial.ends_with('\n') {
                        lines.push(std::mem::take(&mut self.partial));
                    }
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => break,
                Err(e) => {
                    tracing::warn!(error = %e, "mpv IPC read failed");
                    break;
                }
            }
        }

        for line in lines {
            match serde_json::from_str::<Value>(&line) {
                Ok(msg) => self.handle_message(&msg),
                Err(e) => tracing::debug!(error = %e, "ignoring malformed mpv message"),
            }
        }
    }

    #[cfg(not(unix))]
    fn read_messages(&mut self) {}

    fn handle_message(&mut self, msg: &Value) {
        match msg["event"].as_str() {
            Some("property-change") => match msg["name"].as_str() {
                Some("time-pos") => {
                    if let Some(pos) = msg["data"].as_f64() {
                        self.position = pos;
                        self.events.push(MediaEvent::TimeUpdate(pos));
                    }
                }
                Some("duration") => {
                    self.duration = msg["data"].as_f64();
                    if let Some(dur) = self.duration {
                        self.events.push(MediaEvent::DurationChanged(dur));
                    }
                }
                Some("pause") => {
                    if let Some(paused) = msg["data"].as_bool() {
                        self.paused = paused;
                        self.events.push(MediaEvent::Paused(paused));
                    }
                }
                _ => {}
            },
            Some("end-file") => {
                if msg["reason"].as_str() == Some("eof") {
                    tracing::info!("mpv reached end of file");
                    self.paused = true;
                    self.events.push(MediaEvent::Ended);
                }
            }
            _ => {
                if let Some(err) = msg["error"].as_str() {
                    if err != "success" {
                        tracing::warn!(error = err, "mpv command failed");
                    }
                }
            }
        }
    }
}

impl MediaElement for MpvPlayer {
    fn supports_adaptive(&self) -> bool {
        // mpv plays HLS manifests natively through ffmpeg
        true
    }

    fn load(&mut self, url: &str, start_time: f64) -> Result<(), MediaError> {
        self.ensure_running()?;
        self.set_property("start", json!(format!("{}", start_time.max(0.0))))?;
        self.send(json!(["loadfile", url, "replace"]))?;
        tracing::info!(%url, start_time, "mpv loadfile");
        self.position = start_time;
        self.duration = None;
        self.has_source = true;
        Ok(())
    }

    fn play(&mut self) -> Result<(), MediaError> {
        self.set_property("pause", json!(false))?;
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) -> Result<(), MediaError> {
        self.set_property("pause", json!(true))?;
        self.paused = true;
        Ok(())
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn current_time(&self) -> f64 {
        self.position
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn seek_by(&mut self, delta: f64) -> Result<(), MediaError> {
        if !self.has_source {
            return Ok(());
        }
        self.send(json!(["seek", delta.to_string(), "relative"]))
    }

    fn has_source(&self) -> bool {
        self.has_source
    }

    fn pip_enabled(&self) -> bool {
        self.pip_enabled
    }

    fn in_pip(&self) -> bool {
        self.pip
    }

    fn enter_pip(&mut self) -> Result<(), MediaError> {
        if !self.pip_enabled {
            return Err(MediaError::PipUnavailable);
        }
        if !self.has_source {
            return Err(MediaError::NoSource);
        }
        self.set_property("ontop", json!(true))?;
        self.set_property("window-scale", json!(PIP_WINDOW_SCALE))?;
        self.pip = true;
        Ok(())
    }

    fn exit_pip(&mut self) -> Result<(), MediaError> {
        self.set_property("ontop", json!(false))?;
        self.set_property("window-scale", json!(1.0))?;
        self.pip = false;
        Ok(())
    }

    fn poll_events(&mut self) -> Vec<MediaEvent> {
        self.read_messages();
        std::mem::take(&mut self.events)
    }

    fn name(&self) -> &'static str {
        "mpv"
    }
}

impl Drop for MpvPlayer {
    fn drop(&mut self) {
        if let Some(child) = self.process.as_mut() {
            let _ = child.kill();
            let _ = child.wait();
        }
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_kind_display() {
        assert_eq!(PlayerKind::Mpv.to_string(), "mpv");
        assert_eq!(PlayerKind::Headless.to_string(), "headless");
        assert_eq!(PlayerKind::default(), PlayerKind::Mpv);
    }

    #[test]
    fn test_new_player_has_no_source() {
        let player = MpvPlayer::new("mpv", true);
        assert!(!player.has_source());
        assert!(player.is_paused());
        assert!(player.supports_adaptive());
    }

    #[test]
    fn test_property_changes_become_events() {
        let mut player = MpvPlayer::new("mpv", true);
        player.handle_message(&json!({"event": "property-change", "id": 2, "name": "duration", "data": 120.5}));
        player.handle_message(&json!({"event": "property-change", "id": 1, "name": "time-pos", "data": 10.0}));
        player.handle_message(&json!({"event": "property-change", "id": 3, "name": "pause", "data": false}));
        player.handle_message(&json!({"event": "end-file", "reason": "stop"}));
        player.handle_message(&json!({"event": "end-file", "reason": "eof"}));

        assert_eq!(
            player.poll_events(),
            vec![
                MediaEvent::DurationChanged(120.5),
                MediaEvent::TimeUpdate(10.0),
                MediaEvent::Paused(false),
                MediaEvent::Ended,
            ]
        );
        assert_eq!(player.current_time(), 10.0);
        assert_eq!(player.duration(), Some(120.5));
        assert!(player.is_paused());
    }

    #[test]
    fn test_pip_requires_source() {
        let mut player = MpvPlayer::new("mpv", true);
        assert!(matches!(player.enter_pip(), Err(MediaError::NoSource)));

        let mut disabled = MpvPlayer::new("mpv", false);
        assert!(matches!(
            disabled.enter_pip(),
            Err(MediaError::PipUnavailable)
        ));
    }
}
