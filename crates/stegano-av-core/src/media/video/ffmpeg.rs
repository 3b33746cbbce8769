//! Lossless video pipeline through the `ffmpeg` and `ffprobe` binaries.
//!
//! Frames travel as raw `rgb24` over pipes. Output is always FFV1 with planar
//! RGB (`gbrp`), which keeps every channel value byte exact.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Output, Stdio};
use std::thread::{self, JoinHandle};

use image::RgbImage;
use log::{debug, error, warn};
use serde::Deserialize;

use super::frames::{FrameSink, FrameSource, VideoInfo};
use crate::result::Result;
use crate::SteganoError;

const FFMPEG: &str = "ffmpeg";
const FFPROBE: &str = "ffprobe";

/// `true` if both `ffmpeg` and `ffprobe` can be started
pub fn ffmpeg_available() -> bool {
    [FFMPEG, FFPROBE].iter().all(|bin| {
        Command::new(bin)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    })
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: u32,
    height: u32,
    r_frame_rate: String,
    /// ffprobe reports counts as strings
    nb_read_frames: Option<String>,
}

/// Reads geometry, frame rate and the exact frame count of the first video stream.
pub fn probe(path: &Path) -> Result<VideoInfo> {
    let output = run(Command::new(FFPROBE).args([
        "-v",
        "error",
        "-select_streams",
        "v:0",
        "-count_frames",
        "-show_entries",
        "stream=width,height,r_frame_rate,nb_read_frames",
        "-of",
        "json",
    ])
    .arg(path))?;

    let probed: ProbeOutput = serde_json::from_slice(&output.stdout).map_err(|e| {
        SteganoError::VideoPipeline(format!("unreadable ffprobe output for {path:?}: {e}"))
    })?;
    let stream = probed
        .streams
        .into_iter()
        .next()
        .ok_or_else(|| SteganoError::UnsupportedCarrierFormat(format!("no video stream in {path:?}")))?;
    let frame_count = stream
        .nb_read_frames
        .as_deref()
        .and_then(|n| n.parse::<u64>().ok())
        .ok_or_else(|| SteganoError::VideoPipeline(format!("ffprobe could not count the frames of {path:?}")))?;

    let info = VideoInfo {
        width: stream.width,
        height: stream.height,
        frame_count,
        frame_rate: stream.r_frame_rate,
    };
    debug!("probed {path:?}: {info:?}");

    Ok(info)
}

/// Decodes a video file into rgb24 frames.
#[derive(Debug)]
pub struct FfmpegSource {
    info: VideoInfo,
    path: PathBuf,
    child: Option<Child>,
    stdout: Option<ChildStdout>,
    stderr: Option<StderrDrain>,
}

impl FfmpegSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SteganoError::CarrierNotFound(path.to_path_buf()));
        }
        let info = probe(path)?;

        let mut child = spawn(
            Command::new(FFMPEG)
                .args(["-v", "error", "-i"])
                .arg(path)
                .args([
                    "-map", "0:v:0", "-vsync", "passthrough", "-f", "rawvideo", "-pix_fmt", "rgb24", "-",
                ])
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped()),
        )?;
        let stdout = child.stdout.take();
        let stderr = StderrDrain::start(&mut child);

        Ok(Self {
            info,
            path: path.to_path_buf(),
            child: Some(child),
            stdout,
            stderr,
        })
    }

    /// Reaps the decoder once its output is exhausted.
    fn close(&mut self) -> Result<()> {
        self.stdout = None;
        match self.child.take() {
            Some(child) => wait_for(&self.path, child, self.stderr.take()),
            None => Ok(()),
        }
    }
}

impl FrameSource for FfmpegSource {
    fn info(&self) -> &VideoInfo {
        &self.info
    }

    fn next_frame(&mut self) -> Result<Option<RgbImage>> {
        let Some(stdout) = self.stdout.as_mut() else {
            return Ok(None);
        };
        let mut buf = vec![0u8; self.info.units_per_frame() as usize];
        let filled = read_full(stdout, &mut buf).map_err(|source| SteganoError::ReadError { source })?;

        if filled == 0 {
            self.close()?;
            return Ok(None);
        }
        if filled < buf.len() {
            self.close()?;
            return Err(SteganoError::VideoPipeline(format!(
                "ffmpeg delivered a truncated frame of {filled} bytes for {:?}",
                self.path
            )));
        }

        RgbImage::from_raw(self.info.width, self.info.height, buf)
            .map(Some)
            .ok_or_else(|| SteganoError::VideoPipeline("frame buffer size mismatch".to_string()))
    }
}

impl Drop for FfmpegSource {
    fn drop(&mut self) {
        self.stdout = None;
        if let Some(child) = self.child.as_mut() {
            reap(child);
        }
    }
}

/// Encodes rgb24 frames losslessly with FFV1.
#[derive(Debug)]
pub struct FfmpegSink {
    path: PathBuf,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr: Option<StderrDrain>,
}

impl FfmpegSink {
    pub fn create<P: AsRef<Path>>(path: P, info: &VideoInfo) -> Result<Self> {
        let path = path.as_ref();
        let size = format!("{}x{}", info.width, info.height);

        let mut child = spawn(
            Command::new(FFMPEG)
                .args(["-v", "error", "-y", "-f", "rawvideo", "-pix_fmt", "rgb24", "-s"])
                .arg(&size)
                .arg("-framerate")
                .arg(&info.frame_rate)
                .args(["-i", "-", "-c:v", "ffv1", "-pix_fmt", "gbrp"])
                .arg(path)
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::piped()),
        )?;
        let stdin = child.stdin.take();
        let stderr = StderrDrain::start(&mut child);

        Ok(Self {
            path: path.to_path_buf(),
            child: Some(child),
            stdin,
            stderr,
        })
    }
}

impl FrameSink for FfmpegSink {
    fn write_frame(&mut self, frame: &RgbImage) -> Result<()> {
        let stdin = self.stdin.as_mut().ok_or_else(|| {
            SteganoError::VideoPipeline("frame written after the encoder was finished".to_string())
        })?;

        stdin.write_all(frame.as_raw()).map_err(|e| {
            error!("Error piping frame to ffmpeg for {:?}: {e}", self.path);
            SteganoError::WriteError { source: e }
        })
    }

    fn finish(&mut self) -> Result<()> {
        // closing stdin lets ffmpeg flush the container
        self.stdin = None;
        match self.child.take() {
            Some(child) => wait_for(&self.path, child, self.stderr.take()),
            None => Ok(()),
        }
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        self.stdin = None;
        if let Some(child) = self.child.as_mut() {
            reap(child);
        }
    }
}

fn spawn(command: &mut Command) -> Result<Child> {
    command.spawn().map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => {
            SteganoError::VideoPipeline(format!("{:?} not found on PATH", command.get_program()))
        }
        _ => SteganoError::IoError(e),
    })
}

fn run(command: &mut Command) -> Result<Output> {
    let program = command.get_program().to_os_string();
    let output = command
        .stdin(Stdio::null())
        .output()
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => SteganoError::VideoPipeline(format!("{program:?} not found on PATH")),
            _ => SteganoError::IoError(e),
        })?;
    if !output.status.success() {
        return Err(SteganoError::VideoPipeline(format!(
            "{program:?} failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(output)
}

/// Reads a child's stderr to the end on its own thread while frames are streamed.
#[derive(Debug)]
struct StderrDrain(JoinHandle<Vec<u8>>);

impl StderrDrain {
    fn start(child: &mut Child) -> Option<Self> {
        child.stderr.take().map(|mut stderr| {
            Self(thread::spawn(move || {
                let mut captured = Vec::new();
                if let Err(e) = stderr.read_to_end(&mut captured) {
                    debug!("ffmpeg stderr cut short: {e}");
                }
                captured
            }))
        })
    }

    fn collect(self) -> Vec<u8> {
        self.0.join().unwrap_or_default()
    }
}

fn wait_for(path: &Path, mut child: Child, stderr: Option<StderrDrain>) -> Result<()> {
    let status = child.wait()?;
    if status.success() {
        return Ok(());
    }
    let captured = stderr.map(StderrDrain::collect).unwrap_or_default();
    let stderr = String::from_utf8_lossy(&captured);
    error!("ffmpeg failed for {path:?}: {}", stderr.trim());

    Err(SteganoError::VideoPipeline(format!(
        "ffmpeg exited with {status} for {path:?}: {}",
        stderr.trim()
    )))
}

/// Kills a child that was not finished regularly and waits for it, so no zombie is left.
fn reap(child: &mut Child) {
    if let Err(e) = child.kill() {
        // already exited
        if e.kind() != io::ErrorKind::InvalidInput {
            warn!("could not kill ffmpeg: {e}");
        }
    }
    if let Err(e) = child.wait() {
        warn!("could not reap ffmpeg: {e}");
    }
}

/// Like `read_exact`, but reports how much was read when the stream ends early.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(filled)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn should_report_short_reads() {
        let mut buf = [0u8; 8];

        assert_eq!(read_full(&mut Cursor::new(vec![1u8; 5]), &mut buf).unwrap(), 5);
        assert_eq!(read_full(&mut Cursor::new(vec![1u8; 20]), &mut buf).unwrap(), 8);
    }

    #[test]
    fn should_parse_probe_output() {
        let json = br#"{"programs": [], "streams": [{"width": 4, "height": 2, "r_frame_rate": "30000/1001", "nb_read_frames": "12"}]}"#;
        let probed: ProbeOutput = serde_json::from_slice(json).unwrap();

        assert_eq!(probed.streams[0].width, 4);
        assert_eq!(probed.streams[0].nb_read_frames.as_deref(), Some("12"));
        assert_eq!(probed.streams[0].r_frame_rate, "30000/1001");
    }

    #[test]
    fn should_round_trip_frames_through_ffv1() -> Result<()> {
        if !ffmpeg_available() {
            eprintln!("ffmpeg not available, skipping");
            return Ok(());
        }
        let tmp = TempDir::new()?;
        let video = tmp.path().join("clip.mkv");
        let info = VideoInfo {
            width: 8,
            height: 6,
            frame_count: 3,
            frame_rate: "10/1".to_string(),
        };
        let frames: Vec<RgbImage> = (0..3u8)
            .map(|n| RgbImage::from_fn(8, 6, |x, y| image::Rgb([x as u8 * 31, y as u8 * 41, n * 97 + 1])))
            .collect();

        let mut sink = FfmpegSink::create(&video, &info)?;
        for frame in frames.iter() {
            sink.write_frame(frame)?;
        }
        sink.finish()?;

        let mut source = FfmpegSource::open(&video)?;
        assert_eq!(source.info(), &info);
        for frame in frames.iter() {
            assert_eq!(&source.next_frame()?.expect("frame missing"), frame);
        }
        assert!(source.next_frame()?.is_none());

        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn should_not_stall_on_a_child_flooding_stderr() {
        // well beyond a pipe buffer, written before the child exits
        let mut child = spawn(
            Command::new("sh")
                .args(["-c", "yes error | head -c 300000 >&2; exit 3"])
                .stdout(Stdio::null())
                .stderr(Stdio::piped()),
        )
        .unwrap();
        let stderr = StderrDrain::start(&mut child);

        match wait_for(Path::new("flood.mkv"), child, stderr) {
            Err(SteganoError::VideoPipeline(msg)) => assert!(msg.contains("error")),
            other => panic!("expected VideoPipeline, got {other:?}"),
        }
    }

    #[test]
    fn should_report_a_missing_carrier() {
        assert!(matches!(
            FfmpegSource::open("does/not/exist.mkv"),
            Err(SteganoError::CarrierNotFound(_))
        ));
    }
}
