use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::mpsc,
    thread,
};

pub use data::log::Error;

const MAX_LOG_FILE_SIZE: u64 = 50 * 1024 * 1024;
const PREVIOUS_LOG_FILE: &str = "dockyard-previous.log";

enum LogMessage {
    Content(Vec<u8>),
    Flush,
    Shutdown,
}

/// Installs the global logger.
///
/// Debug builds log to stdout. Otherwise records go to
/// `dockyard-current.log` under `settings_root`, and the log of the previous
/// run is kept as `dockyard-previous.log`. `RUST_LOG` overrides the level.
pub fn setup(is_debug: bool, settings_root: &Path) -> Result<(), Error> {
    let default_level = if is_debug {
        log::Level::Debug
    } else {
        log::Level::Info
    };

    let level_filter = std::env::var("RUST_LOG")
        .ok()
        .as_deref()
        .map(str::parse::<log::Level>)
        .transpose()?
        .unwrap_or(default_level)
        .to_level_filter();

    let mut io_sink = fern::Dispatch::new().format(|out, message, record| {
        out.finish(format_args!(
            "{}:{} [{}] -- {}",
            chrono::Local::now().format("%H:%M:%S%.3f"),
            record.level(),
            record.target(),
            message
        ));
    });

    if is_debug {
        io_sink = io_sink.chain(std::io::stdout());
    } else {
        let log_path = data::log::path(settings_root)?;
        initial_rotation(&log_path)?;

        let logger: Box<dyn Write + Send> = Box::new(BackgroundLogger::new(log_path)?);

        io_sink = io_sink.chain(logger);
    }

    fern::Dispatch::new()
        .level(log::LevelFilter::Off)
        .level_for("panic", log::LevelFilter::Error)
        .level_for("dockyard_data", level_filter)
        .level_for("dockyard", level_filter)
        .chain(io_sink)
        .apply()?;

    Ok(())
}

/// Moves the last run's log aside so the new one starts empty.
fn initial_rotation(log_path: &Path) -> io::Result<()> {
    let previous = previous_log_path(log_path);

    if previous.exists() {
        fs::remove_file(&previous)?;
    }
    if log_path.exists() {
        fs::rename(log_path, &previous)?;
    }

    Ok(())
}

fn previous_log_path(log_path: &Path) -> PathBuf {
    log_path
        .parent()
        .unwrap_or(Path::new("."))
        .join(PREVIOUS_LOG_FILE)
}

/// Sink handed to fern. Records are written by a dedicated thread so a slow
/// disk never stalls the UI thread.
struct BackgroundLogger {
    sender: mpsc::Sender<LogMessage>,
    _worker: thread::JoinHandle<()>,
}

impl BackgroundLogger {
    fn new(path: PathBuf) -> io::Result<Self> {
        let mut file = RotatingFile::open(path, MAX_LOG_FILE_SIZE)?;
        let (sender, receiver) = mpsc::channel();

        let worker = thread::Builder::new()
            .name("logger-thread".to_string())
            .spawn(move || {
                while let Ok(message) = receiver.recv() {
                    let result = match message {
                        LogMessage::Content(data) => file.write_all(&data),
                        LogMessage::Flush => file.flush(),
                        LogMessage::Shutdown => break,
                    };
                    if let Err(e) = result {
                        eprintln!("Logging error: {e}");
                    }
                }
                let _ = file.flush();
            })?;

        Ok(Self {
            sender,
            _worker: worker,
        })
    }

    fn send(&self, message: LogMessage) -> io::Result<()> {
        self.sender
            .send(message)
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "Logger thread disconnected"))
    }
}

impl Write for BackgroundLogger {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.send(LogMessage::Content(buf.to_vec()))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.send(LogMessage::Flush)
    }
}

impl Drop for BackgroundLogger {
    fn drop(&mut self) {
        let _ = self.sender.send(LogMessage::Shutdown);
    }
}

/// Log file that starts over once it would grow past `max_size`, keeping
/// the full file as the previous log.
struct RotatingFile {
    path: PathBuf,
    file: fs::File,
    size: u64,
    max_size: u64,
}

impl RotatingFile {
    fn open(path: PathBuf, max_size: u64) -> io::Result<Self> {
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;
        let size = file.metadata()?.len();

        Ok(Self {
            path,
            file,
            size,
            max_size,
        })
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        initial_rotation(&self.path)?;
        self.file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        self.size = 0;
        Ok(())
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.size > 0 && self.size + buf.len() as u64 > self.max_size {
            self.rotate()?;
        }

        let written = self.file.write(buf)?;
        self.size += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_keeps_one_previous_log() {
        let dir = tempfile::tempdir().unwrap();
        let current = data::log::path(dir.path()).unwrap();
        let previous = dir.path().join(PREVIOUS_LOG_FILE);

        fs::write(&previous, "older").unwrap();
        fs::write(&current, "last run").unwrap();

        initial_rotation(&current).unwrap();

        assert!(!current.exists());
        assert_eq!(fs::read_to_string(&previous).unwrap(), "last run");
    }

    #[test]
    fn oversized_log_starts_over() {
        let dir = tempfile::tempdir().unwrap();
        let current = data::log::path(dir.path()).unwrap();
        fs::write(&current, "12345").unwrap();

        let mut file = RotatingFile::open(current.clone(), 8).unwrap();
        file.write_all(b"abc").unwrap();
        file.write_all(b"defg").unwrap();
        file.flush().unwrap();

        assert_eq!(fs::read_to_string(&current).unwrap(), "defg");
        assert_eq!(
            fs::read_to_string(dir.path().join(PREVIOUS_LOG_FILE)).unwrap(),
            "12345abc"
        );
    }

    #[test]
    fn background_sink_writes_through() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bg.log");

        let mut sink = BackgroundLogger::new(path.clone()).unwrap();
        sink.write_all(b"hello\n").unwrap();
        sink.flush().unwrap();
        drop(sink);

        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        while fs::read_to_string(&path).unwrap_or_default() != "hello\n" {
            assert!(std::time::Instant::now() < deadline, "log never reached disk");
            thread::sleep(std::time::Duration::from_millis(10));
        }
    }
}
