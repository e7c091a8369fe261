use crate::Error;
use crate::layout::{DockingLayout, read_perspective, write_perspective};
use crate::view::View;

use data::State;
use std::cell::RefCell;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::mpsc;
use std::thread;

const EXTENSION: &str = "xml";

/// File picker used by [`PerspectiveManager::save_as`] and
/// [`PerspectiveManager::load`]. `None` means the user cancelled.
pub trait PathPrompt {
    fn save_path(&mut self, dir: &Path) -> Option<PathBuf>;

    fn open_path(&mut self, dir: &Path) -> Option<PathBuf>;
}

/// Saves and restores complete docking arrangements of a view.
///
/// Perspectives are XML files in the `perspectives` directory under the
/// settings root. A perspective is always applied as a whole: loading parses
/// the entire file before the view is touched.
#[derive(Debug, Clone)]
pub struct PerspectiveManager {
    settings_root: PathBuf,
    /// Last perspective saved or applied.
    last: Rc<RefCell<Option<PathBuf>>>,
}

impl PerspectiveManager {
    pub fn new(settings_root: impl Into<PathBuf>) -> Self {
        Self {
            settings_root: settings_root.into(),
            last: Rc::default(),
        }
    }

    /// The perspective directory, created if missing.
    pub fn perspective_dir(&self) -> Result<PathBuf, Error> {
        let dir = self.settings_root.join(data::PERSPECTIVE_DIR);
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
            log::debug!("Created {}", dir.display());
        }
        Ok(dir)
    }

    /// Names of the saved perspectives, sorted.
    pub fn list(&self) -> Result<Vec<String>, Error> {
        let mut names = Vec::new();
        for entry in fs::read_dir(self.perspective_dir()?)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == EXTENSION)
                && let Some(stem) = path.file_stem()
            {
                names.push(stem.to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn path_for(&self, name: &str) -> Result<PathBuf, Error> {
        Ok(self.perspective_dir()?.join(format!("{name}.{EXTENSION}")))
    }

    pub fn last_perspective(&self) -> Option<PathBuf> {
        self.last.borrow().clone()
    }

    /// Records the last perspective in `state`.
    pub fn save_settings(&self, state: &mut State) {
        state.last_perspective = self
            .last
            .borrow()
            .as_ref()
            .map(|path| path.to_string_lossy().into_owned());
    }

    /// Applies the perspective recorded in `state`, if any. `Ok(None)` when
    /// nothing was recorded.
    pub fn restore(&self, view: &mut View, state: &State) -> Result<Option<PathBuf>, Error> {
        let Some(last) = &state.last_perspective else {
            return Ok(None);
        };

        let path = PathBuf::from(last);
        self.load_from(view, &path)?;
        Ok(Some(path))
    }

    /// Asks for a destination and saves there. `Ok(None)` when cancelled.
    pub fn save_as(
        &self,
        view: &View,
        prompt: &mut dyn PathPrompt,
    ) -> Result<Option<PathBuf>, Error> {
        let dir = self.perspective_dir()?;
        let Some(path) = prompt.save_path(&dir) else {
            log::debug!("Save perspective cancelled");
            return Ok(None);
        };

        self.save_to(view, &path)?;
        Ok(Some(path))
    }

    pub fn save_named(&self, view: &View, name: &str) -> Result<PathBuf, Error> {
        let path = self.path_for(name)?;
        self.save_to(view, &path)?;
        Ok(path)
    }

    /// Writes the view's current layout to `path`.
    ///
    /// The document goes to a sibling temporary file first, so a failed write
    /// never replaces an existing perspective with a partial one.
    pub fn save_to(&self, view: &View, path: &Path) -> Result<(), Error> {
        let layout = view.docking().get_docking_layout();

        match write_atomically(path, layout.as_ref()) {
            Ok(()) => {
                log::info!("Saved perspective to {}", path.display());
                self.last.replace(Some(path.to_path_buf()));
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to save perspective to {}: {}", path.display(), e);
                Err(e)
            }
        }
    }

    /// Asks for a perspective and applies it. `Ok(None)` when cancelled.
    pub fn load(
        &self,
        view: &mut View,
        prompt: &mut dyn PathPrompt,
    ) -> Result<Option<PathBuf>, Error> {
        let dir = self.perspective_dir()?;
        let Some(path) = prompt.open_path(&dir) else {
            log::debug!("Load perspective cancelled");
            return Ok(None);
        };

        self.load_from(view, &path)?;
        Ok(Some(path))
    }

    /// Parses `path` completely, then replaces the view's layout in one step.
    /// On any error the view keeps its current layout.
    pub fn load_from(&self, view: &mut View, path: &Path) -> Result<(), Error> {
        let layout = view.provider().create_docking_layout();

        finish_load(path, parse_file(path, layout), view, &self.last)
    }

    /// Reads and parses `path` on a worker thread. The result is applied on
    /// the calling thread through [`PendingLoad`].
    pub fn spawn_load(&self, view: &View, path: impl Into<PathBuf>) -> PendingLoad {
        let path = path.into();
        let layout = view.provider().create_docking_layout();
        let (sender, receiver) = mpsc::channel();

        let worker_path = path.clone();
        let spawned = thread::Builder::new()
            .name("perspective-load".to_string())
            .spawn(move || {
                let _ = sender.send(parse_file(&worker_path, layout));
            });

        if let Err(e) = spawned {
            log::error!("Failed to start perspective loader: {}", e);
        }

        PendingLoad {
            path,
            receiver,
            last: Rc::clone(&self.last),
        }
    }
}

/// A perspective being parsed in the background.
pub struct PendingLoad {
    path: PathBuf,
    receiver: mpsc::Receiver<Result<Box<dyn DockingLayout>, Error>>,
    last: Rc<RefCell<Option<PathBuf>>>,
}

impl PendingLoad {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Applies the layout to `view` if the worker is done, without blocking.
    /// `None` while parsing is still in progress. Yields `Some` once.
    pub fn poll(&self, view: &mut View) -> Option<Result<(), Error>> {
        let result = match self.receiver.try_recv() {
            Ok(result) => result,
            Err(mpsc::TryRecvError::Empty) => return None,
            Err(mpsc::TryRecvError::Disconnected) => Err(Error::LoadInterrupted),
        };

        Some(finish_load(&self.path, result, view, &self.last))
    }

    /// Blocks until the worker is done, then applies the layout to `view`.
    pub fn apply(self, view: &mut View) -> Result<(), Error> {
        let result = self
            .receiver
            .recv()
            .unwrap_or(Err(Error::LoadInterrupted));

        finish_load(&self.path, result, view, &self.last)
    }
}

fn finish_load(
    path: &Path,
    parsed: Result<Box<dyn DockingLayout>, Error>,
    view: &mut View,
    last: &RefCell<Option<PathBuf>>,
) -> Result<(), Error> {
    match parsed {
        Ok(layout) => {
            view.docking_mut().set_docking_layout(layout);
            last.replace(Some(path.to_path_buf()));
            log::info!("Loaded perspective {}", path.display());
            Ok(())
        }
        Err(e) => {
            log::error!("Failed to load perspective {}: {}", path.display(), e);
            Err(e)
        }
    }
}

fn parse_file(
    path: &Path,
    mut layout: Box<dyn DockingLayout>,
) -> Result<Box<dyn DockingLayout>, Error> {
    let contents = fs::read_to_string(path)?;
    {
        let mut handler = layout.perspective_handler();
        read_perspective(&contents, handler.as_mut())?;
    }
    Ok(layout)
}

fn write_atomically(path: &Path, layout: &dyn DockingLayout) -> Result<(), Error> {
    let tmp = path.with_extension("xml.tmp");

    let result = write_file(&tmp, layout).and_then(|()| Ok(fs::rename(&tmp, path)?));
    if result.is_err() && tmp.exists() {
        if let Err(e) = fs::remove_file(&tmp) {
            log::warn!("Failed to remove {}: {}", tmp.display(), e);
        }
    }
    result
}

fn write_file(path: &Path, layout: &dyn DockingLayout) -> Result<(), Error> {
    let mut out = BufWriter::new(File::create(path)?);
    write_perspective(layout, &mut out)?;
    out.flush()?;
    out.get_ref().sync_all()?;
    Ok(())
}
