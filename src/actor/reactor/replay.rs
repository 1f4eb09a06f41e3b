use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use anyhow::Context;
#[cfg(test)]
use tempfile::NamedTempFile;
use tracing::warn;

use super::{Event, PresentationEvent, Reactor};
use crate::actor;
use crate::common::config::Config;
use crate::layout_engine::LayoutEngine;
use crate::model::{FrameStore, TileId};

/// Appends the reactor's inputs to a file, one RON value per line: the
/// config, then the tile ids, then every handled event.
pub struct Record {
    file: Option<File>,
    #[cfg(test)]
    temp: Option<NamedTempFile>,
}

impl Record {
    pub fn new(path: Option<&Path>) -> anyhow::Result<Self> {
        let file = match path {
            Some(path) => Some(
                File::create(path)
                    .with_context(|| format!("creating recording {}", path.display()))?,
            ),
            None => None,
        };
        Ok(Self {
            file,
            #[cfg(test)]
            temp: None,
        })
    }

    pub fn disabled() -> Self {
        Self {
            file: None,
            #[cfg(test)]
            temp: None,
        }
    }

    #[cfg(test)]
    pub fn new_for_test(temp: NamedTempFile) -> Self { Self { file: None, temp: Some(temp) } }

    fn file(&mut self) -> Option<&mut File> {
        #[cfg(test)]
        return self.file.as_mut().or(self.temp.as_mut().map(|temp| temp.as_file_mut()));
        #[cfg(not(test))]
        self.file.as_mut()
    }

    pub(super) fn start(&mut self, config: &Config, ids: &[TileId]) {
        let lines = ron::ser::to_string(config)
            .and_then(|config| Ok(format!("{config}\n{}\n", ron::ser::to_string(ids)?)));
        self.write(lines);
    }

    pub(super) fn on_event(&mut self, event: &Event) {
        self.write(ron::ser::to_string(event).map(|line| line + "\n"));
    }

    /// A failed write stops the recording rather than the reactor.
    fn write(&mut self, lines: Result<String, ron::Error>) {
        let Some(file) = self.file() else { return };
        let written = match lines {
            Ok(lines) => file.write_all(lines.as_bytes()).map_err(anyhow::Error::from),
            Err(err) => Err(err.into()),
        };
        if let Err(err) = written {
            warn!("recording stopped: {err}");
            self.file = None;
            #[cfg(test)]
            {
                self.temp = None;
            }
        }
    }
}

/// Final state of a replayed recording.
pub struct Replay {
    pub engine: LayoutEngine,
    pub frames: FrameStore,
    pub presentation: Vec<PresentationEvent>,
}

pub fn replay(path: &Path) -> anyhow::Result<Replay> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut lines = BufReader::new(file).lines();
    let config: Config = ron::de::from_str(&lines.next().context("empty recording")??)
        .context("reading recorded config")?;
    let ids: Vec<TileId> = ron::de::from_str(&lines.next().context("missing tile line")??)
        .context("reading recorded tile ids")?;

    let (presentation_tx, mut presentation_rx) = actor::channel();
    let mut reactor =
        Reactor::new(config, ids, FrameStore::new(), presentation_tx, Record::disabled())?;
    for (number, line) in lines.enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let event: Event = ron::de::from_str(&line)
            .with_context(|| format!("event {} of the recording", number + 1))?;
        reactor.handle_event(event);
    }

    let Reactor { engine, frames, .. } = reactor;
    Ok(Replay {
        engine,
        frames,
        presentation: actor::drain(&mut presentation_rx),
    })
}
