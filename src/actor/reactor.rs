//! The reactor serializes collaborator events onto the layout engine.
//!
//! Pointer, measurement and relayout events arrive on one channel and are
//! handled strictly in order; after each event the reactor republishes tile
//! frames and forwards any page-scroll request to the presentation side.

mod replay;

use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

pub use replay::{Record, Replay, replay};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::actor;
use crate::common::config::Config;
use crate::layout_engine::{EventResponse, GridError, LayoutEngine, PageScroll};
use crate::model::{FrameStore, TileId};

pub type Sender = actor::Sender<Event>;
pub type Receiver = actor::Receiver<Event>;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum Event {
    MeasuredSize {
        tile: TileId,
        width: f64,
        height: f64,
    },
    DragStart(TileId),
    /// `dx`/`dy` are cumulative since the drag started. `at_ms` is stamped
    /// by the reactor on arrival when the sender leaves it empty.
    DragUpdate {
        tile: TileId,
        dx: f64,
        dy: f64,
        scroll_x: f64,
        #[serde(default)]
        at_ms: Option<u64>,
    },
    DragEnd(TileId),
    Relayout,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum PresentationEvent {
    RequestPageScroll(PageScroll),
    DragCommitted {
        tile: TileId,
        from: usize,
        to: usize,
    },
}

pub struct Reactor {
    engine: LayoutEngine,
    frames: FrameStore,
    presentation_tx: actor::Sender<PresentationEvent>,
    record: Record,
    epoch: Instant,
}

impl Reactor {
    pub fn new(
        config: Config,
        ids: Vec<TileId>,
        frames: FrameStore,
        presentation_tx: actor::Sender<PresentationEvent>,
        mut record: Record,
    ) -> Result<Self, GridError> {
        let engine = LayoutEngine::new(&config, ids.iter().copied())?;
        record.start(&config, &ids);
        let reactor = Reactor {
            engine,
            frames,
            presentation_tx,
            record,
            epoch: Instant::now(),
        };
        reactor.engine.publish(&reactor.frames);
        Ok(reactor)
    }

    /// Runs the reactor on its own thread until every sender is dropped,
    /// then hands the reactor back through the join handle.
    pub fn spawn(self) -> std::io::Result<(Sender, JoinHandle<Reactor>)> {
        let (tx, rx) = actor::channel();
        let handle = thread::Builder::new()
            .name("grid-reactor".to_string())
            .spawn(move || self.run(rx))?;
        Ok((tx, handle))
    }

    fn run(mut self, mut events: Receiver) -> Self {
        while let Some((span, event)) = events.blocking_recv() {
            let _guard = span.enter();
            self.handle_event(event);
        }
        debug!("event channel closed, reactor stopping");
        self
    }

    pub fn engine(&self) -> &LayoutEngine { &self.engine }

    pub fn frames(&self) -> &FrameStore { &self.frames }

    pub fn handle_events(&mut self, events: impl IntoIterator<Item = Event>) {
        for event in events {
            self.handle_event(event);
        }
    }

    #[instrument(name = "reactor::handle_event", skip(self))]
    pub fn handle_event(&mut self, event: Event) {
        let event = self.stamp(event);
        self.record.on_event(&event);

        let result = match event {
            Event::MeasuredSize { tile, width, height } => {
                self.engine.report_measured_size(tile, width, height)
            }
            Event::DragStart(tile) => self.engine.on_drag_start(tile),
            Event::DragUpdate { tile, dx, dy, scroll_x, at_ms } => {
                let at = self.epoch + Duration::from_millis(at_ms.unwrap_or_default());
                self.engine.on_drag_update(tile, dx, dy, scroll_x, at)
            }
            Event::DragEnd(tile) => self.engine.on_drag_end(tile).map(|response| {
                if let Some((from, to)) = response.committed {
                    self.presentation_tx.send(PresentationEvent::DragCommitted { tile, from, to });
                }
                response
            }),
            Event::Relayout => Ok(self.engine.relayout()),
        };

        match result {
            Ok(response) => self.respond(response),
            Err(err) => warn!("event dropped: {err}"),
        }
        self.engine.publish(&self.frames);
    }

    fn respond(&mut self, response: EventResponse) {
        if let Some(scroll) = response.page_scroll {
            self.presentation_tx.send(PresentationEvent::RequestPageScroll(scroll));
        }
    }

    /// Fills in the arrival time of unstamped drag updates so a recording
    /// replays with the same dwell timing.
    fn stamp(&self, event: Event) -> Event {
        match event {
            Event::DragUpdate { tile, dx, dy, scroll_x, at_ms: None } => Event::DragUpdate {
                tile,
                dx,
                dy,
                scroll_x,
                at_ms: Some(self.epoch.elapsed().as_millis() as u64),
            },
            event => event,
        }
    }
}
