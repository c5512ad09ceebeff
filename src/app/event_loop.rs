use std::collections::VecDeque;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event;

use crate::app::effects::Runtime;
use crate::app::input::message_for_event;
use crate::app::update::{init, update};
use crate::app::{Message, Model};

/// Milliseconds a resize must settle before the view is rebuilt.
const RESIZE_DEBOUNCE_MS: u64 = 100;
/// Poll interval while idle; bounds the latency of watch events.
const IDLE_POLL_MS: u64 = 100;

pub(super) struct ResizeDebouncer {
    delay_ms: u64,
    pending: Option<(u16, u16, u64)>,
}

impl ResizeDebouncer {
    pub(super) const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub(super) const fn queue(&mut self, width: u16, height: u16, now_ms: u64) {
        self.pending = Some((width, height, now_ms));
    }

    pub(super) fn take_ready(&mut self, now_ms: u64) -> Option<(u16, u16)> {
        let (width, height, queued_at) = self.pending?;
        if now_ms.saturating_sub(queued_at) >= self.delay_ms {
            self.pending = None;
            Some((width, height))
        } else {
            None
        }
    }

    pub(super) const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// The model, the runtime and the queue of messages waiting for `update`.
///
/// Messages are processed strictly one at a time: each is reduced, its
/// effect executed, and any messages the effect produced are appended to
/// the queue behind whatever was already waiting.
#[derive(Debug)]
pub struct Program {
    model: Model,
    runtime: Runtime,
    queue: VecDeque<Message>,
}

impl Program {
    /// Execute the startup effect for `model` and settle the result.
    pub fn start(model: Model, runtime: Runtime) -> Self {
        let (model, effect) = init(model);
        let mut program = Self {
            model,
            runtime,
            queue: VecDeque::new(),
        };
        program.runtime.execute(effect, &mut program.queue);
        program.drain();
        program
    }

    /// Feed one message in and process everything it leads to.
    pub fn dispatch(&mut self, msg: Message) {
        self.queue.push_back(msg);
        self.drain();
    }

    fn drain(&mut self) {
        while let Some(msg) = self.queue.pop_front() {
            if self.runtime.exited() {
                self.queue.clear();
                break;
            }
            tracing::trace!(?msg, "update");
            let (model, effect) = update(std::mem::take(&mut self.model), msg);
            self.model = model;
            self.runtime.execute(effect, &mut self.queue);
        }
    }

    pub const fn model(&self) -> &Model {
        &self.model
    }

    pub const fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    /// Whether the program has executed an exit.
    pub const fn is_finished(&self) -> bool {
        self.runtime.exited()
    }
}

/// Pump terminal and watch events into `program` until it exits.
pub(super) fn run_event_loop(program: &mut Program, watch_events: &Receiver<Message>) -> Result<()> {
    let start = Instant::now();
    let mut resize_debouncer = ResizeDebouncer::new(RESIZE_DEBOUNCE_MS);

    while !program.is_finished() {
        while let Ok(msg) = watch_events.try_recv() {
            program.dispatch(msg);
        }

        let now_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        if let Some((width, height)) = resize_debouncer.take_ready(now_ms) {
            program.dispatch(Message::Resize(width, height));
        }

        let poll_ms = if resize_debouncer.is_pending() {
            10
        } else {
            IDLE_POLL_MS
        };
        if event::poll(Duration::from_millis(poll_ms))? {
            let event = event::read()?;
            match message_for_event(&event) {
                Some(Message::Resize(width, height)) => {
                    let event_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                    resize_debouncer.queue(width, height, event_ms);
                }
                Some(msg) => program.dispatch(msg),
                None => {}
            }
        }
    }
    Ok(())
}
